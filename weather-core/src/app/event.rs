use crate::model::{Forecast, Location};

/// Keys the screens react to. Terminal front ends map their own key events onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Esc,
    Backspace,
    Char(char),
    /// Ctrl-C.
    Interrupt,
}

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn is_known(&self) -> bool {
        self.width > 0 || self.height > 0
    }
}

/// Identifies one tick of one spinner run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinnerTick {
    pub id: u64,
    pub tag: u64,
}

/// Screen-to-screen navigation requested by a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    HistoryPicked(Location),
    /// Nothing saved to pick from.
    HistoryDeclined,
    HistoryToSearch,
    SearchPicked(Location),
    SearchToHistory,
    ForecastToSearch,
    ForecastToHistory,
}

/// Everything that enters the event loop.
///
/// Background results carry their error already rendered to text.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Key(Key),
    Resize(Size),
    Tick(SpinnerTick),
    RecentLoaded(Result<Vec<Location>, String>),
    RecentSaved(Result<(), String>),
    LocationsFound(Result<Vec<Location>, String>),
    ForecastLoaded(Result<Box<Forecast>, String>),
    Navigate(Transition),
}

impl Msg {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Msg::Key(_) => "key",
            Msg::Resize(_) => "resize",
            Msg::Tick(_) => "tick",
            Msg::RecentLoaded(_) => "recent-loaded",
            Msg::RecentSaved(_) => "recent-saved",
            Msg::LocationsFound(_) => "locations-found",
            Msg::ForecastLoaded(_) => "forecast-loaded",
            Msg::Navigate(_) => "navigate",
        }
    }
}
