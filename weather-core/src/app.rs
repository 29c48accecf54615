//! Screen state machine.
//!
//! [`App`] owns the three screens and routes every message either to a
//! navigation transition or to the active screen. It never performs I/O:
//! side effects come back as [`Command`] values for the executor to run.

use tracing::{debug, info};

pub mod command;
pub mod event;
pub mod executor;
pub mod forecast;
pub mod history;
pub mod layout;
pub mod search;
pub mod widgets;

pub use command::Command;
pub use event::{Key, Msg, Size, SpinnerTick, Transition};
pub use executor::CommandExecutor;
pub use forecast::{ForecastScreen, ForecastState};
pub use history::{HistoryScreen, HistoryState};
pub use search::{SearchScreen, SearchState};

use crate::config::Config;

/// Capabilities shared by every screen.
pub trait Screen {
    /// Payload needed to re-enter the screen.
    type Args;

    /// Commands to issue when the screen becomes active.
    fn init(&mut self) -> Vec<Command>;

    /// Bring the screen back to its entry state without rebuilding it.
    fn reset(&mut self, args: Self::Args);

    fn update(&mut self, msg: Msg) -> Vec<Command>;

    fn render(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    History,
    Search,
    Forecast,
}

#[derive(Debug)]
pub struct App {
    route: Route,
    history: HistoryScreen,
    search: SearchScreen,
    forecast: ForecastScreen,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            route: Route::History,
            history: HistoryScreen::new(config.layout.clone()),
            search: SearchScreen::new(config.search.count, config.layout.clone()),
            forecast: ForecastScreen::new(config.forecast.clone(), config.layout.clone()),
        }
    }

    pub fn init(&mut self) -> Vec<Command> {
        self.history.init()
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn history(&self) -> &HistoryScreen {
        &self.history
    }

    pub fn search(&self) -> &SearchScreen {
        &self.search
    }

    pub fn forecast(&self) -> &ForecastScreen {
        &self.forecast
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        debug!(route = ?self.route, msg = msg.name(), "update");

        match msg {
            Msg::Key(Key::Interrupt) => vec![Command::Quit],
            // Every screen tracks the size so whichever comes next is laid out correctly.
            Msg::Resize(size) => {
                self.history.update(Msg::Resize(size));
                self.search.update(Msg::Resize(size));
                self.forecast.update(Msg::Resize(size));
                vec![]
            }
            Msg::Navigate(transition) => self.navigate(transition),
            msg => match self.route {
                Route::History => self.history.update(msg),
                Route::Search => self.search.update(msg),
                Route::Forecast => self.forecast.update(msg),
            },
        }
    }

    pub fn render(&self) -> String {
        match self.route {
            Route::History => self.history.render(),
            Route::Search => self.search.render(),
            Route::Forecast => self.forecast.render(),
        }
    }

    fn navigate(&mut self, transition: Transition) -> Vec<Command> {
        info!(from = ?self.route, ?transition, "navigate");

        match transition {
            Transition::HistoryPicked(location) | Transition::SearchPicked(location) => {
                self.route = Route::Forecast;
                self.forecast.reset(location);
                self.forecast.init()
            }
            Transition::HistoryDeclined
            | Transition::HistoryToSearch
            | Transition::ForecastToSearch => {
                self.route = Route::Search;
                self.search.reset(());
                self.search.init()
            }
            Transition::SearchToHistory | Transition::ForecastToHistory => {
                self.route = Route::History;
                self.history.reset(());
                self.history.init()
            }
        }
    }
}
