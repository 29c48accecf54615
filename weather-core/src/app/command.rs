//! Side effects requested by the state machine.
//!
//! Commands are plain values. The executor performs them off the loop and
//! posts each result back as a [`Msg`].

use std::time::Duration;

use crate::app::event::{Msg, SpinnerTick, Transition};
use crate::model::{ForecastRequest, GeocodingQuery, Location};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Read the recent-locations store.
    LoadRecent,
    /// Record a location in the recent-locations store.
    SaveRecent(Location),
    SearchLocations(GeocodingQuery),
    FetchForecast(ForecastRequest),
    /// Deliver `tick` after `after` has elapsed.
    Tick { tick: SpinnerTick, after: Duration },
    /// Feed a message straight back into the loop.
    Emit(Msg),
    Quit,
}

impl Command {
    pub fn navigate(transition: Transition) -> Self {
        Command::Emit(Msg::Navigate(transition))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadRecent => "load-recent",
            Command::SaveRecent(_) => "save-recent",
            Command::SearchLocations(_) => "search-locations",
            Command::FetchForecast(_) => "fetch-forecast",
            Command::Tick { .. } => "tick",
            Command::Emit(_) => "emit",
            Command::Quit => "quit",
        }
    }
}
