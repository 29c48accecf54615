//! Core library for the `weather` terminal UI.
//!
//! This crate defines:
//! - The typed forecast model and the normalization of raw API payloads
//! - The Open-Meteo client behind the [`WeatherProvider`] abstraction
//! - Configuration and the recent-locations store
//! - The screen state machine and its text layout
//!
//! It does no terminal I/O: `weather-cli` feeds it key and resize events and
//! draws whatever [`app::App::render`] returns.

pub mod app;
pub mod config;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod store;
pub mod wmo;

pub use app::{App, CommandExecutor, Route};
pub use config::Config;
pub use model::{Forecast, ForecastRequest, GeocodingQuery, Location};
pub use provider::{ApiError, OpenMeteoProvider, WeatherProvider};
pub use store::{JsonFileStore, RecentStore};
