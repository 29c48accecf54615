use crate::model::{Forecast, ForecastRequest, GeocodingQuery, Location};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openmeteo;

pub use openmeteo::OpenMeteoProvider;

/// Failure reported by the remote API itself, as opposed to transport or decoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("unexpected status code {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve free text into zero or more locations.
    async fn search_locations(&self, query: &GeocodingQuery) -> anyhow::Result<Vec<Location>>;

    async fn get_forecast(&self, request: &ForecastRequest) -> anyhow::Result<Forecast>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
