use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::ApiSettings,
    model::{Forecast, ForecastRequest, GeocodingQuery, Location},
    normalize::RawForecast,
};

use super::{ApiError, WeatherProvider, truncate_body};

/// Client for the Open-Meteo geocoding and forecast APIs.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    forecast_url: String,
    geocoding_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(api: &ApiSettings) -> Self {
        Self {
            forecast_url: api.forecast_url.clone(),
            geocoding_url: api.geocoding_url.clone(),
            http: Client::new(),
        }
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)], what: &str) -> Result<String> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Open-Meteo ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            })
            .with_context(|| format!("Open-Meteo {what} request failed"));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    // Absent when nothing matched.
    #[serde(default)]
    results: Vec<GeocodingResult>,
}

impl From<GeocodingResult> for Location {
    fn from(r: GeocodingResult) -> Self {
        Location {
            name: r.name,
            admin1: r.admin1,
            country: r.country,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

pub(crate) fn geocoding_query(query: &GeocodingQuery) -> Vec<(&'static str, String)> {
    vec![
        ("name", query.name.clone()),
        ("count", query.count.to_string()),
        ("language", "en".to_string()),
        ("format", "json".to_string()),
    ]
}

pub(crate) fn forecast_query(request: &ForecastRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("latitude", request.latitude.to_string()),
        ("longitude", request.longitude.to_string()),
    ];

    if !request.timezone.is_empty() {
        query.push(("timezone", request.timezone.clone()));
    }
    if request.forecast_hours > 0 {
        query.push(("forecast_hours", request.forecast_hours.to_string()));
    }
    if request.forecast_days > 0 {
        query.push(("forecast_days", request.forecast_days.to_string()));
    }
    if let Some(unit) = &request.temperature_unit {
        query.push(("temperature_unit", unit.clone()));
    }
    if let Some(unit) = &request.wind_speed_unit {
        query.push(("wind_speed_unit", unit.clone()));
    }
    if let Some(unit) = &request.precipitation_unit {
        query.push(("precipitation_unit", unit.clone()));
    }
    if !request.current.is_empty() {
        query.push(("current", csv(request.current.iter().map(|v| v.as_str()))));
    }
    if !request.daily.is_empty() {
        query.push(("daily", csv(request.daily.iter().map(|v| v.as_str()))));
    }
    if !request.hourly.is_empty() {
        query.push(("hourly", csv(request.hourly.iter().map(|v| v.as_str()))));
    }

    query
}

fn csv<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(",")
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn search_locations(&self, query: &GeocodingQuery) -> Result<Vec<Location>> {
        let body = self
            .get_text(&self.geocoding_url, &geocoding_query(query), "geocoding")
            .await?;

        let parsed: GeocodingResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo geocoding JSON")?;

        Ok(parsed.results.into_iter().map(Location::from).collect())
    }

    async fn get_forecast(&self, request: &ForecastRequest) -> Result<Forecast> {
        let body = self
            .get_text(&self.forecast_url, &forecast_query(request), "forecast")
            .await?;

        let raw: RawForecast =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo forecast JSON")?;

        Ok(raw.into_forecast())
    }
}
