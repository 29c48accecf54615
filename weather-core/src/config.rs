use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Forecast horizon and units requested from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub hours: u32,
    pub days: u32,
    /// IANA timezone name, or "auto".
    pub timezone: String,
    pub temperature_unit: TemperatureUnit,
    pub wind_speed_unit: WindSpeedUnit,
    pub precipitation_unit: PrecipitationUnit,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            hours: 6,
            days: 6,
            timezone: "auto".to_string(),
            temperature_unit: TemperatureUnit::Celsius,
            wind_speed_unit: WindSpeedUnit::Kmh,
            precipitation_unit: PrecipitationUnit::Mm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kmh,
    Ms,
    Mph,
    Kn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
    Inch,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }
}

impl WindSpeedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindSpeedUnit::Kmh => "kmh",
            WindSpeedUnit::Ms => "ms",
            WindSpeedUnit::Mph => "mph",
            WindSpeedUnit::Kn => "kn",
        }
    }

    pub const fn all() -> &'static [WindSpeedUnit] {
        &[WindSpeedUnit::Kmh, WindSpeedUnit::Ms, WindSpeedUnit::Mph, WindSpeedUnit::Kn]
    }
}

impl PrecipitationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipitationUnit::Mm => "mm",
            PrecipitationUnit::Inch => "inch",
        }
    }

    pub const fn all() -> &'static [PrecipitationUnit] {
        &[PrecipitationUnit::Mm, PrecipitationUnit::Inch]
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for WindSpeedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for PrecipitationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Maximum number of geocoding matches to request.
    pub count: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { count: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentSettings {
    /// How many recent locations are kept on disk.
    pub limit: usize,
}

impl Default for RecentSettings {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

/// Read-only layout constants handed to every screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Nominal width of one forecast column, right border included.
    pub column_width: usize,
    /// Blank cells between two columns.
    pub column_margin: usize,
    pub label_width: usize,
    pub padding_x: usize,
    pub padding_y: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            column_width: 22,
            column_margin: 2,
            label_width: 10,
            padding_x: 2,
            padding_y: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub forecast_url: String,
    pub geocoding_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [forecast]
/// days = 7
/// temperature_unit = "fahrenheit"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub forecast: ForecastSettings,
    pub search: SearchSettings,
    pub recent: RecentSettings,
    pub layout: Theme,
    pub api: ApiSettings,
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the recent-locations file.
    pub fn recent_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("recent.json"))
    }

    /// Default path for the debug log.
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("weather.log"))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml("").expect("empty config must parse");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.forecast.hours, 6);
        assert_eq!(cfg.search.count, 10);
        assert_eq!(cfg.layout.column_width, 22);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = Config::from_toml(
            r#"
            [forecast]
            days = 3
            temperature_unit = "fahrenheit"

            [layout]
            column_margin = 1
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.forecast.days, 3);
        assert_eq!(cfg.forecast.hours, 6);
        assert_eq!(cfg.forecast.temperature_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(cfg.forecast.wind_speed_unit, WindSpeedUnit::Kmh);
        assert_eq!(cfg.layout.column_margin, 1);
        assert_eq!(cfg.layout.column_width, 22);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let input = "[forecast]\nwind_speed_unit = \"furlongs\"";
        let err = Config::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("furlongs") || err.to_string().contains("variant"));
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut cfg = Config::default();
        cfg.forecast.precipitation_unit = PrecipitationUnit::Inch;
        cfg.recent.limit = 3;

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        assert_eq!(Config::from_toml(&text).expect("parse"), cfg);
    }
}
