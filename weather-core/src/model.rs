use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A resolved place, as returned by geocoding and kept in the recent list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Two locations are the same place when their coordinates match.
    pub fn same_place(&self, other: &Location) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }

    /// "Name, Region, Country", skipping the parts that are missing.
    pub fn title(&self) -> String {
        let mut place = self.name.clone();
        for part in [&self.admin1, &self.country].into_iter().flatten() {
            if !part.is_empty() {
                place.push_str(", ");
                place.push_str(part);
            }
        }
        place
    }

    /// "Region, Country" or `None` when neither is known.
    pub fn region(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.admin1, &self.country]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// One scalar reading with the unit reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

/// A time-aligned sequence of readings sharing one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub values: Vec<f64>,
    pub unit: String,
}

macro_rules! wire_variables {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Canonical name used on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub const fn all() -> &'static [$name] {
                &[$($name::$variant,)+]
            }

            /// Resolve a wire key; unknown keys yield `None`.
            pub fn from_wire(key: &str) -> Option<Self> {
                match key {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_variables! {
    /// Variables available for current conditions.
    CurrentVariable {
        Temperature2m => "temperature_2m",
        RelativeHumidity2m => "relative_humidity_2m",
        ApparentTemperature => "apparent_temperature",
        IsDay => "is_day",
        WeatherCode => "weather_code",
        CloudCover => "cloud_cover",
        SeaLevelPressure => "pressure_msl",
        SurfacePressure => "surface_pressure",
        Precipitation => "precipitation",
        Rain => "rain",
        Showers => "showers",
        Snowfall => "snowfall",
        WindSpeed10m => "wind_speed_10m",
        WindDirection10m => "wind_direction_10m",
        WindGusts10m => "wind_gusts_10m",
    }
}

wire_variables! {
    /// Variables available as daily series.
    DailyVariable {
        Temperature2mMin => "temperature_2m_min",
        Temperature2mMax => "temperature_2m_max",
        WeatherCode => "weathercode",
        UvIndexMax => "uv_index_max",
    }
}

wire_variables! {
    /// Variables available as hourly series.
    HourlyVariable {
        Temperature2m => "temperature_2m",
        WeatherCode => "weathercode",
        Precipitation => "precipitation",
    }
}

/// Normalized forecast payload.
///
/// Every series has the same length as the time labels of its cadence; a
/// variable that could not be read is absent from its map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub generation_time_ms: Option<f64>,
    pub utc_offset_seconds: i64,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub current_time: Option<String>,
    pub hourly_times: Vec<String>,
    pub daily_times: Vec<String>,
    pub current: BTreeMap<CurrentVariable, Measurement>,
    pub daily: BTreeMap<DailyVariable, Series>,
    pub hourly: BTreeMap<HourlyVariable, Series>,
}

impl Forecast {
    pub fn current_measurement(&self, variable: CurrentVariable) -> Option<&Measurement> {
        self.current.get(&variable)
    }

    pub fn daily_series(&self, variable: DailyVariable) -> Option<&Series> {
        self.daily.get(&variable)
    }

    pub fn hourly_series(&self, variable: HourlyVariable) -> Option<&Series> {
        self.hourly.get(&variable)
    }
}

/// Free-text geocoding lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodingQuery {
    pub name: String,
    pub count: u32,
}

/// Everything needed to ask the provider for a forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA name, or "auto" to let the provider resolve it from coordinates.
    pub timezone: String,
    pub forecast_hours: u32,
    pub forecast_days: u32,
    pub temperature_unit: Option<String>,
    pub wind_speed_unit: Option<String>,
    pub precipitation_unit: Option<String>,
    pub current: Vec<CurrentVariable>,
    pub daily: Vec<DailyVariable>,
    pub hourly: Vec<HourlyVariable>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salinas() -> Location {
        Location {
            name: "Salinas".into(),
            admin1: Some("California".into()),
            country: Some("United States".into()),
            latitude: 36.67774,
            longitude: -121.6555,
        }
    }

    #[test]
    fn wire_names_resolve_back_to_variables() {
        for v in CurrentVariable::all() {
            assert_eq!(CurrentVariable::from_wire(v.as_str()), Some(*v));
        }
        for v in DailyVariable::all() {
            assert_eq!(DailyVariable::from_wire(v.as_str()), Some(*v));
        }
        for v in HourlyVariable::all() {
            assert_eq!(HourlyVariable::from_wire(v.as_str()), Some(*v));
        }
    }

    #[test]
    fn unknown_wire_key_is_none() {
        assert_eq!(CurrentVariable::from_wire("visibility"), None);
        // Daily and hourly codes use the legacy spelling.
        assert_eq!(DailyVariable::from_wire("weather_code"), None);
    }

    #[test]
    fn title_skips_missing_parts() {
        let mut loc = salinas();
        assert_eq!(loc.title(), "Salinas, California, United States");

        loc.admin1 = None;
        assert_eq!(loc.title(), "Salinas, United States");

        loc.country = Some(String::new());
        assert_eq!(loc.title(), "Salinas");
        assert_eq!(loc.region(), None);
    }

    #[test]
    fn identity_is_structural() {
        let a = salinas();
        let mut b = salinas();
        b.name = "Salinas (renamed)".into();
        assert!(a.same_place(&b));

        b.latitude += 0.1;
        assert!(!a.same_place(&b));
    }
}
