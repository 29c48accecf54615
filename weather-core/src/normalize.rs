//! Conversion of the loosely-typed forecast payload into [`Forecast`].
//!
//! Values are decoded as raw JSON first. Each variable is then resolved and
//! coerced on its own, so one bad field never costs the whole response.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::model::{CurrentVariable, DailyVariable, Forecast, HourlyVariable, Measurement, Series};

/// Forecast payload as it arrives on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub generation_time_ms: Option<f64>,
    #[serde(default)]
    pub utc_offset_seconds: Option<i64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub timezone_abbreviation: Option<String>,
    #[serde(default)]
    pub current_units: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub current: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub hourly_units: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub hourly: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub daily_units: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub daily: Option<HashMap<String, Value>>,
}

impl RawForecast {
    pub fn into_forecast(self) -> Forecast {
        let current_time = self
            .current
            .as_ref()
            .and_then(|c| c.get("time"))
            .and_then(Value::as_str)
            .map(str::to_owned);

        let hourly_times = labels(self.hourly.as_ref());
        let daily_times = labels(self.daily.as_ref());

        let mut current = BTreeMap::new();
        if let (Some(values), Some(units)) = (&self.current, &self.current_units) {
            for (key, unit) in units {
                let Some(variable) = CurrentVariable::from_wire(key) else {
                    continue;
                };
                let (Some(unit), Some(value)) = (unit.as_str(), values.get(key).and_then(to_f64))
                else {
                    continue;
                };
                current.insert(
                    variable,
                    Measurement {
                        value,
                        unit: unit.to_owned(),
                    },
                );
            }
        }

        let daily = collect_series(
            self.daily.as_ref(),
            self.daily_units.as_ref(),
            daily_times.len(),
            DailyVariable::from_wire,
        );
        let hourly = collect_series(
            self.hourly.as_ref(),
            self.hourly_units.as_ref(),
            hourly_times.len(),
            HourlyVariable::from_wire,
        );

        Forecast {
            latitude: self.latitude.unwrap_or_default(),
            longitude: self.longitude.unwrap_or_default(),
            elevation: self.elevation,
            generation_time_ms: self.generation_time_ms,
            utc_offset_seconds: self.utc_offset_seconds.unwrap_or_default(),
            timezone: self.timezone.unwrap_or_default(),
            timezone_abbreviation: self.timezone_abbreviation.unwrap_or_default(),
            current_time,
            hourly_times,
            daily_times,
            current,
            daily,
            hourly,
        }
    }
}

fn collect_series<V: Ord>(
    values: Option<&HashMap<String, Value>>,
    units: Option<&HashMap<String, Value>>,
    expected_len: usize,
    resolve: impl Fn(&str) -> Option<V>,
) -> BTreeMap<V, Series> {
    let mut out = BTreeMap::new();
    let (Some(values), Some(units)) = (values, units) else {
        return out;
    };

    for (key, unit) in units {
        let Some(variable) = resolve(key) else {
            continue;
        };
        let Some(unit) = unit.as_str() else {
            continue;
        };
        let Some(series) = values.get(key).and_then(to_f64_vec) else {
            continue;
        };
        // A series must line up with its time labels index for index.
        if series.len() != expected_len {
            continue;
        }
        out.insert(
            variable,
            Series {
                values: series,
                unit: unit.to_owned(),
            },
        );
    }

    out
}

/// Time labels are all-or-nothing: any non-string element empties the list.
fn labels(section: Option<&HashMap<String, Value>>) -> Vec<String> {
    section
        .and_then(|s| s.get("time"))
        .and_then(to_string_vec)
        .unwrap_or_default()
}

/// Accepts any JSON number, integer or float. Strings, booleans and null are rejected.
fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn to_f64_vec(value: &Value) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(to_f64).collect()
}

fn to_string_vec(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_owned))
        .collect()
}
