//! Text layout for the forecast view.
//!
//! Columns have a fixed nominal width (right border included) and are
//! separated by a margin. As many columns as fit in the available width are
//! shown; below one column a notice is rendered instead. Everything here is a
//! pure function of its inputs.

use chrono::{NaiveDate, NaiveDateTime};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Theme;
use crate::model::{CurrentVariable, DailyVariable, Forecast, HourlyVariable, Location, Series};
use crate::wmo;

pub const TOO_SMALL: &str = "The terminal window is too small";
pub const HOURLY_UNAVAILABLE: &str = "Hourly forecast unavailable";
pub const DAILY_UNAVAILABLE: &str = "Daily forecast unavailable";
pub const PLACEHOLDER: &str = "-";

const BORDER: char = '│';
const DIVIDER: char = '─';

/// Number of columns that fit in `width`: `floor((width + margin) / (column + margin))`.
pub fn max_columns(width: usize, theme: &Theme) -> usize {
    let step = theme.column_width + theme.column_margin;
    if step == 0 {
        return 0;
    }
    (width + theme.column_margin) / step
}

/// Pad or truncate `text` to exactly `width` terminal columns.
pub fn fit(text: &str, width: usize) -> String {
    let used = text.width();
    if used <= width {
        return format!("{text}{}", " ".repeat(width - used));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    // A wide character that did not fit leaves a gap to fill.
    out.push_str(&" ".repeat(width - 1 - used));
    out
}

/// Lay columns side by side. Every column but the last gets a right border and the margin.
pub fn render_columns(columns: &[Vec<String>], theme: &Theme) -> String {
    let content = theme.column_width.saturating_sub(1);
    let gap = " ".repeat(theme.column_margin);
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);

    (0..rows)
        .map(|row| {
            let mut line = String::new();
            for (i, column) in columns.iter().enumerate() {
                let cell = column.get(row).map(String::as_str).unwrap_or("");
                line.push_str(&fit(cell, content));
                if i + 1 < columns.len() {
                    line.push(BORDER);
                    line.push_str(&gap);
                }
            }
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The hours after the current one, as many as fit.
pub fn render_hourly(width: usize, forecast: &Forecast, theme: &Theme) -> String {
    let allowed = max_columns(width, theme);
    if allowed < 1 {
        return TOO_SMALL.to_string();
    }
    // "now" plus at least one future slot.
    if forecast.hourly_times.len() < 2 {
        return HOURLY_UNAVAILABLE.to_string();
    }

    let codes = forecast.hourly_series(HourlyVariable::WeatherCode);
    let temps = forecast.hourly_series(HourlyVariable::Temperature2m);
    let precip = forecast.hourly_series(HourlyVariable::Precipitation);

    let slots = &forecast.hourly_times[1..];
    let columns: Vec<Vec<String>> = slots
        .iter()
        .take(allowed)
        .enumerate()
        .map(|(i, label)| {
            let idx = i + 1;
            let mut metric = series_value(temps, idx)
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            if let Some(p) = series_value(precip, idx) {
                metric = format!("{metric}, {p}");
            }
            vec![format_hourly_time(label), condition(codes, idx), metric]
        })
        .collect();

    format!("Next few hours\n{}", render_columns(&columns, theme))
}

/// The days after today, as many as fit.
pub fn render_daily(width: usize, forecast: &Forecast, theme: &Theme) -> String {
    let allowed = max_columns(width, theme);
    if allowed < 1 {
        return TOO_SMALL.to_string();
    }
    if forecast.daily_times.len() < 2 {
        return DAILY_UNAVAILABLE.to_string();
    }

    let codes = forecast.daily_series(DailyVariable::WeatherCode);
    let mins = forecast.daily_series(DailyVariable::Temperature2mMin);
    let maxs = forecast.daily_series(DailyVariable::Temperature2mMax);

    let slots = &forecast.daily_times[1..];
    let columns: Vec<Vec<String>> = slots
        .iter()
        .take(allowed)
        .enumerate()
        .map(|(i, label)| {
            let idx = i + 1;
            vec![
                format_daily_date(label),
                condition(codes, idx),
                labeled("Min", series_value(mins, idx), theme),
                labeled("Max", series_value(maxs, idx), theme),
            ]
        })
        .collect();

    format!("Next few days\n{}", render_columns(&columns, theme))
}

/// Today's extremes plus the current wind and atmosphere readings.
///
/// Three columns when they fit, otherwise stacked.
pub fn render_details(width: usize, forecast: &Forecast, theme: &Theme) -> String {
    let current = |v: CurrentVariable| {
        forecast
            .current_measurement(v)
            .map(|m| format_value(m.value, &m.unit))
    };
    let today = |v: DailyVariable| series_value(forecast.daily_series(v), 0);
    let uv = forecast
        .daily_series(DailyVariable::UvIndexMax)
        .and_then(|s| s.values.first())
        .map(|v| format!("{v:.1}"));

    let columns = vec![
        vec![
            labeled("Min", today(DailyVariable::Temperature2mMin), theme),
            labeled("Max", today(DailyVariable::Temperature2mMax), theme),
            labeled("UV index", uv, theme),
        ],
        vec![
            labeled("Wind", current(CurrentVariable::WindSpeed10m), theme),
            labeled("Gusts", current(CurrentVariable::WindGusts10m), theme),
            labeled(
                "Direction",
                current(CurrentVariable::WindDirection10m),
                theme,
            ),
        ],
        vec![
            labeled(
                "Humidity",
                current(CurrentVariable::RelativeHumidity2m),
                theme,
            ),
            labeled("Precip", current(CurrentVariable::Precipitation), theme),
            labeled(
                "Pressure",
                current(CurrentVariable::SeaLevelPressure),
                theme,
            ),
        ],
    ];

    if max_columns(width, theme) >= columns.len() {
        render_columns(&columns, theme)
    } else {
        columns.concat().join("\n")
    }
}

pub fn render_header(location: &Location, forecast: &Forecast) -> String {
    let mut lines = vec![location.name.clone()];
    if let Some(region) = location.region() {
        lines.push(region);
    }
    if !forecast.timezone.is_empty() {
        let offset = format_utc_offset(forecast.utc_offset_seconds);
        if forecast.timezone_abbreviation.is_empty() {
            lines.push(format!("{} ({offset})", forecast.timezone));
        } else {
            lines.push(format!(
                "{} ({}, {offset})",
                forecast.timezone, forecast.timezone_abbreviation
            ));
        }
    }
    lines.join("\n")
}

pub fn render_current(forecast: &Forecast) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(code) = forecast.current_measurement(CurrentVariable::WeatherCode) {
        let icon = wmo::icon(code.value);
        if !icon.is_empty() {
            lines.extend(icon.lines().map(str::to_owned));
        }
        let description = wmo::describe(code.value);
        if !description.is_empty() {
            lines.push(description.to_string());
        }
    }
    if let Some(temp) = forecast.current_measurement(CurrentVariable::Temperature2m) {
        lines.push(format_value(temp.value, &temp.unit));
    }
    if let Some(feels) = forecast.current_measurement(CurrentVariable::ApparentTemperature) {
        lines.push(format!("(feels like {})", format_value(feels.value, &feels.unit)));
    }

    if lines.is_empty() {
        return "Current conditions unavailable".to_string();
    }
    lines.join("\n")
}

/// Full forecast body for an inner width.
pub fn render_forecast(
    width: usize,
    location: &Location,
    forecast: &Forecast,
    theme: &Theme,
) -> String {
    let divider: String = std::iter::repeat_n(DIVIDER, width).collect();

    [
        render_header(location, forecast),
        String::new(),
        render_current(forecast),
        String::new(),
        render_details(width, forecast, theme),
        divider.clone(),
        render_hourly(width, forecast, theme),
        String::new(),
        divider,
        render_daily(width, forecast, theme),
    ]
    .join("\n")
}

/// Surround content with the theme padding.
pub fn frame(content: &str, theme: &Theme) -> String {
    let pad = " ".repeat(theme.padding_x);
    let mut lines: Vec<String> = vec![String::new(); theme.padding_y];
    lines.extend(content.lines().map(|l| {
        if l.is_empty() {
            String::new()
        } else {
            format!("{pad}{l}")
        }
    }));
    lines.extend(vec![String::new(); theme.padding_y]);
    lines.join("\n")
}

/// Width left for content once the horizontal padding is taken.
pub fn inner_width(total: u16, theme: &Theme) -> usize {
    usize::from(total).saturating_sub(theme.padding_x * 2)
}

pub fn format_value(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        format!("{value:.1}")
    } else {
        format!("{value:.1} {unit}")
    }
}

/// "2026-10-18T15:00" becomes "3 PM".
pub fn format_hourly_time(raw: &str) -> String {
    if raw.is_empty() {
        return PLACEHOLDER.to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        Ok(t) => t.format("%-I %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// "2026-10-19" becomes "Mon 19".
pub fn format_daily_date(raw: &str) -> String {
    if raw.is_empty() {
        return PLACEHOLDER.to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => d.format("%a %-d").to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn format_utc_offset(seconds: i64) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    format!("UTC{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}

fn series_value(series: Option<&Series>, idx: usize) -> Option<String> {
    let series = series?;
    series
        .values
        .get(idx)
        .map(|v| format_value(*v, &series.unit))
}

fn condition(codes: Option<&Series>, idx: usize) -> String {
    codes
        .and_then(|s| s.values.get(idx))
        .map(|code| wmo::describe(*code))
        .filter(|d| !d.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string()
}

fn labeled(label: &str, value: Option<String>, theme: &Theme) -> String {
    let value = value.unwrap_or_else(|| PLACEHOLDER.to_string());
    format!("{}{value}", fit(label, theme.label_width))
}
