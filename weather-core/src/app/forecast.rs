use tracing::{debug, warn};

use crate::app::Screen;
use crate::app::command::Command;
use crate::app::event::{Key, Msg, Size, Transition};
use crate::app::layout::{frame, inner_width, render_forecast};
use crate::app::widgets::Spinner;
use crate::config::{ForecastSettings, Theme};
use crate::model::{
    CurrentVariable, DailyVariable, Forecast, ForecastRequest, HourlyVariable, Location,
};

const HELP: &str = "n new search • b recent locations • r refresh • ↑/↓ scroll • q quit";

const CURRENT: &[CurrentVariable] = &[
    CurrentVariable::Temperature2m,
    CurrentVariable::ApparentTemperature,
    CurrentVariable::RelativeHumidity2m,
    CurrentVariable::IsDay,
    CurrentVariable::WeatherCode,
    CurrentVariable::WindSpeed10m,
    CurrentVariable::WindDirection10m,
    CurrentVariable::WindGusts10m,
    CurrentVariable::Precipitation,
    CurrentVariable::SeaLevelPressure,
];

const DAILY: &[DailyVariable] = &[
    DailyVariable::Temperature2mMin,
    DailyVariable::Temperature2mMax,
    DailyVariable::WeatherCode,
    DailyVariable::UvIndexMax,
];

const HOURLY: &[HourlyVariable] = &[
    HourlyVariable::Temperature2m,
    HourlyVariable::WeatherCode,
    HourlyVariable::Precipitation,
];

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastState {
    Loading,
    Ready,
    Error(String),
}

/// Forecast for one location.
///
/// Nothing derived from the forecast is cached; the body is laid out again on
/// every render.
#[derive(Debug)]
pub struct ForecastScreen {
    theme: Theme,
    settings: ForecastSettings,
    size: Size,
    state: ForecastState,
    location: Option<Location>,
    forecast: Option<Forecast>,
    spinner: Spinner,
    scroll: usize,
}

impl ForecastScreen {
    pub fn new(settings: ForecastSettings, theme: Theme) -> Self {
        Self {
            theme,
            settings,
            size: Size::default(),
            state: ForecastState::Loading,
            location: None,
            forecast: None,
            spinner: Spinner::new(),
            scroll: 0,
        }
    }

    pub fn state(&self) -> &ForecastState {
        &self.state
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        self.forecast.as_ref()
    }

    fn request(&self, location: &Location) -> ForecastRequest {
        let s = &self.settings;
        ForecastRequest {
            latitude: location.latitude,
            longitude: location.longitude,
            timezone: s.timezone.clone(),
            forecast_hours: s.hours,
            forecast_days: s.days,
            temperature_unit: Some(s.temperature_unit.as_str().to_string()),
            wind_speed_unit: Some(s.wind_speed_unit.as_str().to_string()),
            precipitation_unit: Some(s.precipitation_unit.as_str().to_string()),
            current: CURRENT.to_vec(),
            daily: DAILY.to_vec(),
            hourly: HOURLY.to_vec(),
        }
    }

    fn fetch(&mut self) -> Vec<Command> {
        let Some(location) = self.location.clone() else {
            return vec![];
        };
        self.state = ForecastState::Loading;
        vec![
            Command::FetchForecast(self.request(&location)),
            self.spinner.restart(),
        ]
    }

    fn body(&self) -> Option<String> {
        let (Some(location), Some(forecast)) = (&self.location, &self.forecast) else {
            return None;
        };
        let width = inner_width(self.size.width, &self.theme);
        Some(render_forecast(width, location, forecast, &self.theme))
    }

    /// Rows available to the scrollable body.
    fn viewport_height(&self) -> usize {
        let chrome = self.theme.padding_y * 2 + 2;
        usize::from(self.size.height).saturating_sub(chrome).max(1)
    }

    fn max_scroll(&self) -> usize {
        self.body()
            .map(|b| b.lines().count().saturating_sub(self.viewport_height()))
            .unwrap_or(0)
    }

    fn on_key(&mut self, key: Key) -> Vec<Command> {
        match key {
            Key::Char('n') => vec![Command::navigate(Transition::ForecastToSearch)],
            Key::Char('b') => vec![Command::navigate(Transition::ForecastToHistory)],
            Key::Char('q') => vec![Command::Quit],
            // One fetch in flight at a time: refresh is ignored while loading.
            Key::Char('r') if self.state != ForecastState::Loading => self.fetch(),
            Key::Up if self.state == ForecastState::Ready => {
                self.scroll = self.scroll.saturating_sub(1);
                vec![]
            }
            Key::Down if self.state == ForecastState::Ready => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
                vec![]
            }
            _ => vec![],
        }
    }
}

impl Screen for ForecastScreen {
    type Args = Location;

    /// Persist the location, fetch its forecast and start the spinner, all at once.
    fn init(&mut self) -> Vec<Command> {
        let Some(location) = self.location.clone() else {
            return vec![];
        };
        let mut cmds = vec![Command::SaveRecent(location)];
        cmds.extend(self.fetch());
        cmds
    }

    fn reset(&mut self, location: Location) {
        self.location = Some(location);
        self.forecast = None;
        self.state = ForecastState::Loading;
        self.spinner = Spinner::new();
        self.scroll = 0;
    }

    fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::Resize(size) => {
                self.size = size;
                self.scroll = self.scroll.min(self.max_scroll());
                vec![]
            }
            Msg::Key(key) => self.on_key(key),
            Msg::Tick(tick) if self.state == ForecastState::Loading => {
                self.spinner.update(tick).into_iter().collect()
            }
            // Accepted in any state: the latest arrival replaces whatever is shown.
            Msg::ForecastLoaded(Ok(forecast)) => {
                debug!(timezone = %forecast.timezone, "forecast received");
                self.forecast = Some(*forecast);
                self.state = ForecastState::Ready;
                self.scroll = 0;
                vec![]
            }
            Msg::ForecastLoaded(Err(err)) => {
                self.state = ForecastState::Error(err);
                vec![]
            }
            Msg::RecentSaved(Err(err)) => {
                warn!(error = %err, "failed to save recent location");
                vec![]
            }
            _ => vec![],
        }
    }

    fn render(&self) -> String {
        if !self.size.is_known() {
            return frame("Init...", &self.theme);
        }

        let content = match &self.state {
            ForecastState::Loading => format!("Loading forecast{}", self.spinner.view()),
            ForecastState::Error(err) => format!(
                "An error has occurred:\n{err}\n\nPress 'r' to retry, 'n' to search or 'q' to quit."
            ),
            ForecastState::Ready => {
                let body = self.body().unwrap_or_default();
                let height = self.viewport_height();
                let scroll = self.scroll.min(self.max_scroll());
                let visible: Vec<&str> = body.lines().skip(scroll).take(height).collect();
                format!("{}\n\n{HELP}", visible.join("\n"))
            }
        };

        frame(&content, &self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Measurement, Series};

    fn salinas() -> Location {
        Location {
            name: "Salinas".into(),
            admin1: Some("California".into()),
            country: Some("United States".into()),
            latitude: 36.67774,
            longitude: -121.6555,
        }
    }

    fn sample(temp: f64) -> Box<Forecast> {
        let mut f = Forecast {
            timezone: "America/Los_Angeles".into(),
            hourly_times: vec!["2026-10-18T10:00".into(), "2026-10-18T11:00".into()],
            daily_times: vec!["2026-10-18".into(), "2026-10-19".into()],
            ..Forecast::default()
        };
        f.current.insert(
            CurrentVariable::Temperature2m,
            Measurement {
                value: temp,
                unit: "°C".into(),
            },
        );
        f.hourly.insert(
            HourlyVariable::Temperature2m,
            Series {
                values: vec![temp, temp + 1.0],
                unit: "°C".into(),
            },
        );
        Box::new(f)
    }

    fn entered(size: Size) -> (ForecastScreen, Vec<Command>) {
        let mut screen = ForecastScreen::new(ForecastSettings::default(), Theme::default());
        screen.update(Msg::Resize(size));
        screen.reset(salinas());
        let cmds = screen.init();
        (screen, cmds)
    }

    fn fetches(cmds: &[Command]) -> usize {
        cmds.iter()
            .filter(|c| matches!(c, Command::FetchForecast(_)))
            .count()
    }

    #[test]
    fn entry_saves_fetches_and_ticks() {
        let (screen, cmds) = entered(Size::new(80, 40));

        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0], Command::SaveRecent(salinas()));
        let Command::FetchForecast(req) = &cmds[1] else {
            panic!("expected fetch, got {:?}", cmds[1]);
        };
        assert_eq!(req.latitude, 36.67774);
        assert_eq!(req.timezone, "auto");
        assert_eq!(req.forecast_hours, 6);
        assert_eq!(req.temperature_unit.as_deref(), Some("celsius"));
        assert!(req.hourly.contains(&HourlyVariable::Precipitation));
        assert!(matches!(cmds[2], Command::Tick { .. }));

        assert_eq!(screen.state(), &ForecastState::Loading);
        assert!(screen.render().contains("Loading forecast"));
    }

    #[test]
    fn loaded_forecast_is_rendered() {
        let (mut screen, _) = entered(Size::new(80, 40));
        screen.update(Msg::ForecastLoaded(Ok(sample(17.0))));

        assert_eq!(screen.state(), &ForecastState::Ready);
        let out = screen.render();
        assert!(out.contains("Salinas"));
        assert!(out.contains("17.0 °C"));
        assert!(out.contains("Next few hours"));
        assert!(out.contains("Next few days"));
        assert!(out.contains("r refresh"));
    }

    #[test]
    fn refresh_refetches_without_saving_again() {
        let (mut screen, _) = entered(Size::new(80, 40));
        screen.update(Msg::ForecastLoaded(Ok(sample(17.0))));

        let cmds = screen.update(Msg::Key(Key::Char('r')));
        assert_eq!(screen.state(), &ForecastState::Loading);
        assert_eq!(fetches(&cmds), 1);
        assert!(!cmds.iter().any(|c| matches!(c, Command::SaveRecent(_))));

        // Already loading: a second refresh issues nothing.
        assert!(screen.update(Msg::Key(Key::Char('r'))).is_empty());
    }

    #[test]
    fn error_state_offers_retry() {
        let (mut screen, _) = entered(Size::new(80, 40));
        let err = "unexpected status code 502".to_string();
        screen.update(Msg::ForecastLoaded(Err(err)));

        assert!(matches!(screen.state(), ForecastState::Error(_)));
        assert!(screen.render().contains("unexpected status code 502"));
        assert_eq!(fetches(&screen.update(Msg::Key(Key::Char('r')))), 1);
    }

    #[test]
    fn latest_arrival_wins() {
        let (mut screen, _) = entered(Size::new(80, 40));
        screen.update(Msg::ForecastLoaded(Ok(sample(17.0))));
        screen.update(Msg::Key(Key::Char('r')));
        screen.update(Msg::ForecastLoaded(Ok(sample(20.0))));
        // A stale response landing afterwards still replaces the data.
        screen.update(Msg::ForecastLoaded(Ok(sample(17.0))));

        let shown = screen.forecast().unwrap();
        assert_eq!(shown.current[&CurrentVariable::Temperature2m].value, 17.0);
    }

    #[test]
    fn navigation_keys() {
        let (mut screen, _) = entered(Size::new(80, 40));
        assert_eq!(
            screen.update(Msg::Key(Key::Char('n'))),
            vec![Command::navigate(Transition::ForecastToSearch)]
        );
        assert_eq!(
            screen.update(Msg::Key(Key::Char('b'))),
            vec![Command::navigate(Transition::ForecastToHistory)]
        );
        assert_eq!(screen.update(Msg::Key(Key::Char('q'))), vec![Command::Quit]);
    }

    #[test]
    fn body_scrolls_within_bounds() {
        let (mut screen, _) = entered(Size::new(80, 12));
        screen.update(Msg::ForecastLoaded(Ok(sample(17.0))));
        let top = screen.render();

        for _ in 0..100 {
            screen.update(Msg::Key(Key::Down));
        }
        let bottom = screen.render();
        assert_ne!(top, bottom);
        assert!(bottom.contains("Next few days"));

        for _ in 0..100 {
            screen.update(Msg::Key(Key::Up));
        }
        assert_eq!(screen.render(), top);
    }

    #[test]
    fn stale_ticks_are_inert_after_loading() {
        let (mut screen, cmds) = entered(Size::new(80, 40));
        let Command::Tick { tick, .. } = cmds[2].clone() else {
            panic!("expected tick");
        };
        screen.update(Msg::ForecastLoaded(Ok(sample(17.0))));
        assert!(screen.update(Msg::Tick(tick)).is_empty());
    }

    #[test]
    fn reset_restarts_the_spinner() {
        let (mut screen, cmds) = entered(Size::new(80, 40));
        let Command::Tick { tick, .. } = cmds[2].clone() else {
            panic!("expected tick");
        };

        screen.reset(salinas());
        screen.init();
        assert!(screen.update(Msg::Tick(tick)).is_empty());
    }
}
