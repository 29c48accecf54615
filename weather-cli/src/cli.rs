use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select};
use tracing::info;
use weather_core::{
    Config, JsonFileStore, OpenMeteoProvider, RecentStore,
    config::{PrecipitationUnit, TemperatureUnit, WindSpeedUnit},
    wmo,
};

use crate::tui;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather forecasts in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Write logs to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Write debug logs to the default log file.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive forecast view (the default).
    Run,

    /// Interactively edit forecast units and limits.
    Configure,

    /// Print the weather icons.
    Icons {
        /// Only print the icon for this WMO code.
        #[arg(long)]
        code: Option<u8>,
    },

    /// List or clear recently viewed locations.
    Recent {
        /// Forget every saved location instead of listing them.
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        self.init_logging()?;

        match self.command.unwrap_or(Command::Run) {
            Command::Run => {
                let config = Config::load()?;
                let provider = Arc::new(OpenMeteoProvider::new(&config.api));
                let store = Arc::new(recent_store(&config)?);
                tui::run(&config, provider, store).await?;
            }
            Command::Configure => configure()?,
            Command::Icons { code } => print_icons(code)?,
            Command::Recent { clear } => {
                let config = Config::load()?;
                let store = recent_store(&config)?;
                if clear {
                    store.clear()?;
                    println!("Cleared {}", store.path().display());
                } else {
                    print_recent(&store)?;
                }
            }
        }

        Ok(())
    }

    /// Logs go to a file: stdout belongs to the terminal UI.
    fn init_logging(&self) -> Result<()> {
        let path = match (&self.log_file, self.debug) {
            (Some(path), _) => path.clone(),
            (None, true) => Config::log_file_path()?,
            (None, false) => return Ok(()),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .init();

        info!(path = %path.display(), "logging started");
        Ok(())
    }
}

fn recent_store(config: &Config) -> Result<JsonFileStore> {
    Ok(JsonFileStore::new(Config::recent_file_path()?, config.recent.limit))
}

fn print_recent(store: &JsonFileStore) -> Result<()> {
    let locations = store.load()?;
    if locations.is_empty() {
        println!("No recent locations");
        return Ok(());
    }
    for location in locations {
        println!(
            "{:<40} {:>9.4} {:>10.4}",
            location.title(),
            location.latitude,
            location.longitude
        );
    }
    Ok(())
}

fn print_icons(code: Option<u8>) -> Result<()> {
    let codes = match code {
        Some(code) if wmo::icon(f64::from(code)).is_empty() => {
            bail!("No icon for WMO code {code}")
        }
        Some(code) => vec![code],
        None => wmo::icon_codes(),
    };

    for code in codes {
        let value = f64::from(code);
        println!("{code:>2} {}", wmo::describe(value));
        println!("{}\n", wmo::icon(value));
    }
    Ok(())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;
    let forecast = &mut config.forecast;

    forecast.hours = CustomType::<u32>::new("Hours in the hourly forecast:")
        .with_default(forecast.hours)
        .prompt()?;
    forecast.days = CustomType::<u32>::new("Days in the daily forecast:")
        .with_default(forecast.days)
        .prompt()?;
    forecast.temperature_unit = pick(
        "Temperature unit:",
        TemperatureUnit::all(),
        forecast.temperature_unit,
    )?;
    forecast.wind_speed_unit = pick(
        "Wind speed unit:",
        WindSpeedUnit::all(),
        forecast.wind_speed_unit,
    )?;
    forecast.precipitation_unit = pick(
        "Precipitation unit:",
        PrecipitationUnit::all(),
        forecast.precipitation_unit,
    )?;

    config.search.count = CustomType::<u32>::new("Locations per search:")
        .with_default(config.search.count)
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn pick<T>(message: &str, options: &[T], current: T) -> Result<T>
where
    T: Copy + PartialEq + std::fmt::Display,
{
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    Ok(Select::new(message, options.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?)
}
