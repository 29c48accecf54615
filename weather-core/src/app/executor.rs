//! Runs [`Command`]s off the event loop.
//!
//! Each command becomes a spawned task whose outcome is posted back on the
//! loop's channel as a [`Msg`]. Dispatching never blocks, so input and
//! rendering keep going while requests are in flight.

use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::app::command::Command;
use crate::app::event::Msg;
use crate::provider::WeatherProvider;
use crate::store::RecentStore;

#[derive(Debug, Clone)]
pub struct CommandExecutor {
    sender: mpsc::UnboundedSender<Msg>,
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn RecentStore>,
}

impl CommandExecutor {
    pub fn new(
        sender: mpsc::UnboundedSender<Msg>,
        provider: Arc<dyn WeatherProvider>,
        store: Arc<dyn RecentStore>,
    ) -> Self {
        Self {
            sender,
            provider,
            store,
        }
    }

    /// Start every command in order. Breaks as soon as a [`Command::Quit`] is seen.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, commands: Vec<Command>) -> ControlFlow<()> {
        for command in commands {
            debug!(command = command.name(), "dispatch");
            match command {
                Command::Quit => return ControlFlow::Break(()),
                Command::Emit(msg) => self.send(msg),
                Command::LoadRecent => {
                    let store = Arc::clone(&self.store);
                    self.blocking(move || Msg::RecentLoaded(store.load().map_err(describe)));
                }
                Command::SaveRecent(location) => {
                    let store = Arc::clone(&self.store);
                    self.blocking(move || Msg::RecentSaved(store.add(&location).map_err(describe)));
                }
                Command::SearchLocations(query) => {
                    let provider = Arc::clone(&self.provider);
                    let sender = self.sender.clone();
                    tokio::spawn(async move {
                        let result = provider.search_locations(&query).await;
                        post(&sender, Msg::LocationsFound(result.map_err(describe)));
                    });
                }
                Command::FetchForecast(request) => {
                    let provider = Arc::clone(&self.provider);
                    let sender = self.sender.clone();
                    tokio::spawn(async move {
                        let result = provider.get_forecast(&request).await.map(Box::new);
                        post(&sender, Msg::ForecastLoaded(result.map_err(describe)));
                    });
                }
                Command::Tick { tick, after } => {
                    let sender = self.sender.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        post(&sender, Msg::Tick(tick));
                    });
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn send(&self, msg: Msg) {
        post(&self.sender, msg);
    }

    /// File access runs on the blocking pool.
    fn blocking<F>(&self, job: F)
    where
        F: FnOnce() -> Msg + Send + 'static,
    {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            match tokio::task::spawn_blocking(job).await {
                Ok(msg) => post(&sender, msg),
                Err(err) => error!("store task failed: {err}"),
            }
        });
    }
}

fn post(sender: &mpsc::UnboundedSender<Msg>, msg: Msg) {
    // The receiver is gone only once the loop has exited.
    if let Err(err) = sender.send(msg) {
        debug!("dropping {} after shutdown", err.0.name());
    }
}

fn describe(err: anyhow::Error) -> String {
    let text = format!("{err:#}");
    warn!(error = %text, "background command failed");
    text
}
