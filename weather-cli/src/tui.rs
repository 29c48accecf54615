use std::io::{self, Stdout, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info};
use weather_core::{
    App, CommandExecutor, Config, RecentStore, WeatherProvider,
    app::{Key, Msg, Size},
};

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .context("Failed to enter the alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the interactive UI until the user quits.
pub async fn run(
    config: &Config,
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn RecentStore>,
) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let mut events = EventStream::new();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let executor = CommandExecutor::new(tx, provider, store);
    let mut app = App::new(config);

    let (width, height) = terminal::size().context("Failed to read the terminal size")?;
    app.update(Msg::Resize(Size::new(width, height)));
    if executor.dispatch(app.init()).is_break() {
        return Ok(());
    }
    draw(&mut stdout, &app.render())?;

    loop {
        let msg = tokio::select! {
            Some(msg) = rx.recv() => msg,
            event = events.next() => match event {
                Some(Ok(event)) => match translate(&event) {
                    Some(msg) => msg,
                    None => continue,
                },
                Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                None => break,
            },
        };

        if executor.dispatch(app.update(msg)).is_break() {
            info!("quit requested");
            break;
        }
        draw(&mut stdout, &app.render())?;
    }

    Ok(())
}

fn draw(out: &mut Stdout, frame: &str) -> Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for (row, line) in frame.lines().enumerate() {
        let Ok(row) = u16::try_from(row) else {
            break;
        };
        queue!(out, MoveTo(0, row), Print(line))?;
    }
    out.flush().context("Failed to draw frame")
}

fn translate(event: &Event) -> Option<Msg> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key).map(Msg::Key),
        Event::Resize(width, height) => Some(Msg::Resize(Size::new(*width, *height))),
        other => {
            debug!(?other, "ignored terminal event");
            None
        }
    }
}

fn map_key(key: &KeyEvent) -> Option<Key> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Key::Interrupt)
        }
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}
