use tracing::debug;

use crate::app::Screen;
use crate::app::command::Command;
use crate::app::event::{Key, Msg, Size, Transition};
use crate::app::layout::{frame, inner_width};
use crate::app::widgets::SelectList;
use crate::config::Theme;
use crate::model::Location;

const HELP: &str = "↑ up • ↓ down • enter pick • n new search • q quit";

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryState {
    Loading,
    Ready,
    Empty,
    Error(String),
}

/// Picker over the recently viewed locations.
#[derive(Debug)]
pub struct HistoryScreen {
    theme: Theme,
    size: Size,
    state: HistoryState,
    list: SelectList,
}

impl HistoryScreen {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            size: Size::default(),
            state: HistoryState::Loading,
            list: SelectList::default(),
        }
    }

    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    pub fn items(&self) -> &[Location] {
        self.list.items()
    }

    fn on_loaded(&mut self, result: Result<Vec<Location>, String>) -> Vec<Command> {
        let mut locations = match result {
            Ok(locations) => locations,
            Err(err) => {
                self.state = HistoryState::Error(err);
                return vec![];
            }
        };

        debug!(count = locations.len(), "recent locations loaded");
        match locations.len() {
            0 => {
                self.state = HistoryState::Empty;
                vec![Command::navigate(Transition::HistoryDeclined)]
            }
            1 => {
                let only = locations.remove(0);
                vec![Command::navigate(Transition::HistoryPicked(only))]
            }
            _ => {
                self.list.set_items(locations);
                self.state = HistoryState::Ready;
                vec![]
            }
        }
    }

    fn on_key(&mut self, key: Key) -> Vec<Command> {
        match key {
            Key::Char('q') => vec![Command::Quit],
            Key::Char('n') => vec![Command::navigate(Transition::HistoryToSearch)],
            Key::Enter if self.state == HistoryState::Ready => self
                .list
                .selected()
                .map(|loc| vec![Command::navigate(Transition::HistoryPicked(loc.clone()))])
                .unwrap_or_default(),
            Key::Up | Key::Down if self.state == HistoryState::Ready => {
                self.list.handle_key(key);
                vec![]
            }
            _ => vec![],
        }
    }
}

impl Screen for HistoryScreen {
    type Args = ();

    fn init(&mut self) -> Vec<Command> {
        self.state = HistoryState::Loading;
        vec![Command::LoadRecent]
    }

    fn reset(&mut self, _: ()) {
        self.list.reset_selected();
        self.state = HistoryState::Loading;
    }

    fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::Resize(size) => {
                self.size = size;
                vec![]
            }
            Msg::Key(key) => self.on_key(key),
            // Only a load this screen is waiting for may drive it.
            Msg::RecentLoaded(result) if self.state == HistoryState::Loading => {
                self.on_loaded(result)
            }
            _ => vec![],
        }
    }

    fn render(&self) -> String {
        if !self.size.is_known() {
            return frame("Init...", &self.theme);
        }

        let content = match &self.state {
            HistoryState::Loading => "Loading...".to_string(),
            HistoryState::Empty => "No recent locations".to_string(),
            HistoryState::Error(err) => format!(
                "Could not load recent locations:\n{err}\n\nPress 'n' to search or 'q' to quit."
            ),
            HistoryState::Ready => {
                let chrome = self.theme.padding_y * 2 + 4;
                let height = usize::from(self.size.height).saturating_sub(chrome);
                let width = inner_width(self.size.width, &self.theme);
                format!("Recent locations:\n\n{}\n\n{HELP}", self.list.render(width, height))
            }
        };

        frame(&content, &self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, lat: f64) -> Location {
        Location {
            name: name.into(),
            admin1: None,
            country: None,
            latitude: lat,
            longitude: 1.0,
        }
    }

    fn ready_screen(names: &[&str]) -> HistoryScreen {
        let mut screen = HistoryScreen::new(Theme::default());
        screen.update(Msg::Resize(Size::new(80, 24)));
        assert_eq!(screen.init(), vec![Command::LoadRecent]);
        let locations = names
            .iter()
            .enumerate()
            .map(|(i, n)| place(n, i as f64))
            .collect();
        screen.update(Msg::RecentLoaded(Ok(locations)));
        screen
    }

    #[test]
    fn no_saved_locations_declines() {
        let mut screen = HistoryScreen::new(Theme::default());
        screen.init();
        let cmds = screen.update(Msg::RecentLoaded(Ok(vec![])));

        assert_eq!(cmds, vec![Command::navigate(Transition::HistoryDeclined)]);
        assert_eq!(screen.state(), &HistoryState::Empty);
    }

    #[test]
    fn single_saved_location_is_picked_automatically() {
        let mut screen = HistoryScreen::new(Theme::default());
        screen.init();
        let cmds = screen.update(Msg::RecentLoaded(Ok(vec![place("Lima", 1.0)])));

        let picked = Transition::HistoryPicked(place("Lima", 1.0));
        assert_eq!(cmds, vec![Command::navigate(picked)]);
    }

    #[test]
    fn several_locations_wait_for_a_pick() {
        let mut screen = ready_screen(&["Lima", "Quito", "Cusco"]);
        assert_eq!(screen.state(), &HistoryState::Ready);
        assert!(screen.render().contains("> Lima"));

        assert!(screen.update(Msg::Key(Key::Down)).is_empty());
        assert!(screen.update(Msg::Key(Key::Down)).is_empty());
        let cmds = screen.update(Msg::Key(Key::Enter));

        let picked = Transition::HistoryPicked(place("Cusco", 2.0));
        assert_eq!(cmds, vec![Command::navigate(picked)]);
    }

    #[test]
    fn load_error_is_shown() {
        let mut screen = HistoryScreen::new(Theme::default());
        screen.update(Msg::Resize(Size::new(80, 24)));
        screen.init();
        screen.update(Msg::RecentLoaded(Err("permission denied".into())));

        assert!(matches!(screen.state(), HistoryState::Error(_)));
        assert!(screen.render().contains("permission denied"));
        assert_eq!(
            screen.update(Msg::Key(Key::Char('n'))),
            vec![Command::navigate(Transition::HistoryToSearch)]
        );
    }

    #[test]
    fn late_load_result_is_ignored_once_ready() {
        let mut screen = ready_screen(&["Lima", "Quito"]);
        let cmds = screen.update(Msg::RecentLoaded(Ok(vec![])));
        assert!(cmds.is_empty());
        assert_eq!(screen.items().len(), 2);
    }

    #[test]
    fn reset_restores_loading_and_first_selection() {
        let mut screen = ready_screen(&["Lima", "Quito"]);
        screen.update(Msg::Key(Key::Down));
        screen.reset(());
        assert_eq!(screen.state(), &HistoryState::Loading);

        screen.update(Msg::RecentLoaded(Ok(vec![
            place("Lima", 0.0),
            place("Quito", 1.0),
        ])));
        let picked = Transition::HistoryPicked(place("Lima", 0.0));
        assert_eq!(
            screen.update(Msg::Key(Key::Enter)),
            vec![Command::navigate(picked)]
        );
    }

    #[test]
    fn renders_init_before_first_resize() {
        let screen = HistoryScreen::new(Theme::default());
        assert_eq!(screen.render(), "\n  Init...\n");
    }
}
