use crate::app::Screen;
use crate::app::command::Command;
use crate::app::event::{Key, Msg, Size, Transition};
use crate::app::layout::{frame, inner_width};
use crate::app::widgets::{SelectList, Spinner, TextInput};
use crate::config::Theme;
use crate::model::{GeocodingQuery, Location};

const INPUT_HELP: &str = "enter search • esc recent locations";
const PICK_HELP: &str = "↑ up • ↓ down • enter pick • n new search • q quit";
const CHAR_LIMIT: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Input,
    Loading,
    Pick,
    Error(String),
}

/// Free-text location search backed by geocoding.
#[derive(Debug)]
pub struct SearchScreen {
    theme: Theme,
    size: Size,
    count: u32,
    state: SearchState,
    input: TextInput,
    list: SelectList,
    spinner: Spinner,
    last_query: String,
}

impl SearchScreen {
    pub fn new(count: u32, theme: Theme) -> Self {
        Self {
            theme,
            size: Size::default(),
            count,
            state: SearchState::Input,
            input: TextInput::new("Salinas", CHAR_LIMIT),
            list: SelectList::default(),
            spinner: Spinner::new(),
            last_query: String::new(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn input(&self) -> &str {
        self.input.value()
    }

    fn back_to_input(&mut self) {
        self.input.clear();
        self.list.reset_selected();
        self.state = SearchState::Input;
    }

    fn submit(&mut self) -> Vec<Command> {
        let name = self.input.value().trim().to_string();
        if name.is_empty() {
            return vec![];
        }

        self.last_query = name.clone();
        self.state = SearchState::Loading;
        vec![
            Command::SearchLocations(GeocodingQuery {
                name,
                count: self.count,
            }),
            self.spinner.restart(),
        ]
    }

    fn on_found(&mut self, result: Result<Vec<Location>, String>) -> Vec<Command> {
        match result {
            Ok(mut locations) if locations.len() == 1 => {
                let picked = locations.remove(0);
                vec![Command::navigate(Transition::SearchPicked(picked))]
            }
            Ok(locations) => {
                self.list.set_items(locations);
                self.state = SearchState::Pick;
                vec![]
            }
            Err(err) => {
                self.state = SearchState::Error(err);
                vec![]
            }
        }
    }

    fn on_key(&mut self, key: Key) -> Vec<Command> {
        match (self.state.clone(), key) {
            (SearchState::Input, Key::Enter) => self.submit(),
            (SearchState::Input, Key::Esc) => vec![Command::navigate(Transition::SearchToHistory)],
            (SearchState::Input, key) => {
                self.input.handle_key(key);
                vec![]
            }
            (SearchState::Pick, Key::Enter) => self
                .list
                .selected()
                .map(|loc| vec![Command::navigate(Transition::SearchPicked(loc.clone()))])
                .unwrap_or_default(),
            (SearchState::Pick | SearchState::Error(_), Key::Char('n')) => {
                self.back_to_input();
                vec![]
            }
            (SearchState::Pick | SearchState::Error(_), Key::Char('q')) => vec![Command::Quit],
            (SearchState::Pick, key) => {
                self.list.handle_key(key);
                vec![]
            }
            _ => vec![],
        }
    }
}

impl Screen for SearchScreen {
    type Args = ();

    fn init(&mut self) -> Vec<Command> {
        vec![]
    }

    fn reset(&mut self, _: ()) {
        self.back_to_input();
    }

    fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::Resize(size) => {
                self.size = size;
                vec![]
            }
            Msg::Key(key) => self.on_key(key),
            Msg::Tick(tick) if self.state == SearchState::Loading => {
                self.spinner.update(tick).into_iter().collect()
            }
            Msg::LocationsFound(result) if self.state == SearchState::Loading => {
                self.on_found(result)
            }
            _ => vec![],
        }
    }

    fn render(&self) -> String {
        if !self.size.is_known() {
            return frame("Init...", &self.theme);
        }

        let width = inner_width(self.size.width, &self.theme);
        let content = match &self.state {
            SearchState::Input => {
                format!("Location search:\n\n{}\n\n{INPUT_HELP}", self.input.render(width))
            }
            SearchState::Loading => format!("Finding location{}", self.spinner.view()),
            SearchState::Pick if self.list.is_empty() => {
                format!("No locations matched \"{}\".\n\n{PICK_HELP}", self.last_query)
            }
            SearchState::Pick => {
                let chrome = self.theme.padding_y * 2 + 4;
                let height = usize::from(self.size.height).saturating_sub(chrome);
                format!("Pick a location:\n\n{}\n\n{PICK_HELP}", self.list.render(width, height))
            }
            SearchState::Error(err) => {
                format!("Error: {err}\n\nPress 'n' to try again or 'q' to quit.")
            }
        };

        frame(&content, &self.theme)
    }
}
