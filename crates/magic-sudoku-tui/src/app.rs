use crate::animations::WinScreen;
use crate::stats::StatsManager;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use magic_sudoku_core::{
    CheckOutcome, Difficulty, Direction, Generator, Position, Session,
};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal gameplay
    Playing,
    /// Win celebration screen
    Win,
    /// Statistics screen
    Stats,
}

/// Overlay menu state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    None,
    NewGame,
}

/// The main application state
pub struct App {
    /// Current puzzle attempt
    pub session: Session,
    /// Color theme
    pub theme: Theme,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Overlay menu
    pub menu: MenuState,
    /// Selected menu item
    pub menu_selection: usize,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Mismatched cells from the last check, cleared on the next edit
    pub errors: Vec<Position>,
    /// Statistics manager
    pub stats: StatsManager,
    /// Win screen animation
    pub win_screen: WinScreen,
    /// Whether the current game's win has been recorded
    game_recorded: bool,
    /// Seeded generator when `--seed` was given
    generator: Option<Generator>,
}

impl App {
    /// Create a new app with a freshly dealt game
    pub fn new(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let mut generator = seed.map(Generator::with_seed);
        let session = match generator.as_mut() {
            Some(generator) => Session::with_generator(generator, difficulty),
            None => Session::new(difficulty),
        };

        let mut stats = StatsManager::load();
        stats.record_started(difficulty);

        Self {
            session,
            theme: Theme::dark(),
            screen_state: ScreenState::Playing,
            menu: MenuState::None,
            menu_selection: 0,
            message: None,
            message_timer: 0,
            errors: Vec::new(),
            stats,
            win_screen: WinScreen::new(),
            game_recorded: false,
            generator,
        }
    }

    /// Get the tick rate based on current screen
    pub fn get_tick_rate(&self) -> Duration {
        match self.screen_state {
            ScreenState::Win => Duration::from_millis(33),
            ScreenState::Playing | ScreenState::Stats => Duration::from_millis(100),
        }
    }

    /// Update animations and timers (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        if self.screen_state == ScreenState::Win {
            self.win_screen.update();
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Win => self.handle_win_key(key),
            ScreenState::Stats => self.handle_stats_key(key),
            ScreenState::Playing => match self.menu {
                MenuState::None => self.handle_game_key(key),
                MenuState::NewGame => self.handle_menu_key(key),
            },
        }
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,

            // Navigation; the first press selects the first open cell
            KeyCode::Up | KeyCode::Char('k') => self.navigate(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => self.navigate(Direction::Down),
            KeyCode::Left | KeyCode::Char('h') => self.navigate(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') => self.navigate(Direction::Right),

            // Number input
            KeyCode::Char(c @ '1'..='9') => {
                let digit = c.to_digit(10).unwrap() as u8;
                if self.session.input_digit(digit) {
                    self.errors.clear();
                } else if self.session.selected().is_none() {
                    self.show_message("Select a cell first (arrow keys)");
                }
            }

            // Clear cell
            KeyCode::Char('0') | KeyCode::Delete | KeyCode::Backspace => {
                if self.session.clear_cell() {
                    self.errors.clear();
                }
            }

            // Check the board
            KeyCode::Enter | KeyCode::Char('c') => self.check_board(),

            // New game menu
            KeyCode::Char('n') => {
                self.menu = MenuState::NewGame;
                self.menu_selection = Difficulty::all_levels()
                    .iter()
                    .position(|&d| d == self.session.difficulty())
                    .unwrap_or(0);
            }

            // Theme cycle
            KeyCode::Char('t') => {
                self.theme = self.theme.next();
                self.show_message(&format!("{} theme", self.theme.name));
            }

            // Stats screen
            KeyCode::Char('i') => {
                self.screen_state = ScreenState::Stats;
            }

            // Save / load
            KeyCode::Char('S') => self.save_game(),
            KeyCode::Char('L') => self.load_game(),

            _ => {}
        }

        AppAction::Continue
    }

    fn handle_win_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => {
                let difficulty = self.session.difficulty();
                self.new_game(difficulty);
                self.screen_state = ScreenState::Playing;
            }
            KeyCode::Char('i') => {
                self.screen_state = ScreenState::Stats;
            }
            KeyCode::Esc => {
                // Back to the (finished) board view
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_stats_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('i') => {
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppAction {
        let levels = Difficulty::all_levels();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.menu = MenuState::None;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.menu_selection > 0 {
                    self.menu_selection -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.menu_selection + 1 < levels.len() {
                    self.menu_selection += 1;
                }
            }
            KeyCode::Enter => {
                let difficulty = levels[self.menu_selection];
                self.menu = MenuState::None;
                self.new_game(difficulty);
            }
            _ => {}
        }
        AppAction::Continue
    }

    /// Move the selection, or make the initial selection
    fn navigate(&mut self, direction: Direction) {
        if self.session.selected().is_some() {
            self.session.move_selection(direction);
        } else if let Some(pos) = self.first_editable() {
            self.session.select_cell(pos);
        }
    }

    fn first_editable(&self) -> Option<Position> {
        Position::all().find(|&pos| !self.session.is_given(pos))
    }

    fn check_board(&mut self) {
        match self.session.check_solution() {
            CheckOutcome::Incomplete => {
                self.errors.clear();
                self.show_message("The board is not full yet - keep going");
            }
            CheckOutcome::Errors(errors) => {
                let count = errors.len();
                self.errors = errors;
                self.show_message(&format!(
                    "{} cell{} wrong",
                    count,
                    if count == 1 { " is" } else { "s are" }
                ));
            }
            CheckOutcome::Solved => {
                self.errors.clear();
                if !self.game_recorded {
                    self.game_recorded = true;
                    self.stats
                        .record_win(self.session.difficulty(), self.session.elapsed_seconds());
                    self.stats.save();
                }
                self.win_screen.reset();
                self.screen_state = ScreenState::Win;
            }
        }
    }

    /// Deal a fresh game at the given difficulty
    pub fn new_game(&mut self, difficulty: Difficulty) {
        self.session = match self.generator.as_mut() {
            Some(generator) => Session::with_generator(generator, difficulty),
            None => Session::new(difficulty),
        };
        self.errors.clear();
        self.game_recorded = false;
        self.stats.record_started(difficulty);
        self.show_message(&format!("New {} game", difficulty));
    }

    fn save_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("magic_sudoku_save.json")
    }

    fn save_game(&mut self) {
        match fs::write(Self::save_path(), self.session.serialize()) {
            Ok(()) => self.show_message("Game saved"),
            Err(_) => self.show_message("Could not save game"),
        }
    }

    fn load_game(&mut self) {
        let loaded = fs::read_to_string(Self::save_path())
            .ok()
            .and_then(|json| Session::deserialize(&json));

        match loaded {
            Some(session) => {
                self.game_recorded =
                    session.status() == magic_sudoku_core::GameStatus::Solved;
                self.session = session;
                self.errors.clear();
                self.screen_state = ScreenState::Playing;
                self.show_message("Game loaded");
            }
            None => self.show_message("No saved game found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use magic_sudoku_core::GameStatus;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Difficulty::Easy, Some(42))
    }

    #[test]
    fn test_first_arrow_press_selects_a_cell() {
        let mut app = app();
        assert_eq!(app.session.selected(), None);

        app.handle_key(key(KeyCode::Down));
        let selected = app.session.selected().expect("selection made");
        assert!(!app.session.is_given(selected));
        assert_eq!(app.session.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_digit_without_selection_is_a_noop() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('5')));

        assert_eq!(app.session.status(), GameStatus::NotStarted);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_check_on_fresh_board_reports_incomplete() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.session.status(), GameStatus::NotStarted);
        assert!(app.errors.is_empty());
        assert!(app.message.is_some());
    }

    #[test]
    fn test_wrong_fill_highlights_errors_until_next_edit() {
        let mut app = app();

        // Fill every open cell with a digit that is wrong somewhere
        for pos in Position::all() {
            if !app.session.is_given(pos) {
                app.session.select_cell(pos);
                let right = solution_digit(&app, pos);
                let wrong = if right == 9 { 8 } else { 9 };
                app.session.input_digit(wrong);
            }
        }

        app.handle_key(key(KeyCode::Enter));
        assert!(!app.errors.is_empty());
        assert_eq!(app.screen_state, ScreenState::Playing);

        // Any edit clears the highlights
        app.handle_key(key(KeyCode::Backspace));
        assert!(app.errors.is_empty());
    }

    #[test]
    fn test_menu_changes_difficulty() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.menu, MenuState::NewGame);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.menu, MenuState::None);
        assert_eq!(app.session.difficulty(), Difficulty::Medium);
        assert_eq!(app.session.status(), GameStatus::NotStarted);
    }

    /// Answer digit for a cell, read from a twin of the seeded generator
    fn solution_digit(app: &App, pos: Position) -> u8 {
        let mut twin = Generator::with_seed(42);
        twin.generate(app.session.difficulty()).solution.get(pos)
    }
}
