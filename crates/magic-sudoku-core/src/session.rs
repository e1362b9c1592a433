use crate::{Difficulty, Generator, Grid, Position, Puzzle};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Lifecycle of a puzzle attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Fresh board, clock not running
    NotStarted,
    /// At least one cell has been selected; clock is running
    InProgress,
    /// Board matched the solution; clock is frozen
    Solved,
}

/// Outcome of checking the board against the answer key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// At least one cell is still empty
    Incomplete,
    /// The board is full but these cells differ from the solution
    Errors(Vec<Position>),
    /// The board matches the solution
    Solved,
}

/// Direction for selection movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// One step from `pos`, or None at the board edge
    fn step(self, pos: Position) -> Option<Position> {
        match self {
            Direction::Up if pos.row > 0 => Some(Position::new(pos.row - 1, pos.col)),
            Direction::Down if pos.row < 8 => Some(Position::new(pos.row + 1, pos.col)),
            Direction::Left if pos.col > 0 => Some(Position::new(pos.row, pos.col - 1)),
            Direction::Right if pos.col < 8 => Some(Position::new(pos.row, pos.col + 1)),
            _ => None,
        }
    }
}

/// Render-facing view of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDisplay {
    /// Current value; 0 means empty
    pub value: u8,
    /// True for puzzle cells the player cannot edit
    pub is_given: bool,
    pub is_selected: bool,
}

/// The full mutable state of one puzzle attempt: the three grids, the
/// selection, the status machine, and the clock.
///
/// All player operations report whether they had an effect; a rejected
/// operation leaves the session untouched. Cells where `givens` is
/// nonzero are never mutated.
pub struct Session {
    /// The answer key; immutable once generated
    solution: Grid,
    /// The puzzle as presented; a cell is editable iff its given is 0
    givens: Grid,
    /// The player's board
    working: Grid,
    selected: Option<Position>,
    status: GameStatus,
    difficulty: Difficulty,
    /// Set while the clock is running
    start_time: Option<Instant>,
    /// Time accumulated before `start_time` (loaded games, solve freeze)
    elapsed: Duration,
}

impl Session {
    /// Start a fresh attempt at a newly generated puzzle
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_generator(&mut Generator::new(), difficulty)
    }

    /// Like [`Session::new`], but drawing the puzzle from a caller-owned
    /// (possibly seeded) generator
    pub fn with_generator(generator: &mut Generator, difficulty: Difficulty) -> Self {
        Self::from_puzzle(generator.generate(difficulty), difficulty)
    }

    /// Build a session around an already generated puzzle
    pub fn from_puzzle(puzzle: Puzzle, difficulty: Difficulty) -> Self {
        Self {
            solution: puzzle.solution,
            givens: puzzle.givens,
            working: puzzle.givens,
            selected: None,
            status: GameStatus::NotStarted,
            difficulty,
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn givens(&self) -> &Grid {
        &self.givens
    }

    pub fn working(&self) -> &Grid {
        &self.working
    }

    /// True for puzzle cells the player cannot edit
    pub fn is_given(&self, pos: Position) -> bool {
        self.givens.get(pos) != 0
    }

    /// Render-facing view of one cell
    pub fn cell_display(&self, pos: Position) -> CellDisplay {
        CellDisplay {
            value: self.working.get(pos),
            is_given: self.is_given(pos),
            is_selected: self.selected == Some(pos),
        }
    }

    /// Number of cells still empty
    pub fn empty_count(&self) -> usize {
        81 - self.working.filled_count()
    }

    /// Select an editable cell. The first selection of a fresh session
    /// starts the clock.
    pub fn select_cell(&mut self, pos: Position) -> bool {
        if self.is_given(pos) {
            return false;
        }

        self.selected = Some(pos);
        if self.status == GameStatus::NotStarted {
            self.status = GameStatus::InProgress;
            self.start_time = Some(Instant::now());
        }
        true
    }

    /// Write a digit (1..=9) into the selected cell, then advance the
    /// selection to the next editable cell in row-major order, wrapping
    /// past the end of the board
    pub fn input_digit(&mut self, digit: u8) -> bool {
        if !(1..=9).contains(&digit) || self.status == GameStatus::Solved {
            return false;
        }
        let pos = match self.selected {
            Some(pos) => pos,
            None => return false,
        };

        self.working.set(pos, digit);
        self.advance_selection(pos);
        true
    }

    /// Reset the selected cell to empty; the selection stays put
    pub fn clear_cell(&mut self) -> bool {
        if self.status == GameStatus::Solved {
            return false;
        }
        let pos = match self.selected {
            Some(pos) => pos,
            None => return false,
        };

        self.working.set(pos, 0);
        true
    }

    /// Step the selection one cell, skipping over givens in the same
    /// direction. Stops at the board edge: if only givens lie between
    /// the selection and the edge, the selection does not move.
    pub fn move_selection(&mut self, direction: Direction) -> bool {
        let mut pos = match self.selected {
            Some(pos) => pos,
            None => return false,
        };

        loop {
            match direction.step(pos) {
                Some(next) => {
                    pos = next;
                    if !self.is_given(pos) {
                        self.selected = Some(pos);
                        return true;
                    }
                }
                None => return false,
            }
        }
    }

    /// Compare the board against the answer key.
    ///
    /// An empty cell anywhere means [`CheckOutcome::Incomplete`]; a full
    /// board with mismatches reports them and changes nothing; a full
    /// matching board moves the session to [`GameStatus::Solved`] and
    /// freezes the clock. Repeated checks without intervening input
    /// never change the session.
    ///
    /// The comparison is against the stored solution, not against any
    /// valid completion: a carved puzzle is not guaranteed a unique
    /// solution, and an alternate completion is reported as errors.
    pub fn check_solution(&mut self) -> CheckOutcome {
        let mut complete = true;
        let mut errors = Vec::new();

        for pos in Position::all() {
            match self.working.get(pos) {
                0 => complete = false,
                v if v != self.solution.get(pos) => errors.push(pos),
                _ => {}
            }
        }

        if !complete {
            return CheckOutcome::Incomplete;
        }
        if !errors.is_empty() {
            return CheckOutcome::Errors(errors);
        }

        if self.status != GameStatus::Solved {
            self.elapsed = self.elapsed_total();
            self.start_time = None;
            self.status = GameStatus::Solved;
        }
        CheckOutcome::Solved
    }

    /// Whole seconds since the first selection; constant once solved
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_total().as_secs()
    }

    /// Format the elapsed time as MM:SS
    pub fn elapsed_string(&self) -> String {
        let secs = self.elapsed_seconds();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    fn elapsed_total(&self) -> Duration {
        match self.start_time {
            Some(start) => self.elapsed + start.elapsed(),
            None => self.elapsed,
        }
    }

    /// Serialize the session for saving
    pub fn serialize(&self) -> String {
        let state = SaveState {
            solution: self.solution.to_string_compact(),
            givens: self.givens.to_string_compact(),
            working: self.working.to_string_compact(),
            difficulty: self.difficulty,
            status: self.status,
            elapsed_secs: self.elapsed_seconds(),
        };
        serde_json::to_string(&state).unwrap_or_default()
    }

    /// Restore a saved session. An in-progress game resumes its clock
    /// from the banked elapsed time; the selection is not restored.
    pub fn deserialize(json: &str) -> Option<Self> {
        let state: SaveState = serde_json::from_str(json).ok()?;

        let solution = Grid::from_string(&state.solution)?;
        let givens = Grid::from_string(&state.givens)?;
        let working = Grid::from_string(&state.working)?;

        if !solution.is_valid_solution() {
            return None;
        }
        // Given cells must carry their puzzle value in the working board
        for pos in Position::all() {
            if givens.get(pos) != 0 && working.get(pos) != givens.get(pos) {
                return None;
            }
        }

        let start_time = match state.status {
            GameStatus::InProgress => Some(Instant::now()),
            GameStatus::NotStarted | GameStatus::Solved => None,
        };

        Some(Self {
            solution,
            givens,
            working,
            selected: None,
            status: state.status,
            difficulty: state.difficulty,
            start_time,
            elapsed: Duration::from_secs(state.elapsed_secs),
        })
    }
}

#[derive(Serialize, Deserialize)]
struct SaveState {
    solution: String,
    givens: String,
    working: String,
    difficulty: Difficulty,
    status: GameStatus,
    elapsed_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED: &str = "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    /// Session over the known solved grid with the listed cells blanked
    fn fixture(blanks: &[(usize, usize)]) -> Session {
        let solution = Grid::from_string(SOLVED).unwrap();
        let mut givens = solution;
        for &(row, col) in blanks {
            givens.set(Position::new(row, col), 0);
        }
        Session::from_puzzle(Puzzle { givens, solution }, Difficulty::Easy)
    }

    fn solution_digit(pos: Position) -> u8 {
        Grid::from_string(SOLVED).unwrap().get(pos)
    }

    #[test]
    fn test_select_given_cell_is_rejected() {
        let mut session = fixture(&[(0, 2)]);

        assert!(!session.select_cell(Position::new(0, 0)));
        assert_eq!(session.selected(), None);
        assert_eq!(session.status(), GameStatus::NotStarted);

        assert!(session.select_cell(Position::new(0, 2)));
        assert_eq!(session.selected(), Some(Position::new(0, 2)));
        assert_eq!(session.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_input_requires_selection() {
        let mut session = fixture(&[(0, 2)]);
        assert!(!session.input_digit(5));
        assert!(!session.clear_cell());
        assert_eq!(session.working().get(Position::new(0, 2)), 0);
    }

    #[test]
    fn test_input_rejects_out_of_range_digits() {
        let mut session = fixture(&[(0, 2)]);
        session.select_cell(Position::new(0, 2));
        assert!(!session.input_digit(0));
        assert!(!session.input_digit(10));
        assert_eq!(session.working().get(Position::new(0, 2)), 0);
    }

    #[test]
    fn test_input_writes_and_advances_selection() {
        let mut session = fixture(&[(0, 2), (0, 5)]);
        session.select_cell(Position::new(0, 2));

        assert!(session.input_digit(5));
        assert_eq!(session.working().get(Position::new(0, 2)), 5);
        // (0,3) and (0,4) are givens, so the selection skips to (0,5)
        assert_eq!(session.selected(), Some(Position::new(0, 5)));
    }

    #[test]
    fn test_selection_wraps_past_last_cell() {
        let mut session = fixture(&[(0, 2), (8, 8)]);
        session.select_cell(Position::new(8, 8));

        assert!(session.input_digit(1));
        assert_eq!(session.selected(), Some(Position::new(0, 2)));
    }

    #[test]
    fn test_sole_editable_cell_keeps_selection() {
        let mut session = fixture(&[(4, 4)]);
        session.select_cell(Position::new(4, 4));

        assert!(session.input_digit(9));
        assert_eq!(session.selected(), Some(Position::new(4, 4)));
    }

    #[test]
    fn test_givens_are_never_altered() {
        let mut session = fixture(&[(0, 2), (5, 5)]);
        let givens = *session.givens();

        session.select_cell(Position::new(0, 2));
        session.input_digit(1);
        session.input_digit(2);
        session.clear_cell();
        session.move_selection(Direction::Down);
        session.input_digit(3);

        for pos in Position::all() {
            if givens.get(pos) != 0 {
                assert_eq!(session.working().get(pos), givens.get(pos));
            }
        }
    }

    #[test]
    fn test_clear_cell_resets_value_and_keeps_selection() {
        let mut session = fixture(&[(0, 2)]);
        session.select_cell(Position::new(0, 2));
        session.input_digit(7);
        session.select_cell(Position::new(0, 2));

        assert!(session.clear_cell());
        assert_eq!(session.working().get(Position::new(0, 2)), 0);
        assert_eq!(session.selected(), Some(Position::new(0, 2)));
    }

    #[test]
    fn test_move_selection_skips_givens() {
        let mut session = fixture(&[(4, 4), (4, 6)]);
        session.select_cell(Position::new(4, 4));

        // (4,5) is a given, so the step lands on (4,6)
        assert!(session.move_selection(Direction::Right));
        assert_eq!(session.selected(), Some(Position::new(4, 6)));

        assert!(session.move_selection(Direction::Left));
        assert_eq!(session.selected(), Some(Position::new(4, 4)));
    }

    #[test]
    fn test_move_selection_stops_at_boundary() {
        let mut session = fixture(&[(2, 0)]);
        session.select_cell(Position::new(2, 0));

        // Everything above (2,0) is a given; the edge is reached while
        // still on givens, so the selection stays
        assert!(!session.move_selection(Direction::Up));
        assert_eq!(session.selected(), Some(Position::new(2, 0)));

        assert!(!session.move_selection(Direction::Left));
        assert_eq!(session.selected(), Some(Position::new(2, 0)));
    }

    #[test]
    fn test_move_selection_without_selection() {
        let mut session = fixture(&[(4, 4)]);
        assert!(!session.move_selection(Direction::Up));
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_check_incomplete_wins_over_errors() {
        let mut session = fixture(&[(0, 2), (0, 5)]);
        session.select_cell(Position::new(0, 2));
        session.input_digit(9); // wrong, and (0,5) still empty

        assert_eq!(session.check_solution(), CheckOutcome::Incomplete);
        assert_eq!(session.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_check_reports_mismatched_cells() {
        let mut session = fixture(&[(0, 2)]);
        session.select_cell(Position::new(0, 2));
        let wrong = if solution_digit(Position::new(0, 2)) == 9 { 8 } else { 9 };
        session.input_digit(wrong);

        match session.check_solution() {
            CheckOutcome::Errors(errors) => {
                assert_eq!(errors, vec![Position::new(0, 2)]);
            }
            other => panic!("expected errors, got {:?}", other),
        }
        assert_eq!(session.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_check_is_idempotent_short_of_solved() {
        let mut session = fixture(&[(0, 2)]);
        assert_eq!(session.check_solution(), CheckOutcome::Incomplete);
        assert_eq!(session.check_solution(), CheckOutcome::Incomplete);
        assert_eq!(session.status(), GameStatus::NotStarted);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_solving_freezes_the_session() {
        let mut session = fixture(&[(0, 2)]);
        session.select_cell(Position::new(0, 2));
        session.input_digit(solution_digit(Position::new(0, 2)));

        assert_eq!(session.check_solution(), CheckOutcome::Solved);
        assert_eq!(session.status(), GameStatus::Solved);

        // The clock is stopped and the board is immutable
        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(session.elapsed_seconds(), 0);
        assert!(!session.input_digit(1));
        assert!(!session.clear_cell());
        assert_eq!(session.check_solution(), CheckOutcome::Solved);
    }

    #[test]
    fn test_full_game_from_generated_puzzle() {
        let mut generator = Generator::with_seed(99);
        let puzzle = generator.generate(Difficulty::Easy);
        let solution = puzzle.solution;
        let mut session = Session::from_puzzle(puzzle, Difficulty::Easy);

        assert_eq!(session.givens().filled_count(), 51);

        for pos in Position::all() {
            if !session.is_given(pos) {
                assert!(session.select_cell(pos));
                assert!(session.input_digit(solution.get(pos)));
            }
        }

        assert_eq!(session.check_solution(), CheckOutcome::Solved);
        assert_eq!(session.status(), GameStatus::Solved);
    }

    #[test]
    fn test_save_and_restore() {
        let mut session = fixture(&[(0, 2), (0, 5)]);
        session.select_cell(Position::new(0, 2));
        session.input_digit(4);

        let json = session.serialize();
        let restored = Session::deserialize(&json).expect("restorable save");

        assert_eq!(restored.status(), GameStatus::InProgress);
        assert_eq!(restored.difficulty(), Difficulty::Easy);
        assert_eq!(restored.working(), session.working());
        assert_eq!(restored.givens(), session.givens());
        assert_eq!(restored.selected(), None);
    }

    #[test]
    fn test_restore_rejects_tampered_saves() {
        assert!(Session::deserialize("not json").is_none());

        let mut session = fixture(&[(0, 2)]);
        let json = session.serialize();
        // Overwrite a row of the stored solution with duplicates
        let tampered = json.replacen(SOLVED.get(9..18).unwrap(), "111111111", 1);
        if tampered != json {
            assert!(Session::deserialize(&tampered).is_none());
        }
        assert_eq!(session.check_solution(), CheckOutcome::Incomplete);
    }
}
