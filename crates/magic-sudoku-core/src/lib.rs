//! Sudoku puzzle engine: board generation, puzzle carving, and the game
//! session state machine.
//!
//! The crate is UI-agnostic. A front-end starts a [`Session`] for a
//! [`Difficulty`], drives it through cell selection and digit input, and
//! renders from [`Session::cell_display`]. Checking the board against
//! the stored solution is the only way a session reaches
//! [`GameStatus::Solved`].

mod board;
mod generator;
mod session;

pub use board::{Grid, Position};
pub use generator::{Difficulty, Generator, Puzzle};
pub use session::{CellDisplay, CheckOutcome, Direction, GameStatus, Session};
