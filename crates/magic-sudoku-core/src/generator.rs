use crate::{Grid, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Difficulty level of a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl Difficulty {
    /// Number of cells blanked out of the solved grid
    pub fn removal_count(&self) -> usize {
        match self {
            Difficulty::Easy => 30,
            Difficulty::Medium => 40,
            Difficulty::Hard => 50,
        }
    }

    /// Number of givens left after carving
    pub fn given_count(&self) -> usize {
        81 - self.removal_count()
    }

    pub fn all_levels() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// A carved puzzle together with its answer key
#[derive(Debug, Clone, Copy)]
pub struct Puzzle {
    /// The board as presented to the player; 0 cells are editable
    pub givens: Grid,
    /// The fully solved grid the givens were carved from
    pub solution: Grid,
}

/// Sudoku puzzle generator
pub struct Generator {
    rng: StdRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a generator seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a puzzle for the given difficulty
    pub fn generate(&mut self, difficulty: Difficulty) -> Puzzle {
        let solution = self.fill_grid();
        let givens = self.carve(&solution, difficulty.removal_count());
        Puzzle { givens, solution }
    }

    /// Produce a fully filled, rule-valid grid by randomized backtracking
    fn fill_grid(&mut self) -> Grid {
        let mut grid = Grid::empty();
        // A full backtrack past the first cell is possible in theory;
        // start over from an empty board if it ever happens.
        while !self.fill_from(&mut grid, 0) {
            grid = Grid::empty();
        }
        grid
    }

    /// Fill cells from `index` onward in row-major order, trying the
    /// digits 1..=9 in a fresh random order at each cell
    fn fill_from(&mut self, grid: &mut Grid, index: usize) -> bool {
        if index == 81 {
            return true;
        }

        let pos = Position::from_index(index);
        let mut digits: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        digits.shuffle(&mut self.rng);

        for &digit in &digits {
            if grid.can_place(pos, digit) {
                grid.set(pos, digit);
                if self.fill_from(grid, index + 1) {
                    return true;
                }
                grid.set(pos, 0);
            }
        }

        false
    }

    /// Blank exactly `count` distinct cells of a solved grid
    ///
    /// Coordinates are sampled uniformly with retry-on-duplicate: a cell
    /// that is already empty does not count toward the total. The result
    /// is not checked for solution uniqueness; play is judged against the
    /// stored solution.
    fn carve(&mut self, solution: &Grid, count: usize) -> Grid {
        let mut givens = *solution;
        let mut removed = 0;
        while removed < count {
            let pos = Position::new(self.rng.gen_range(0..9), self.rng.gen_range(0..9));
            if givens.get(pos) != 0 {
                givens.set(pos, 0);
                removed += 1;
            }
        }
        givens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_solution_is_valid() {
        let mut generator = Generator::with_seed(42);
        for _ in 0..5 {
            let puzzle = generator.generate(Difficulty::Medium);
            assert!(puzzle.solution.is_valid_solution());
        }
    }

    #[test]
    fn test_given_counts_per_difficulty() {
        let mut generator = Generator::with_seed(42);
        for &difficulty in Difficulty::all_levels() {
            let puzzle = generator.generate(difficulty);
            assert_eq!(
                puzzle.givens.filled_count(),
                difficulty.given_count(),
                "wrong given count for {}",
                difficulty
            );
        }
        assert_eq!(Difficulty::Easy.given_count(), 51);
        assert_eq!(Difficulty::Medium.given_count(), 41);
        assert_eq!(Difficulty::Hard.given_count(), 31);
    }

    #[test]
    fn test_givens_agree_with_solution() {
        let mut generator = Generator::with_seed(7);
        let puzzle = generator.generate(Difficulty::Hard);
        for pos in Position::all() {
            let given = puzzle.givens.get(pos);
            if given != 0 {
                assert_eq!(given, puzzle.solution.get(pos));
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = Generator::with_seed(1234).generate(Difficulty::Easy);
        let b = Generator::with_seed(1234).generate(Difficulty::Easy);
        assert_eq!(a.solution, b.solution);
        assert_eq!(a.givens, b.givens);

        let c = Generator::with_seed(1235).generate(Difficulty::Easy);
        assert_ne!(a.solution, c.solution);
    }
}
