//! Generate a puzzle, play it through from the answer key, and check it.

use magic_sudoku_core::{Difficulty, Generator, Position, Session};

fn main() {
    let mut generator = Generator::with_seed(7);
    let puzzle = generator.generate(Difficulty::Easy);
    let solution = puzzle.solution;

    println!("puzzle:   {}", puzzle.givens.to_string_compact());
    println!("solution: {}", solution.to_string_compact());

    let mut session = Session::from_puzzle(puzzle, Difficulty::Easy);
    for pos in Position::all() {
        if !session.is_given(pos) {
            session.select_cell(pos);
            session.input_digit(solution.get(pos));
        }
    }

    println!("outcome:  {:?}", session.check_solution());
    println!("status:   {:?}", session.status());
}
