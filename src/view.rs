//! Plain-text board display.

use std::fmt::Write as _;

use crate::automaton::{Board, DEAD};
use crate::observer::Observer;

/// Prints progress and every board to stdout
#[derive(Debug, Default)]
pub struct TerminalView {
    /// Print the board before each step
    pub show_board: bool,
    steps: u64,
}

impl TerminalView {
    pub fn new(show_board: bool) -> Self {
        Self {
            show_board,
            steps: 0,
        }
    }

    /// Board text with `>` in front of `marked_row`
    pub fn render(board: &Board, marked_row: usize) -> String {
        let mut out = String::new();
        for row in 0..board.size() {
            out.push(if row == marked_row { '>' } else { ' ' });
            out.push(' ');
            for &cell in board.row(row) {
                if cell == DEAD {
                    out.push('.');
                } else {
                    let _ = write!(out, "{}", cell);
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Observer for TerminalView {
    fn note_generated(&mut self, _offset: i32, label: &str) {
        println!("{} Generated!", label);
    }

    fn step(&mut self, board: &Board, last_row: usize) {
        self.steps += 1;
        if self.show_board {
            println!("step {}\n{}", self.steps, Self::render(board, last_row));
        }
    }

    fn message(&mut self, text: &str) {
        println!("{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_marks_row() {
        let board = Board::parse("1.\n.2").unwrap();
        assert_eq!(TerminalView::render(&board, 1), "  1.\n> .2\n");
    }
}
