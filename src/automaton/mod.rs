//! Cellular automaton engine.
//!
//! Owns two boards of equal size and swaps them after every generation.

mod ant;
mod board;
mod rule;
mod rules;

pub use ant::{Ant, Heading};
pub use board::{Board, Cell, ALIVE, DEAD};
pub use rule::{Cadence, Rule, DEFAULT_ELEMENTARY_RULE};

use log::trace;

/// Double-buffered automaton
#[derive(Debug, Clone)]
pub struct Automaton {
    buffers: [Board; 2],
    front: usize,
    generation: u64,
}

impl Automaton {
    pub fn new(seed: Board) -> Self {
        let back = seed.clone();
        Self {
            buffers: [seed, back],
            front: 0,
            generation: 0,
        }
    }

    /// Current generation
    pub fn board(&self) -> &Board {
        &self.buffers[self.front]
    }

    pub fn size(&self) -> usize {
        self.board().size()
    }

    /// Number of completed steps
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance by one generation.
    ///
    /// `cursor` is the playback row cursor; only [`Rule::Elementary`] reads it.
    pub fn step(&mut self, rule: Rule, cursor: usize) {
        let back = 1 - self.front;
        let (a, b) = self.buffers.split_at_mut(1);
        let (cur, next) = if self.front == 0 {
            (&a[0], &mut b[0])
        } else {
            (&b[0], &mut a[0])
        };
        next.copy_from(cur);

        match rule {
            Rule::Conway => rules::conway(cur, next),
            Rule::ShiftUp => rules::shift(cur, next, -1, 0),
            Rule::ShiftDown => rules::shift(cur, next, 1, 0),
            Rule::ShiftLeft => rules::shift(cur, next, 0, -1),
            Rule::ShiftRight => rules::shift(cur, next, 0, 1),
            Rule::NoOp => {}
            Rule::Elementary(number) => rules::elementary(cur, next, number, cursor),
            Rule::BriansBrain => rules::brians_brain(cur, next),
            Rule::Seeds => rules::seeds(cur, next),
            Rule::Ant => rules::ant(cur, next),
        }

        self.front = back;
        self.generation += 1;
        trace!("{} generation {}", rule, self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn board(text: &str) -> Board {
        Board::parse(text).unwrap()
    }

    fn stepped(text: &str, rule: Rule, cursor: usize) -> Board {
        let mut automaton = Automaton::new(board(text));
        automaton.step(rule, cursor);
        automaton.board().clone()
    }

    const BINARY_RULES: [Rule; 9] = [
        Rule::Conway,
        Rule::ShiftUp,
        Rule::ShiftDown,
        Rule::ShiftLeft,
        Rule::ShiftRight,
        Rule::NoOp,
        Rule::Elementary(110),
        Rule::Seeds,
        Rule::Elementary(30),
    ];

    #[test]
    fn test_binary_rules_keep_size_and_domain() {
        let mut rng = StdRng::seed_from_u64(42);
        for size in 1..=7 {
            for rule in BINARY_RULES {
                let mut automaton = Automaton::new(Board::random(size, &mut rng).unwrap());
                for cursor in 0..size * 2 {
                    automaton.step(rule, cursor);
                    assert_eq!(automaton.size(), size);
                    assert!(
                        automaton.board().cells().iter().all(|&c| c <= rule.max_state()),
                        "{rule} produced a state outside 0..={}",
                        rule.max_state()
                    );
                }
            }
        }
    }

    #[test]
    fn test_brians_brain_domain() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut automaton = Automaton::new(Board::random(9, &mut rng).unwrap());
        for _ in 0..20 {
            automaton.step(Rule::BriansBrain, 0);
            assert!(automaton
                .board()
                .cells()
                .iter()
                .all(|&c| c <= Rule::BriansBrain.max_state()));
        }
    }

    #[test]
    fn test_conway_dead_board_stays_dead() {
        let mut automaton = Automaton::new(Board::new(3).unwrap());
        for _ in 0..10 {
            automaton.step(Rule::Conway, 0);
        }
        assert!(automaton.board().is_empty());
    }

    #[test]
    fn test_conway_lone_cell_dies() {
        let next = stepped("1000\n0000\n0000\n0000", Rule::Conway, 0);
        assert!(next.is_empty());
    }

    #[test]
    fn test_conway_blinker_oscillates() {
        let start = ".....\n..1..\n..1..\n..1..\n.....";
        let mut automaton = Automaton::new(board(start));
        automaton.step(Rule::Conway, 0);
        assert_eq!(
            automaton.board(),
            &board(".....\n.....\n.111.\n.....\n.....")
        );
        automaton.step(Rule::Conway, 0);
        assert_eq!(automaton.board(), &board(start));
    }

    #[test]
    fn test_glider_wraps_around_torus() {
        let start = ".1....\n..1...\n111...\n......\n......\n......";
        let mut automaton = Automaton::new(board(start));
        // A glider moves one cell diagonally every 4 generations
        for _ in 0..24 {
            automaton.step(Rule::Conway, 0);
        }
        assert_eq!(automaton.board(), &board(start));
    }

    #[test]
    fn test_shift_directions() {
        let start = "100\n000\n000";
        assert_eq!(stepped(start, Rule::ShiftRight, 0), board("010\n000\n000"));
        assert_eq!(stepped(start, Rule::ShiftLeft, 0), board("001\n000\n000"));
        assert_eq!(stepped(start, Rule::ShiftDown, 0), board("000\n100\n000"));
        assert_eq!(stepped(start, Rule::ShiftUp, 0), board("000\n000\n100"));
    }

    #[test]
    fn test_shift_right_then_left_is_identity() {
        let mut rng = StdRng::seed_from_u64(11);
        for size in 1..=8 {
            let start = Board::random(size, &mut rng).unwrap();
            let mut automaton = Automaton::new(start.clone());
            automaton.step(Rule::ShiftRight, 0);
            automaton.step(Rule::ShiftLeft, 0);
            assert_eq!(automaton.board(), &start, "size {size}");

            automaton.step(Rule::ShiftUp, 0);
            automaton.step(Rule::ShiftDown, 0);
            assert_eq!(automaton.board(), &start, "size {size}");
        }
    }

    #[test]
    fn test_shift_binarizes() {
        assert_eq!(stepped("20\n01", Rule::ShiftRight, 0), board("00\n10"));
    }

    #[test]
    fn test_noop_keeps_board() {
        let start = "120\n034\n901";
        assert_eq!(stepped(start, Rule::NoOp, 0), board(start));
    }

    #[test]
    fn test_elementary_rule_0_and_255() {
        let start = "1011\n0110\n1111\n0001";
        for cursor in 0..4 {
            let zero = stepped(start, Rule::Elementary(0), cursor);
            assert!(zero.row(cursor).iter().all(|&c| c == 0));

            let one = stepped(start, Rule::Elementary(255), cursor);
            assert!(one.row(cursor).iter().all(|&c| c == 1));
        }
    }

    #[test]
    fn test_elementary_only_touches_cursor_row() {
        let start = "1011\n0110\n1111\n0001";
        let next = stepped(start, Rule::Elementary(0), 2);
        let original = board(start);
        for row in [0, 1, 3] {
            assert_eq!(next.row(row), original.row(row));
        }
    }

    #[test]
    fn test_elementary_rule_90_reads_previous_row() {
        // Rule 90: new cell is left XOR right. Cursor 0 reads the last row.
        let start = "00000\n00000\n00000\n00000\n00100";
        let next = stepped(start, Rule::Elementary(90), 0);
        assert_eq!(next.row(0), &[0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_elementary_rule_table_bit_order() {
        // Single pattern 110 (left and centre alive) maps to bit 6
        let start = "000\n000\n110";
        let next = stepped(start, Rule::Elementary(0b0100_0000), 0);
        // Column 1 sees (1,1,0); column 0 sees (0,1,1); column 2 sees (1,0,1)
        assert_eq!(next.row(0), &[0, 1, 0]);
    }

    #[test]
    fn test_brians_brain_cycle() {
        let next = stepped("110\n000\n002", Rule::BriansBrain, 0);
        // Alive cells start dying, dying cells die, cells with two live neighbours fire
        assert_eq!(next.at(0, 0), 2);
        assert_eq!(next.at(0, 1), 2);
        assert_eq!(next.at(2, 2), 0);
        assert_eq!(next.at(1, 0), 1);
        assert_eq!(next.at(0, 2), 1);
    }

    #[test]
    fn test_brians_brain_dying_cells_are_not_neighbours() {
        let next = stepped("000\n000\n220", Rule::BriansBrain, 0);
        assert!(next.is_empty());
    }

    #[test]
    fn test_seeds_alive_cells_always_die() {
        let next = stepped("00000\n01000\n00000\n00000\n00000", Rule::Seeds, 0);
        assert!(next.is_empty());
    }

    #[test]
    fn test_seeds_birth_on_two() {
        let next = stepped("00000\n01010\n00000\n00000\n00000", Rule::Seeds, 0);
        assert_eq!(next.at(1, 1), 0);
        assert_eq!(next.at(1, 3), 0);
        assert_eq!(next.at(0, 2), 1);
        assert_eq!(next.at(1, 2), 1);
        assert_eq!(next.at(2, 2), 1);
    }

    #[test]
    fn test_ant_moves_and_flips() {
        // Ant heading right on a dead cell, moving onto a dead cell
        let next = stepped("000\n050\n000", Rule::Ant, 0);
        assert_eq!(next, board("000\n008\n000"));
    }

    #[test]
    fn test_ant_leaves_alive_base() {
        // Ant heading up on an alive cell, moving onto an alive cell
        let next = stepped("010\n080\n000", Rule::Ant, 0);
        assert_eq!(next, board("050\n010\n000"));
    }

    #[test]
    fn test_ant_wraps_edges() {
        let next = stepped("000\n000\n020", Rule::Ant, 0);
        assert_eq!(next, board("090\n000\n000"));
    }

    #[test]
    fn test_ant_collision_last_write_wins() {
        // Two ants target (1,1): the one at (1,2) heading left is processed last
        let next = stepped("020\n003\n000", Rule::Ant, 0);
        assert_eq!(next.at(1, 1), 6);
        assert_eq!(next.at(0, 1), 0);
        assert_eq!(next.at(1, 2), 0);
    }

    #[test]
    fn test_generation_counter() {
        let mut automaton = Automaton::new(board("10\n01"));
        automaton.step(Rule::NoOp, 0);
        automaton.step(Rule::NoOp, 1);
        assert_eq!(automaton.generation(), 2);
        assert_eq!(automaton.board(), &board("10\n01"));
    }
}
