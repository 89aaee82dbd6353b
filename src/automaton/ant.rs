//! Ant state encoding.
//!
//! States 2..=5 are an ant on a dead cell and 6..=9 an ant on an alive cell,
//! each group ordered down, left, up, right. A marker written ahead of an ant
//! already carries the heading it will leave with and the colour it leaves
//! behind.

use super::board::{Cell, ALIVE, DEAD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Down,
    Left,
    Up,
    Right,
}

impl Heading {
    const ALL: [Heading; 4] = [Heading::Down, Heading::Left, Heading::Up, Heading::Right];

    /// (row, col) offset of the cell this heading moves into
    pub fn delta(self) -> (isize, isize) {
        match self {
            Heading::Down => (1, 0),
            Heading::Left => (0, -1),
            Heading::Up => (-1, 0),
            Heading::Right => (0, 1),
        }
    }
}

/// Marker written into a dead-family target, indexed by heading
const ONTO_DEAD: [Cell; 4] = [9, 6, 7, 8];
/// Marker written into an alive-family target, indexed by heading
const ONTO_ALIVE: [Cell; 4] = [3, 4, 5, 2];

/// An ant decoded from a cell state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ant {
    pub heading: Heading,
    /// State 6..=9: the cell under the ant is alive
    pub on_alive: bool,
}

impl Ant {
    pub fn decode(state: Cell) -> Option<Ant> {
        match state {
            2..=5 => Some(Ant {
                heading: Heading::ALL[(state - 2) as usize],
                on_alive: false,
            }),
            6..=9 => Some(Ant {
                heading: Heading::ALL[(state - 6) as usize],
                on_alive: true,
            }),
            _ => None,
        }
    }

    /// State left behind once the ant moves on
    pub fn base(&self) -> Cell {
        if self.on_alive {
            ALIVE
        } else {
            DEAD
        }
    }

    /// Marker to write into the target cell, given the target's current state.
    ///
    /// Ants on dead cells test the target against the dead family
    /// {0, 6, 7, 8, 9}; ants on alive cells test it against the alive family
    /// {1, 2, 3, 4, 5}. The two tests only disagree for out-of-domain states.
    pub fn marker(&self, target: Cell) -> Cell {
        let onto_dead = if self.on_alive {
            !is_alive_family(target)
        } else {
            is_dead_family(target)
        };
        let idx = self.heading as usize;
        if onto_dead {
            ONTO_DEAD[idx]
        } else {
            ONTO_ALIVE[idx]
        }
    }
}

fn is_dead_family(state: Cell) -> bool {
    matches!(state, 0 | 6..=9)
}

fn is_alive_family(state: Cell) -> bool {
    matches!(state, 1..=5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        assert_eq!(Ant::decode(0), None);
        assert_eq!(Ant::decode(1), None);
        assert_eq!(
            Ant::decode(3),
            Some(Ant {
                heading: Heading::Left,
                on_alive: false
            })
        );
        assert_eq!(
            Ant::decode(9),
            Some(Ant {
                heading: Heading::Right,
                on_alive: true
            })
        );
        assert_eq!(Ant::decode(10), None);
    }

    #[test]
    fn test_marker_table() {
        let down = Ant::decode(2).unwrap();
        assert_eq!(down.base(), DEAD);
        assert_eq!(down.marker(0), 9);
        assert_eq!(down.marker(1), 3);

        let right_on_alive = Ant::decode(9).unwrap();
        assert_eq!(right_on_alive.base(), ALIVE);
        assert_eq!(right_on_alive.marker(1), 2);
        assert_eq!(right_on_alive.marker(0), 8);
    }

    #[test]
    fn test_out_of_domain_target() {
        assert_eq!(Ant::decode(4).unwrap().marker(12), 5);
        assert_eq!(Ant::decode(8).unwrap().marker(12), 7);
    }
}
