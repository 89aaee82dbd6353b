//! Per-rule transition functions.
//!
//! Each function reads `cur` and writes `next`. `next` holds a copy of `cur`
//! on entry, so cells a rule leaves alone keep their state.

use super::ant::Ant;
use super::board::{Board, ALIVE, DEAD};

pub(super) fn conway(cur: &Board, next: &mut Board) {
    let n = cur.size();
    for i in 0..n {
        for j in 0..n {
            let count = cur.count_neighbors(i, j);
            if cur.at(i, j) == ALIVE {
                if count != 2 && count != 3 {
                    next.set(i, j, DEAD);
                }
            } else if count == 3 {
                next.set(i, j, ALIVE);
            }
        }
    }
}

/// Translate the pattern by (`dr`, `dc`): each cell copies its source at
/// (i - dr, j - dc), binarized.
pub(super) fn shift(cur: &Board, next: &mut Board, dr: isize, dc: isize) {
    let n = cur.size();
    for i in 0..n {
        for j in 0..n {
            let alive = cur.is_alive(i as isize - dr, j as isize - dc);
            next.set(i, j, if alive { ALIVE } else { DEAD });
        }
    }
}

/// Rewrite row `cursor` from the neighbourhoods of the row above it.
pub(super) fn elementary(cur: &Board, next: &mut Board, rule: u8, cursor: usize) {
    let n = cur.size();
    let target = cursor % n;
    let source = cur.wrap(cursor as isize - 1) as isize;
    for i in 0..n {
        let col = i as isize;
        let pattern = (u8::from(cur.is_alive(source, col - 1)) << 2)
            | (u8::from(cur.is_alive(source, col)) << 1)
            | u8::from(cur.is_alive(source, col + 1));
        next.set(target, i, (rule >> pattern) & 1);
    }
}

pub(super) fn brians_brain(cur: &Board, next: &mut Board) {
    let n = cur.size();
    for i in 0..n {
        for j in 0..n {
            match cur.at(i, j) {
                1 => next.set(i, j, 2),
                2 => next.set(i, j, DEAD),
                0 if cur.count_neighbors(i, j) == 2 => next.set(i, j, ALIVE),
                _ => {}
            }
        }
    }
}

pub(super) fn seeds(cur: &Board, next: &mut Board) {
    let n = cur.size();
    for i in 0..n {
        for j in 0..n {
            if cur.at(i, j) == ALIVE {
                next.set(i, j, DEAD);
            } else if cur.count_neighbors(i, j) == 2 {
                next.set(i, j, ALIVE);
            }
        }
    }
}

/// Move every ant one cell. Row-major order decides collisions.
pub(super) fn ant(cur: &Board, next: &mut Board) {
    let n = cur.size();
    for i in 0..n {
        for j in 0..n {
            let Some(ant) = Ant::decode(cur.at(i, j)) else {
                continue;
            };
            next.set(i, j, ant.base());
            let (dr, dc) = ant.heading.delta();
            let ti = cur.wrap(i as isize + dr);
            let tj = cur.wrap(j as isize + dc);
            next.set(ti, tj, ant.marker(cur.at(ti, tj)));
        }
    }
}
