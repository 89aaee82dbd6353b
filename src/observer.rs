//! Callbacks from the engine to whatever is displaying it.

use crate::automaton::Board;

/// Receives progress and per-step state. Every method defaults to doing nothing.
pub trait Observer {
    /// A clip for `offset` was synthesized; `label` is e.g. `"E(5)"`
    fn note_generated(&mut self, _offset: i32, _label: &str) {}

    /// Board about to be played, with the row played most recently
    fn step(&mut self, _board: &Board, _last_row: usize) {}

    /// Warnings and corrections worth showing to the user
    fn message(&mut self, _text: &str) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {}
