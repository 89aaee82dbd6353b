//! Row-by-row playback of the board.

use std::time::Duration;

use log::debug;

use crate::audio::NoteSink;
use crate::automaton::Board;
use crate::error::{Error, Result};
use crate::params::{NoteSet, Progression};
use crate::synthesis::ClipSource;

/// A note started by [`Scheduler::play_step`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triggered {
    pub column: usize,
    pub offset: i32,
    pub gain: f32,
}

/// Playback cursor: the row played next and the active note-set
#[derive(Debug, Clone)]
pub struct Scheduler {
    size: usize,
    current_note: usize,
    current_key: usize,
}

impl Scheduler {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            current_note: 0,
            current_key: 0,
        }
    }

    /// Row played by the next step
    pub fn current_note(&self) -> usize {
        self.current_note
    }

    /// Index of the active note-set
    pub fn current_key(&self) -> usize {
        self.current_key
    }

    /// Row played by the previous step
    pub fn last_row(&self) -> usize {
        (self.current_note + self.size - 1) % self.size
    }

    /// Columns of `row` whose state is above zero, ascending
    pub fn candidates(board: &Board, row: usize) -> Vec<usize> {
        board
            .row(row)
            .iter()
            .enumerate()
            .filter(|(_, &state)| state > 0)
            .map(|(col, _)| col)
            .collect()
    }

    /// Keep at most `polyphony` candidates from the middle.
    ///
    /// `floor(excess / 2)` are dropped from the front and the rest from the back.
    pub fn select(candidates: &[usize], polyphony: usize) -> &[usize] {
        let keep = polyphony.min(candidates.len());
        let front = (candidates.len() - keep) / 2;
        &candidates[front..front + keep]
    }

    /// Sound the current row, then move the cursor to the next row.
    ///
    /// Each selected column plays the clip for its note-set entry at gain
    /// `1/state`. A muted step only advances the cursor.
    #[allow(clippy::too_many_arguments)]
    pub fn play_step<C, S>(
        &mut self,
        board: &Board,
        note_sets: &[NoteSet],
        clips: &C,
        note_length: Duration,
        polyphony: usize,
        audible: bool,
        sink: &mut S,
    ) -> Result<Vec<Triggered>>
    where
        C: ClipSource + ?Sized,
        S: NoteSink + ?Sized,
    {
        let mut triggered = Vec::new();
        if audible {
            let row = board.row(self.current_note);
            let key = &note_sets[self.current_key];
            let candidates = Self::candidates(board, self.current_note);
            for &column in Self::select(&candidates, polyphony) {
                let offset = key.offset_for(column);
                let clip = clips.clip(offset).ok_or(Error::MissingClip { offset })?;
                let gain = 1.0 / row[column] as f32;
                sink.trigger(clip, gain, note_length)?;
                triggered.push(Triggered {
                    column,
                    offset,
                    gain,
                });
            }
            debug!(
                "Row {}: {} candidates, {} played",
                self.current_note,
                candidates.len(),
                triggered.len()
            );
        }
        self.current_note = (self.current_note + 1) % self.size;
        Ok(triggered)
    }

    /// Make note-set `progression[index]` active
    pub fn advance_progression(&mut self, progression: &Progression, index: usize) {
        self.current_key = progression.key_at(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::Clip;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder(Vec<(f32, Duration)>);

    impl NoteSink for Recorder {
        fn trigger(&mut self, _clip: Arc<Clip>, gain: f32, length: Duration) -> Result<()> {
            self.0.push((gain, length));
            Ok(())
        }
    }

    fn clips(offsets: &[i32]) -> HashMap<i32, Arc<Clip>> {
        offsets
            .iter()
            .map(|&o| (o, Arc::new(Clip::mono(vec![o as i16; 4]))))
            .collect()
    }

    #[test]
    fn test_select_keeps_middle() {
        let candidates: Vec<usize> = (0..6).collect();
        assert_eq!(Scheduler::select(&candidates, 2), &[2, 3]);
        assert_eq!(Scheduler::select(&candidates, 3), &[1, 2, 3]);
        assert_eq!(Scheduler::select(&candidates, 6), &[0, 1, 2, 3, 4, 5]);
        // More voices than candidates is clamped
        assert_eq!(Scheduler::select(&candidates[..2], 5), &[0, 1]);
        assert!(Scheduler::select(&[], 3).is_empty());
    }

    #[test]
    fn test_play_step_gain_and_wrap() {
        let board = Board::parse("0201\n0000\n0000\n0000").unwrap();
        let note_sets = vec![NoteSet(vec![0, 7])];
        let mut scheduler = Scheduler::new(4);
        let mut sink = Recorder::default();
        let length = Duration::from_millis(500);

        let played = scheduler
            .play_step(&board, &note_sets, &clips(&[0, 7]), length, 4, true, &mut sink)
            .unwrap();
        assert_eq!(
            played,
            vec![
                Triggered {
                    column: 1,
                    offset: 7,
                    gain: 0.5
                },
                Triggered {
                    column: 3,
                    offset: 7,
                    gain: 1.0
                },
            ]
        );
        assert_eq!(sink.0, vec![(0.5, length), (1.0, length)]);
        assert_eq!(scheduler.current_note(), 1);
        assert_eq!(scheduler.last_row(), 0);
    }

    #[test]
    fn test_muted_step_only_advances() {
        let board = Board::parse("11\n11").unwrap();
        let mut scheduler = Scheduler::new(2);
        let mut sink = Recorder::default();
        let note_sets = vec![NoteSet::default()];
        for expected in [1, 0, 1] {
            let played = scheduler
                .play_step(
                    &board,
                    &note_sets,
                    &clips(&[]),
                    Duration::from_secs(1),
                    2,
                    false,
                    &mut sink,
                )
                .unwrap();
            assert!(played.is_empty());
            assert_eq!(scheduler.current_note(), expected);
        }
        assert!(sink.0.is_empty());
    }

    #[test]
    fn test_missing_clip_is_transient() {
        let board = Board::parse("1").unwrap();
        let mut scheduler = Scheduler::new(1);
        let err = scheduler
            .play_step(
                &board,
                &[NoteSet(vec![3])],
                &clips(&[]),
                Duration::from_secs(1),
                1,
                true,
                &mut Recorder::default(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::MissingClip { offset: 3 }));
        assert!(err.is_transient());
    }

    #[test]
    fn test_single_chord_key_never_changes() {
        let progression = Progression(vec![0]);
        let mut scheduler = Scheduler::new(6);
        for index in 0..20 {
            scheduler.advance_progression(&progression, index % progression.len());
            assert_eq!(scheduler.current_key(), 0);
        }
    }

    #[test]
    fn test_advance_progression_follows_indices() {
        let progression = Progression(vec![0, 3, 4]);
        let mut scheduler = Scheduler::new(3);
        let keys: Vec<usize> = (0..6)
            .map(|i| {
                scheduler.advance_progression(&progression, i % progression.len());
                scheduler.current_key()
            })
            .collect();
        assert_eq!(keys, vec![0, 3, 4, 0, 3, 4]);
    }
}
