//! The driver: cycles over the board, playing one row per beat.

use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};
use rand::rngs::StdRng;

use crate::audio::NoteSink;
use crate::automaton::{Automaton, Board, Cadence};
use crate::error::Result;
use crate::observer::Observer;
use crate::params::{MusicConfig, RunConfig};
use crate::playback::Scheduler;
use crate::synthesis::{ClipStore, NoteBank};

/// Sleeps out whatever is left of the beat since the last trigger
#[derive(Debug)]
struct Metronome {
    interval: Duration,
    last: Option<Instant>,
}

impl Metronome {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    fn wait(&self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
    }

    fn mark(&mut self) {
        self.last = Some(Instant::now());
    }
}

/// Outcome of [`Session::run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles that played every row
    pub cycles_played: usize,
    /// Cycles abandoned after a transient error
    pub cycles_skipped: usize,
    /// Notes handed to the sink
    pub notes: usize,
}

/// One configured run: board, generated notes, output and display
pub struct Session<S: ClipStore, K: NoteSink, O: Observer> {
    automaton: Automaton,
    bank: NoteBank<S>,
    scheduler: Scheduler,
    sink: K,
    observer: O,
    run: RunConfig,
    music: MusicConfig,
    rng: StdRng,
    metronome: Metronome,
    progression_index: usize,
}

impl<S: ClipStore, K: NoteSink, O: Observer> Session<S, K, O> {
    /// Validate the configuration and generate every note it needs.
    ///
    /// Nothing is synthesized when validation fails.
    pub fn new(
        board: Board,
        mut bank: NoteBank<S>,
        sink: K,
        mut observer: O,
        mut run: RunConfig,
        music: MusicConfig,
        rng: StdRng,
    ) -> Result<Self> {
        run.validate(board.size())?;
        music.validate()?;
        for message in run.corrections.iter().chain(&music.corrections) {
            observer.message(message);
        }
        let metronome = Metronome::new(run.step_interval()?);

        let generated = bank.ensure_notes_generated(&music, run.stretch, &mut observer)?;
        info!(
            "{} notes ready ({} synthesized) from '{}'",
            music.offsets().len(),
            generated,
            bank.source_path().display()
        );

        let mut scheduler = Scheduler::new(board.size());
        scheduler.advance_progression(&music.progression, 0);

        Ok(Self {
            automaton: Automaton::new(board),
            bank,
            scheduler,
            sink,
            observer,
            metronome,
            run,
            music,
            rng,
            progression_index: 0,
        })
    }

    /// Play every configured cycle.
    ///
    /// A transient error abandons the rest of its cycle and the run moves on;
    /// anything else stops the run.
    pub fn run(&mut self) -> Result<RunSummary> {
        info!(
            "Running {} cycles of {} at {} bpm ({:?} updates)",
            self.run.cycles,
            self.run.rule,
            self.run.bpm,
            self.run.cadence()
        );
        let mut summary = RunSummary::default();
        for cycle in 0..self.run.cycles {
            match self.run_cycle() {
                Ok(notes) => {
                    summary.cycles_played += 1;
                    summary.notes += notes;
                }
                Err(e) if e.is_transient() => {
                    warn!("Cycle {} skipped: {}", cycle + 1, e);
                    self.observer
                        .message(&format!("Cycle {} skipped: {}", cycle + 1, e));
                    summary.cycles_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            "Finished: {} cycles played, {} skipped, {} notes",
            summary.cycles_played, summary.cycles_skipped, summary.notes
        );
        Ok(summary)
    }

    /// One pass over every row, then the per-cycle updates
    fn run_cycle(&mut self) -> Result<usize> {
        let cadence = self.run.cadence();
        let mut notes = 0;

        for _ in 0..self.automaton.size() {
            self.observer
                .step(self.automaton.board(), self.scheduler.last_row());
            self.metronome.wait();

            let length = self.run.note_length.pick(&mut self.rng);
            let played = self.scheduler.play_step(
                self.automaton.board(),
                &self.music.note_sets,
                &self.bank,
                length,
                self.run.polyphony,
                self.run.audible,
                &mut self.sink,
            )?;
            self.metronome.mark();
            notes += played.len();

            if cadence == Cadence::PerStep {
                self.automaton
                    .step(self.run.rule, self.scheduler.current_note());
            }
        }

        if cadence == Cadence::PerCycle {
            self.automaton
                .step(self.run.rule, self.scheduler.current_note());
        }
        if self.music.advances() {
            self.progression_index = (self.progression_index + 1) % self.music.progression.len();
            self.scheduler
                .advance_progression(&self.music.progression, self.progression_index);
        }
        Ok(notes)
    }

    pub fn board(&self) -> &Board {
        self.automaton.board()
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn bank(&self) -> &NoteBank<S> {
        &self.bank
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }
}
