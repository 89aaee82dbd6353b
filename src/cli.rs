//! Command-line argument parsing.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::automaton::{Board, Cadence};
use crate::error::{Error, Result};
use crate::params::{
    parse_pitch_class, record_correction, KeyMode, MusicConfig, NoteLengthRange, NoteSet,
    Progression, ProgressionPreset, RunConfig, StretchMode,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Sonomata")]
#[command(about = "Cellular automaton played through a pitch-shifted sample", long_about = None)]
pub struct Args {
    /// Source sample (WAV); generated notes are cached next to it
    #[arg(value_name = "SAMPLE")]
    pub sample: PathBuf,

    /// Update rule: conway, up, down, left, right, none, 1d, brians-brain, seeds, ant
    #[arg(long, value_name = "RULE", default_value = "conway")]
    pub rule: String,

    /// Wolfram rule number for the 1d rule (0-255, others reset to 30)
    #[arg(long, value_name = "N", default_value = "30", allow_negative_numbers = true)]
    pub rule_number: i64,

    /// Board size (rows and columns), ignored with --board
    #[arg(long, value_name = "N", default_value = "6")]
    pub size: usize,

    /// Board file: one row per line, digits 0-9 are states, '.' is dead
    #[arg(long, value_name = "FILE", conflicts_with = "random")]
    pub board: Option<PathBuf>,

    /// Start from a random board of live and dead cells
    #[arg(long)]
    pub random: bool,

    /// Seed for the random board, note lengths and generated progressions
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Full passes over the board
    #[arg(long, value_name = "N", default_value = "10")]
    pub cycles: usize,

    /// Rows played per minute
    #[arg(long, value_name = "BPM", default_value = "300")]
    pub bpm: f64,

    /// Shortest note (milliseconds)
    #[arg(long, value_name = "MS", default_value = "1000")]
    pub note_min: u64,

    /// Longest note (milliseconds)
    #[arg(long, value_name = "MS", default_value = "2000")]
    pub note_max: u64,

    /// Granularity of note lengths (milliseconds)
    #[arg(long, value_name = "MS", default_value = "500")]
    pub note_step: u64,

    /// Maximum notes per row (defaults to the board size)
    #[arg(long, value_name = "N")]
    pub polyphony: Option<usize>,

    /// Step through the board without sounding notes
    #[arg(long)]
    pub mute: bool,

    /// Time-stretch notes so every pitch keeps the sample's duration
    #[arg(long)]
    pub stretch: bool,

    /// Stretch analysis window (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "0.5")]
    pub window: f64,

    /// Key mode: single, multiple, generated
    #[arg(long, value_name = "MODE", default_value = "single")]
    pub key_mode: String,

    /// Root of the generated key, e.g. C, F#, Bb
    #[arg(long, value_name = "NOTE", default_value = "C")]
    pub key: String,

    /// Progression for generated chords: custom, blues, 2-chord, 3-chord, 32-bar
    #[arg(long, value_name = "PRESET", default_value = "custom")]
    pub preset: String,

    /// Note-sets as semitone offsets, chords separated by ';' (e.g. "0,4,7;5,9,12")
    #[arg(long, value_name = "SETS", allow_hyphen_values = true)]
    pub notes: Option<String>,

    /// Progression as note-set indices (e.g. "0,1,0,2")
    #[arg(long, value_name = "INDICES")]
    pub progression: Option<String>,

    /// Number of chords in multiple mode; missing chords copy the first
    #[arg(long, value_name = "N")]
    pub chords: Option<usize>,

    /// Advance the automaton after every row for every rule
    #[arg(long)]
    pub update_every_step: bool,

    /// Delete cached notes for the sample before generating
    #[arg(long)]
    pub wipe_cache: bool,

    /// Delete cached notes for the sample when the run ends
    #[arg(long)]
    pub discard_cache: bool,

    /// Print the board before every step
    #[arg(long)]
    pub show: bool,

    /// Run without opening an audio device
    #[arg(long)]
    pub no_audio: bool,
}

impl Args {
    /// Generator for everything random in the run
    pub fn rng(&self) -> StdRng {
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        StdRng::seed_from_u64(seed)
    }

    pub fn stretch_mode(&self) -> StretchMode {
        if self.stretch {
            StretchMode::On {
                window_s: self.window,
            }
        } else {
            StretchMode::Off
        }
    }

    /// Run parameters from the command line for a board of `size`.
    ///
    /// Polyphony defaults to `size`, so pass the size of the resolved board.
    /// The session validates the result.
    pub fn run_config(&self, size: usize) -> Result<RunConfig> {
        let mut run = RunConfig {
            cadence: self.update_every_step.then_some(Cadence::PerStep),
            cycles: self.cycles,
            bpm: self.bpm,
            note_length: NoteLengthRange {
                min_ms: self.note_min,
                max_ms: self.note_max,
                step_ms: self.note_step,
            },
            polyphony: self.polyphony.unwrap_or(size),
            audible: !self.mute,
            stretch: self.stretch_mode(),
            ..RunConfig::default()
        };
        run.set_rule(&self.rule, self.rule_number)?;
        println!("Rule: {}", run.rule);
        Ok(run)
    }

    /// Starting board: from file, random, or empty
    pub fn board<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Board> {
        let board = match &self.board {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                let board = Board::parse(&text)?;
                println!("Board: {} ({}x{})", path.display(), board.size(), board.size());
                board
            }
            None if self.random => {
                println!("Board: random {}x{}", self.size, self.size);
                Board::random(self.size, rng)?
            }
            None => {
                println!("Board: empty {}x{}", self.size, self.size);
                Board::new(self.size)?
            }
        };
        Ok(board)
    }

    /// Note-sets and progression for the selected key mode
    pub fn music_config<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<MusicConfig> {
        let mode: KeyMode = self.key_mode.parse()?;
        let note_sets = self.note_sets()?;
        let progression = match &self.progression {
            Some(text) => text.parse::<Progression>()?,
            None => Progression::default(),
        };

        let music = match mode {
            KeyMode::Single => {
                let extra = note_sets.len().saturating_sub(1);
                let mut music = MusicConfig::single(note_sets.into_iter().next().unwrap_or_default());
                if extra > 0 {
                    record_correction(
                        &mut music.corrections,
                        format!("Single chord mode ignores {} extra note-sets", extra),
                    );
                }
                music
            }
            KeyMode::Multiple => {
                let chords = self.chords.unwrap_or(note_sets.len());
                MusicConfig::multiple(note_sets, chords, progression)
            }
            KeyMode::Generated => {
                let root = parse_pitch_class(&self.key)?;
                let preset: ProgressionPreset = self.preset.parse()?;
                MusicConfig::generated(root, preset, progression, rng)
            }
        };
        println!(
            "Key mode: {:?}, {} note-sets, progression {:?}",
            music.mode,
            music.note_sets.len(),
            music.progression.0
        );
        Ok(music)
    }

    /// `--notes` split on ';', or the default note-set
    fn note_sets(&self) -> Result<Vec<NoteSet>> {
        match &self.notes {
            Some(text) => text
                .split(';')
                .filter(|chunk| !chunk.trim().is_empty())
                .map(|chunk| chunk.parse::<NoteSet>().map_err(Error::from))
                .collect(),
            None => Ok(vec![NoteSet::default()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Rule;
    use crate::error::ConfigError;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["sonomata", "sample.wav"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        let run = args.run_config(6).unwrap();
        assert_eq!(run.rule, Rule::Conway);
        assert_eq!(run.cadence, None);
        assert_eq!(run.cycles, 10);
        assert_eq!(run.bpm, 300.0);
        assert_eq!(run.note_length, NoteLengthRange::default());
        assert_eq!(run.polyphony, 6);
        assert!(run.audible);
        assert_eq!(run.stretch, StretchMode::Off);
        assert!(run.corrections.is_empty());

        let music = args.music_config(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(music, MusicConfig::default());
    }

    #[test]
    fn test_elementary_rule_number_is_corrected() {
        let run = args(&["--rule", "1d", "--rule-number", "300"]).run_config(6).unwrap();
        assert_eq!(run.rule, Rule::Elementary(30));
        assert_eq!(run.corrections.len(), 1);
        let run = args(&["--rule", "1D", "--rule-number", "90"]).run_config(6).unwrap();
        assert_eq!(run.rule, Rule::Elementary(90));
        assert!(run.corrections.is_empty());
        let run = args(&["--rule", "1d", "--rule-number", "-4"]).run_config(6).unwrap();
        assert_eq!(run.rule, Rule::Elementary(30));
    }

    #[test]
    fn test_unknown_rule() {
        let err = args(&["--rule", "gliders"]).run_config(6).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidRule(_))));
    }

    #[test]
    fn test_multiple_mode_from_notes() {
        let args = args(&[
            "--key-mode",
            "multiple",
            "--notes",
            "-12,0,4;5,9",
            "--progression",
            "0,1,2",
            "--chords",
            "3",
        ]);
        let music = args.music_config(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(music.mode, KeyMode::Multiple);
        assert_eq!(
            music.note_sets,
            vec![
                NoteSet(vec![-12, 0, 4]),
                NoteSet(vec![5, 9]),
                NoteSet(vec![-12, 0, 4]),
            ]
        );
        assert_eq!(music.progression, Progression(vec![0, 1, 2]));
        assert!(music.validate().is_ok());
    }

    #[test]
    fn test_single_mode_keeps_first_note_set() {
        let args = args(&["--notes", "0,4,7;5,9"]);
        let music = args.music_config(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(music.note_sets, vec![NoteSet(vec![0, 4, 7])]);
        assert_eq!(music.corrections, vec!["Single chord mode ignores 1 extra note-sets"]);
    }

    #[test]
    fn test_generated_blues_in_g() {
        let args = args(&["--key-mode", "generated", "--key", "G", "--preset", "blues"]);
        let music = args.music_config(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(music.note_sets.len(), 7);
        assert_eq!(music.note_sets[0].offsets()[0], 7 - 24);
        assert_eq!(music.progression.len(), 12);
    }

    #[test]
    fn test_stretch_and_flags() {
        let args = args(&["--stretch", "--window", "0.25", "--mute", "--update-every-step"]);
        let run = args.run_config(6).unwrap();
        assert_eq!(run.stretch, StretchMode::On { window_s: 0.25 });
        assert!(!run.audible);
        assert_eq!(run.cadence, Some(Cadence::PerStep));
    }

    #[test]
    fn test_board_sources() {
        let mut rng = StdRng::seed_from_u64(3);
        let empty = args(&["--size", "4"]).board(&mut rng).unwrap();
        assert_eq!(empty.size(), 4);
        assert!(empty.is_empty());

        let random = args(&["--size", "8", "--random"]).board(&mut rng).unwrap();
        assert!(random.cells().iter().all(|&c| c <= 1));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glider.txt");
        fs::write(&path, ".1.\n..1\n111\n").unwrap();
        let board = args(&["--board", path.to_str().unwrap()])
            .board(&mut rng)
            .unwrap();
        assert_eq!(board.size(), 3);
        assert_eq!(board.row(2), &[1, 1, 1]);
    }

    #[test]
    fn test_polyphony_defaults_to_board_file_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.txt");
        fs::write(&path, "1.........\n".repeat(10)).unwrap();
        let args = args(&["--board", path.to_str().unwrap(), "--size", "6"]);

        let board = args.board(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(board.size(), 10);
        assert_eq!(args.run_config(board.size()).unwrap().polyphony, 10);

        let capped = Args {
            polyphony: Some(3),
            ..args
        };
        assert_eq!(capped.run_config(board.size()).unwrap().polyphony, 3);
    }

    #[test]
    fn test_board_and_random_conflict() {
        let result = Args::try_parse_from(["sonomata", "s.wav", "--board", "b.txt", "--random"]);
        assert!(result.is_err());
    }
}
