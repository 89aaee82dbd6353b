//! Note-sets, chord progressions and key modes.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use super::audio::audio_constants::{MAX_OFFSET, MIN_OFFSET};
use super::record_correction;
use crate::error::ConfigError;

/// Pitch class names, indexed by semitone above C
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#/Db", "D", "D#/Eb", "E", "F", "F#/Gb", "G", "G#/Ab", "A", "A#/Bb", "B",
];

/// Major scale intervals used for generated chords
const MAJOR_SCALE: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Chords that can stand in for the "other" chord of a three-chord shape
const OTHER_CHORDS: [usize; 4] = [1, 2, 3, 6];

/// Human-readable name of a semitone offset, e.g. `E(5)` for +4.
///
/// Offset 0 is C in octave 5.
pub fn note_label(offset: i32) -> String {
    format!(
        "{}({})",
        NOTE_NAMES[offset.rem_euclid(12) as usize],
        offset.div_euclid(12) + 5
    )
}

/// One chord or scale: semitone offsets from the sample's own pitch.
///
/// Board column `j` sounds entry `j mod len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSet(pub Vec<i32>);

impl NoteSet {
    pub fn offsets(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Offset sounded by board column `column`
    pub fn offset_for(&self, column: usize) -> i32 {
        self.0[column % self.0.len()]
    }

    pub fn contains(&self, offset: i32) -> bool {
        self.0.contains(&offset)
    }
}

impl Default for NoteSet {
    fn default() -> Self {
        NoteSet(vec![-5, -1, 2, 7, 14, 19])
    }
}

impl FromStr for NoteSet {
    type Err = ConfigError;

    /// Comma or space separated offsets, e.g. `"0, 4, 7, 12"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let offsets = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::NoteList(s.to_string()))?;
        Ok(NoteSet(offsets))
    }
}

impl fmt::Display for NoteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|o| o.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Sequence of note-set indices, one per cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression(pub Vec<usize>);

impl Progression {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Note-set index at progression position `index`
    pub fn key_at(&self, index: usize) -> usize {
        self.0[index]
    }

    /// Largest note-set index referenced
    pub fn max_key(&self) -> Option<usize> {
        self.0.iter().copied().max()
    }
}

impl Default for Progression {
    fn default() -> Self {
        Progression(vec![0])
    }
}

impl FromStr for Progression {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let indices = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| t.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::NoteList(s.to_string()))?;
        Ok(Progression(indices))
    }
}

/// How note-sets and the progression are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyMode {
    /// One note-set, the progression never advances
    #[default]
    Single,
    /// User-supplied note-sets and progression
    Multiple,
    /// Diatonic chords generated from a root, progression from a preset
    Generated,
}

impl FromStr for KeyMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(KeyMode::Single),
            "multiple" => Ok(KeyMode::Multiple),
            "generated" => Ok(KeyMode::Generated),
            _ => Err(ConfigError::UnknownName {
                kind: "key mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Named chord progressions over the seven generated diatonic chords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressionPreset {
    /// Keep whatever progression was supplied
    #[default]
    Custom,
    /// Twelve-bar blues
    Blues,
    TwoChord,
    ThreeChord,
    /// AABA form built from two different four-chord phrases
    ThirtyTwoBar,
}

impl FromStr for ProgressionPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "custom" => Ok(ProgressionPreset::Custom),
            "blues" => Ok(ProgressionPreset::Blues),
            "twochord" | "2chord" => Ok(ProgressionPreset::TwoChord),
            "threechord" | "3chord" => Ok(ProgressionPreset::ThreeChord),
            "32bar" | "thirtytwobar" => Ok(ProgressionPreset::ThirtyTwoBar),
            _ => Err(ConfigError::UnknownName {
                kind: "progression preset",
                value: s.to_string(),
            }),
        }
    }
}

impl ProgressionPreset {
    /// Build the progression, or `None` for [`ProgressionPreset::Custom`]
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Progression> {
        let steps = match self {
            ProgressionPreset::Custom => return None,
            ProgressionPreset::Blues => vec![0, 0, 0, 0, 3, 3, 0, 0, 4, 3, 0, 0],
            ProgressionPreset::TwoChord => vec![0, *[2, 4].choose(rng)?],
            ProgressionPreset::ThreeChord => {
                let other = *OTHER_CHORDS.choose(rng)?;
                let shapes = [
                    vec![0, other, 4, 4],
                    vec![0, 0, other, 4],
                    vec![0, other, 0, 4],
                    vec![0, other, 4, other],
                ];
                shapes.choose(rng)?.clone()
            }
            ProgressionPreset::ThirtyTwoBar => {
                let mut shapes = vec![
                    vec![0, *OTHER_CHORDS.choose(rng)?, 4, 4],
                    vec![0, 0, *OTHER_CHORDS.choose(rng)?, 4],
                    vec![0, *OTHER_CHORDS.choose(rng)?, 0, 4],
                    vec![0, *OTHER_CHORDS.choose(rng)?, 4, *[1, 2, 3].choose(rng)?],
                ];
                let first = shapes.remove(rng.gen_range(0..shapes.len()));
                let second = shapes.remove(rng.gen_range(0..shapes.len()));
                [first.clone(), first.clone(), second, first].concat()
            }
        };
        Some(Progression(steps))
    }
}

/// Seven diatonic chords of the major key rooted at `root` (0 = C).
///
/// Each note-set is the chord root two octaves down followed by the triad
/// repeated across four octaves (-1..=2).
pub fn generated_chords(root: usize) -> Vec<NoteSet> {
    let root = root as i32;
    let scale: Vec<i32> = MAJOR_SCALE.iter().map(|s| (root + s) % 12).collect();
    (0..scale.len())
        .map(|i| {
            let triad = [scale[i], scale[(i + 2) % 7], scale[(i + 4) % 7]];
            let mut offsets = vec![scale[i] - 24];
            for octave in -1..=2 {
                offsets.extend(triad.iter().map(|n| n + octave * 12));
            }
            NoteSet(offsets)
        })
        .collect()
}

/// Pitch class index of a note name such as `"C"`, `"F#"` or `"Bb"`
pub fn parse_pitch_class(name: &str) -> Result<usize, ConfigError> {
    let trimmed = name.trim();
    NOTE_NAMES
        .iter()
        .position(|full| {
            full.eq_ignore_ascii_case(trimmed)
                || full.split('/').any(|part| part.eq_ignore_ascii_case(trimmed))
        })
        .ok_or_else(|| ConfigError::UnknownName {
            kind: "key",
            value: name.to_string(),
        })
}

/// Note-sets and progression handed to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicConfig {
    pub mode: KeyMode,
    pub note_sets: Vec<NoteSet>,
    pub progression: Progression,
    /// Values corrected while configuring, as messages for the user
    pub corrections: Vec<String>,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self::single(NoteSet::default())
    }
}

impl MusicConfig {
    /// One chord, never changing
    pub fn single(note_set: NoteSet) -> Self {
        Self {
            mode: KeyMode::Single,
            note_sets: vec![note_set],
            progression: Progression::default(),
            corrections: Vec::new(),
        }
    }

    /// User note-sets resized to `chords` entries.
    ///
    /// Extra entries repeat the first note-set. A count of zero is corrected
    /// to one.
    pub fn multiple(mut note_sets: Vec<NoteSet>, chords: usize, progression: Progression) -> Self {
        let mut corrections = Vec::new();
        let chords = if chords == 0 {
            record_correction(&mut corrections, "Cannot have 0 chords, setting to 1.".to_string());
            1
        } else {
            chords
        };
        let first = note_sets.first().cloned().unwrap_or_default();
        note_sets.resize(chords, first);
        Self {
            mode: KeyMode::Multiple,
            note_sets,
            progression,
            corrections,
        }
    }

    /// Diatonic chords in `root`, progression from `preset` (or `custom` for Custom)
    pub fn generated<R: Rng + ?Sized>(
        root: usize,
        preset: ProgressionPreset,
        custom: Progression,
        rng: &mut R,
    ) -> Self {
        Self {
            mode: KeyMode::Generated,
            note_sets: generated_chords(root),
            progression: preset.build(rng).unwrap_or(custom),
            corrections: Vec::new(),
        }
    }

    /// Whether the driver advances the progression between cycles
    pub fn advances(&self) -> bool {
        self.mode != KeyMode::Single
    }

    /// Every distinct offset any note-set uses, ascending
    pub fn offsets(&self) -> Vec<i32> {
        let mut all: Vec<i32> = self.note_sets.iter().flat_map(|n| n.0.iter().copied()).collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.note_sets.is_empty() {
            return Err(ConfigError::NoNoteSets);
        }
        for (i, set) in self.note_sets.iter().enumerate() {
            if set.is_empty() {
                return Err(ConfigError::EmptyNoteSet(i));
            }
            if let Some(&offset) = set
                .offsets()
                .iter()
                .find(|o| !(MIN_OFFSET..=MAX_OFFSET).contains(*o))
            {
                return Err(ConfigError::OffsetOutOfRange {
                    offset,
                    min: MIN_OFFSET,
                    max: MAX_OFFSET,
                });
            }
        }
        let max_key = self.progression.max_key().ok_or(ConfigError::EmptyProgression)?;
        if max_key >= self.note_sets.len() {
            return Err(ConfigError::NotEnoughNoteSets {
                index: max_key,
                needed: max_key + 1,
                available: self.note_sets.len(),
            });
        }
        Ok(())
    }
}
