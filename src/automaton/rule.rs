//! Update rule selection.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// 1D rule used when the configured number is out of range
pub const DEFAULT_ELEMENTARY_RULE: u8 = 30;

/// Automaton update rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rule {
    #[default]
    Conway,
    ShiftUp,
    ShiftDown,
    ShiftLeft,
    ShiftRight,
    /// Pass-through; the board only changes when edited externally
    NoOp,
    /// Wolfram elementary rule applied one row at a time
    Elementary(u8),
    BriansBrain,
    Seeds,
    /// Langton-style ants encoded in states 2..=9
    Ant,
}

/// When the driver advances the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// After every played row
    PerStep,
    /// Once the whole board has been played
    PerCycle,
}

impl Rule {
    /// All rule names accepted by [`Rule::from_str`], in menu order
    pub const NAMES: [&'static str; 10] = [
        "conway", "up", "down", "left", "right", "none", "1d", "brians-brain", "seeds", "ant",
    ];

    /// Cadence this rule is normally driven at.
    ///
    /// The 1D rule rewrites one row per step and ants move one cell per step;
    /// everything else evolves the whole board between passes.
    pub fn default_cadence(&self) -> Cadence {
        match self {
            Rule::Elementary(_) | Rule::Ant => Cadence::PerStep,
            _ => Cadence::PerCycle,
        }
    }

    /// Largest state value the rule produces from in-domain input
    pub fn max_state(&self) -> u8 {
        match self {
            Rule::BriansBrain => 2,
            Rule::Ant => 9,
            _ => 1,
        }
    }
}

impl FromStr for Rule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        let rule = match normalized.as_str() {
            "conway" | "conways" | "life" => Rule::Conway,
            "up" => Rule::ShiftUp,
            "down" => Rule::ShiftDown,
            "left" => Rule::ShiftLeft,
            "right" => Rule::ShiftRight,
            "none" | "noupdate" | "noop" => Rule::NoOp,
            "1d" | "elementary" => Rule::Elementary(DEFAULT_ELEMENTARY_RULE),
            "briansbrain" | "brian" => Rule::BriansBrain,
            "seeds" => Rule::Seeds,
            "ant" | "langtonsant" | "langton" => Rule::Ant,
            _ => return Err(ConfigError::InvalidRule(s.to_string())),
        };
        Ok(rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Conway => write!(f, "Conway's Life"),
            Rule::ShiftUp => write!(f, "Shift Up"),
            Rule::ShiftDown => write!(f, "Shift Down"),
            Rule::ShiftLeft => write!(f, "Shift Left"),
            Rule::ShiftRight => write!(f, "Shift Right"),
            Rule::NoOp => write!(f, "No Update"),
            Rule::Elementary(n) => write!(f, "1D rule {}", n),
            Rule::BriansBrain => write!(f, "Brian's Brain"),
            Rule::Seeds => write!(f, "Seeds"),
            Rule::Ant => write!(f, "Langton's Ant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("Conways".parse::<Rule>().unwrap(), Rule::Conway);
        assert_eq!("Brian's Brain".parse::<Rule>().unwrap(), Rule::BriansBrain);
        assert_eq!("Langton's Ant".parse::<Rule>().unwrap(), Rule::Ant);
        assert_eq!("No Update".parse::<Rule>().unwrap(), Rule::NoOp);
    }

    #[test]
    fn test_every_listed_name_parses() {
        for name in Rule::NAMES {
            assert!(name.parse::<Rule>().is_ok(), "{name}");
        }
    }

    #[test]
    fn test_invalid_rule() {
        assert_eq!(
            "Highlife".parse::<Rule>().unwrap_err(),
            ConfigError::InvalidRule("Highlife".to_string())
        );
    }

    #[test]
    fn test_default_cadence() {
        assert_eq!(Rule::Elementary(30).default_cadence(), Cadence::PerStep);
        assert_eq!(Rule::Ant.default_cadence(), Cadence::PerStep);
        assert_eq!(Rule::Conway.default_cadence(), Cadence::PerCycle);
        assert_eq!(Rule::ShiftLeft.default_cadence(), Cadence::PerCycle);
    }
}
