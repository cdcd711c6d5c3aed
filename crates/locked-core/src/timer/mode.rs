use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransitionError;

/// Which tracked activity a session targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Work,
    Rest,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Work, Mode::Rest];

    pub fn other(self) -> Mode {
        match self {
            Mode::Work => Mode::Rest,
            Mode::Rest => Mode::Work,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::Rest => "rest",
        }
    }

    /// Key-value store key holding this mode's history.
    pub fn history_key(self) -> &'static str {
        match self {
            Mode::Work => "locked-work-history",
            Mode::Rest => "locked-rest-history",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Mode::Work),
            "rest" | "break" => Ok(Mode::Rest),
            other => Err(TransitionError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_flips_mode() {
        assert_eq!(Mode::Work.other(), Mode::Rest);
        assert_eq!(Mode::Rest.other(), Mode::Work);
    }

    #[test]
    fn history_keys_are_distinct() {
        assert_ne!(Mode::Work.history_key(), Mode::Rest.history_key());
    }

    #[test]
    fn parse_mode() {
        assert_eq!(" Work ".parse::<Mode>().unwrap(), Mode::Work);
        assert_eq!("break".parse::<Mode>().unwrap(), Mode::Rest);
        assert!("nap".parse::<Mode>().is_err());
    }
}
