use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Cards a player holds after drawing.
pub const HAND_SIZE: usize = 5;
/// Round wins needed to take the match.
pub const ROUNDS_TO_WIN: u32 = 5;

/// The ruleset of a match.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Attacks always hit. No strengthening, parrying or retreating.
    #[default]
    Basic,
    /// Attacks may be strengthened and parried, advance-attacks may be dodged by retreating.
    Advanced,
}

impl Mode {
    /// Whether a declared attack can be strengthened and defended against.
    pub fn allows_defense(self) -> bool {
        self == Mode::Advanced
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Basic => write!(f, "basic"),
            Mode::Advanced => write!(f, "advanced"),
        }
    }
}

/// The error type for the [`FromStr`] instance of [`Mode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl std::error::Error for UnknownMode {}

impl std::fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown mode '{}', expected 'basic' or 'advanced'", self.0)
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Mode::Basic),
            "advanced" => Ok(Mode::Advanced),
            _ => Err(UnknownMode(String::from(s))),
        }
    }
}

/// Settings for a new [`Match`](crate::Match).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The ruleset of the first round.
    pub mode: Mode,
    /// Seed for shuffling. A random seed is picked when this is `None`.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mode_names() {
        assert_eq!("basic".parse::<Mode>(), Ok(Mode::Basic));
        assert_eq!("Advanced".parse::<Mode>(), Ok(Mode::Advanced));
        assert!("expert".parse::<Mode>().is_err());
        assert_eq!(Mode::Advanced.to_string(), "advanced");
    }
}
