//! Candidate generation - bounded, pattern-filtered username enumeration

mod combinations;

pub use combinations::{generate, CombinationGenerator, Combinations};

use crate::error::HandleForgeError;
use std::str::FromStr;

/// Character set presets for building an alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// Only lowercase letters (a-z)
    #[default]
    Letters,
    /// Letters and digits (a-z, 0-9)
    Alphanumeric,
    /// Only digits (0-9)
    Digits,
}

impl Charset {
    pub fn chars(&self) -> &'static [char] {
        match self {
            Charset::Letters => &[
                'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
                'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
            ],
            Charset::Alphanumeric => &[
                'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
                'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
                '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
            ],
            Charset::Digits => &['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'],
        }
    }

    pub fn alphabet(&self) -> Vec<char> {
        self.chars().to_vec()
    }
}

impl FromStr for Charset {
    type Err = HandleForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "letters" | "alpha" => Ok(Charset::Letters),
            "alnum" | "alphanumeric" => Ok(Charset::Alphanumeric),
            "digits" | "numeric" => Ok(Charset::Digits),
            other => Err(HandleForgeError::invalid_config(format!(
                "unknown charset '{}' (expected letters, alnum or digits)",
                other
            ))),
        }
    }
}
