// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dense integer identifier for a word within one language's vocabulary.
pub type WordId = usize;

/// Id of the synthetic null word, reserved in the target vocabulary.
pub const NULL_WORD_ID: WordId = 0;

/// Surface form of the null word.
pub const NULL_WORD: &str = "nullword";

/// The two sides of the parallel corpus.
///
/// `Target` (E) is the side we condition on, t(f | e), and carries the null word.
/// `Source` (F) is the side whose words are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Target,
    Source,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Target => write!(f, "E"),
            Language::Source => write!(f, "F"),
        }
    }
}

/// Which half of an EM iteration produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmStep {
    Expectation,
    Maximization,
}

impl fmt::Display for EmStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmStep::Expectation => write!(f, "E-step"),
            EmStep::Maximization => write!(f, "M-step"),
        }
    }
}
