//! Error types for corpus loading, training and model persistence.

use crate::core::types::{EmStep, Language, WordId};

/// Result type used throughout the crate, defaulting to [`AlignError`].
pub type Result<T, E = AlignError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// The two sides of the corpus do not have the same number of lines.
    #[error(
        "source and target files have different line counts \
         (source ran out: {source_exhausted}, lines read: {lines_read})"
    )]
    CorpusMismatch {
        lines_read: usize,
        source_exhausted: bool,
    },

    /// A word id that was never assigned in the given vocabulary.
    #[error("id {id} is out of range for vocabulary {language} (size {len})")]
    IndexOutOfRange {
        language: Language,
        id: WordId,
        len: usize,
    },

    #[error("sentence pair {index} is out of range (corpus size {len})")]
    PairOutOfRange { index: usize, len: usize },

    /// A normalizer that must be positive summed to zero.
    ///
    /// This points at an inconsistency between the corpus, the vocabularies
    /// and the parameter tables, never at a legitimate training state.
    #[error("{step} denominator is zero (target id {target_id:?}, source id {source_id:?})")]
    ZeroDenominator {
        step: EmStep,
        target_id: Option<WordId>,
        source_id: Option<WordId>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Snapshot(#[from] bincode::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}
