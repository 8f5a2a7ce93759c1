// src/core/snapshot.rs
use crate::config::TrainConfig;
use crate::core::table::SparseTable;
use crate::core::text::normalize_and_split;
use crate::core::types::{Language, WordId};
use crate::core::vocabulary::Vocabularies;
use crate::errors::{AlignError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Facts about the training run that produced a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Wall-clock time spent in EM iterations.
    pub train_time: Duration,
    pub iterations: usize,
    pub sentence_pairs: usize,
    pub config: TrainConfig,
}

/// A trained model: both vocabularies, the translation table and run metadata.
///
/// This is what gets persisted, and it answers inspection queries without
/// needing the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub vocab: Vocabularies,
    pub translation: SparseTable,
    pub metadata: TrainingMetadata,
}

/// One line of a translation report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub target: String,
    pub source: String,
    pub probability: f64,
}

impl ModelSnapshot {
    /// t(f | e), 0 for pairs that never co-occurred.
    pub fn probability(&self, e: WordId, f: WordId) -> f64 {
        self.translation.value(e, f)
    }

    /// The most probable source word for target id `e`, or `None` when T[e] is empty.
    pub fn best_translation(&self, e: WordId) -> Option<(WordId, f64)> {
        self.translation.row_max(e)
    }

    pub fn top_k_translations(&self, e: WordId, k: usize) -> Vec<(WordId, f64)> {
        self.translation.row_top_k(e, k)
    }

    /// Best translation of a target word given as text.
    /// `Ok(None)` if the word is unknown or has no translations.
    pub fn translate_word(&self, word: &str) -> Result<Option<Translation>> {
        let Some(e) = self.vocab.lookup(word, Language::Target) else {
            return Ok(None);
        };
        self.translation_for(e)
    }

    /// Best translations for free text typed by a user.
    ///
    /// The text goes through the same normalization as the corpus, so `"2008"`
    /// finds the `NUM` row and `"House"` finds `house`. Words without a
    /// translation are left out.
    pub fn translate_query(&self, text: &str) -> Result<Vec<Translation>> {
        let mut rows = Vec::new();
        for token in normalize_and_split(text) {
            if let Some(row) = self.translate_word(&token)? {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    fn translation_for(&self, e: WordId) -> Result<Option<Translation>> {
        let Some((f, probability)) = self.best_translation(e) else {
            return Ok(None);
        };
        Ok(Some(Translation {
            target: self.vocab.get_word(e, Language::Target)?.to_string(),
            source: self.vocab.get_word(f, Language::Source)?.to_string(),
            probability,
        }))
    }

    /// Best translations of the first target ids, in id order.
    ///
    /// Target ids are visited from 0 upwards until `limit` rows are collected.
    /// Rows whose best source word is `min_source_len` characters or shorter
    /// are left out, which hides most function words.
    pub fn top_translations(&self, limit: usize, min_source_len: usize) -> Result<Vec<Translation>> {
        let mut rows = Vec::new();
        for e in 0..self.vocab.target.len() {
            if rows.len() >= limit {
                break;
            }
            if let Some(row) = self.translation_for(e)? {
                if row.source.chars().count() > min_source_len {
                    rows.push(row);
                }
            }
        }
        Ok(rows)
    }

    /// Checks that every stored entry points at an assigned word.
    pub fn validate(&self) -> Result<()> {
        let rows = self.translation.num_rows();
        if rows > self.vocab.target.len() {
            return Err(AlignError::IndexOutOfRange {
                language: Language::Target,
                id: rows - 1,
                len: self.vocab.target.len(),
            });
        }
        for e in 0..rows {
            if let Some(row) = self.translation.row(e) {
                for &f in row.keys() {
                    self.vocab.get_word(f, Language::Source)?;
                }
            }
        }
        Ok(())
    }
}
