// src/core/corpus.rs
use crate::core::text::normalize_and_split;
use crate::core::types::{Language, WordId, NULL_WORD_ID};
use crate::core::vocabulary::Vocabularies;
use crate::errors::{AlignError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One aligned sentence pair, stored as word ids.
/// `target` always starts with the null word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentencePair {
    pub target: Vec<WordId>,
    pub source: Vec<WordId>,
}

/// Outcome of a corpus load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub lines_read: usize,
    pub kept: usize,
    pub skipped: usize,
    /// Loading stopped because more than `max_pairs` pairs were kept.
    pub truncated: bool,
}

/// The training corpus. Built once, then only read.
#[derive(Debug, Clone, Default)]
pub struct AlignedCorpus {
    pairs: Vec<SentencePair>,
}

impl AlignedCorpus {
    /// Loads a sentence-aligned pair of files, line i of one aligned with line i of the other.
    pub fn load(
        source_path: &Path,
        target_path: &Path,
        max_length: usize,
        max_pairs: usize,
        vocab: &mut Vocabularies,
    ) -> Result<(Self, LoadReport)> {
        let source = BufReader::new(File::open(source_path)?);
        let target = BufReader::new(File::open(target_path)?);
        Self::from_readers(source, target, max_length, max_pairs, vocab)
    }

    /// Same as [`AlignedCorpus::load`] over arbitrary line readers.
    ///
    /// Pairs with more than `max_length` tokens on either side are skipped.
    /// Loading stops once more than `max_pairs` pairs have been kept, so the
    /// corpus ends up with `max_pairs + 1` pairs. A `max_pairs` of 0 means no cap.
    pub fn from_readers<S: BufRead, T: BufRead>(
        source: S,
        target: T,
        max_length: usize,
        max_pairs: usize,
        vocab: &mut Vocabularies,
    ) -> Result<(Self, LoadReport)> {
        let mut corpus = Self::default();
        let mut report = LoadReport::default();
        let mut source_lines = source.lines();
        let mut target_lines = target.lines();

        loop {
            let (source_line, target_line) = match (source_lines.next(), target_lines.next()) {
                (None, None) => break,
                (Some(s), Some(t)) => (s?, t?),
                (s, _) => {
                    return Err(AlignError::CorpusMismatch {
                        lines_read: report.lines_read,
                        source_exhausted: s.is_none(),
                    })
                }
            };
            report.lines_read += 1;

            let f = normalize_and_split(&source_line);
            let e = normalize_and_split(&target_line);
            if f.len() > max_length || e.len() > max_length {
                report.skipped += 1;
                continue;
            }

            let mut target_ids = Vec::with_capacity(e.len() + 1);
            target_ids.push(NULL_WORD_ID);
            target_ids.extend(e.iter().map(|w| vocab.get_id(w, Language::Target)));
            let source_ids = f.iter().map(|w| vocab.get_id(w, Language::Source)).collect();

            corpus.pairs.push(SentencePair {
                target: target_ids,
                source: source_ids,
            });
            report.kept += 1;
            if max_pairs > 0 && corpus.pairs.len() > max_pairs {
                report.truncated = true;
                break;
            }
        }

        tracing::info!(
            kept = report.kept,
            skipped = report.skipped,
            lines_read = report.lines_read,
            truncated = report.truncated,
            "{} sentence pairs loaded out of {} available",
            report.kept,
            report.lines_read
        );
        Ok((corpus, report))
    }

    pub fn pairs(&self) -> &[SentencePair] {
        &self.pairs
    }

    pub fn get(&self, index: usize) -> Option<&SentencePair> {
        self.pairs.get(index)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<SentencePair> for AlignedCorpus {
    fn from_iter<I: IntoIterator<Item = SentencePair>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}
