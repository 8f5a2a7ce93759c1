use crate::config::TrainConfig;
use crate::core::corpus::{AlignedCorpus, LoadReport};
use crate::core::params::ParameterStore;
use crate::core::snapshot::{ModelSnapshot, TrainingMetadata};
use crate::core::types::{Language, WordId};
use crate::core::vocabulary::Vocabularies;
use crate::errors::{AlignError, Result};
use crate::learning::{EmTrainer, IterationStats};
use std::io::BufRead;
use std::path::Path;
use std::time::{Duration, Instant};

/// The IBM Model 1 training state.
///
/// Built once from a parallel corpus, mutated only by [`Ibm1Model::train`],
/// then turned into a [`ModelSnapshot`] for saving and inspection.
pub struct Ibm1Model {
    vocab: Vocabularies,
    corpus: AlignedCorpus,
    params: ParameterStore,
    trainer: EmTrainer,
    config: TrainConfig,
    load_report: LoadReport,
    train_time: Duration,
}

impl Ibm1Model {
    pub fn from_files(source: &Path, target: &Path, config: TrainConfig) -> Result<Self> {
        let mut vocab = Vocabularies::new();
        let (corpus, report) = AlignedCorpus::load(
            source,
            target,
            config.max_sentence_length,
            config.max_pairs,
            &mut vocab,
        )?;
        Self::from_corpus(vocab, corpus, report, config)
    }

    pub fn from_readers<S: BufRead, T: BufRead>(
        source: S,
        target: T,
        config: TrainConfig,
    ) -> Result<Self> {
        let mut vocab = Vocabularies::new();
        let (corpus, report) = AlignedCorpus::from_readers(
            source,
            target,
            config.max_sentence_length,
            config.max_pairs,
            &mut vocab,
        )?;
        Self::from_corpus(vocab, corpus, report, config)
    }

    /// Wraps an already indexed corpus. The parameter tables start empty.
    ///
    /// Every id in the corpus must have been assigned by `vocab`.
    pub fn from_corpus(
        vocab: Vocabularies,
        corpus: AlignedCorpus,
        load_report: LoadReport,
        config: TrainConfig,
    ) -> Result<Self> {
        check_ids(&vocab, &corpus)?;
        let params = ParameterStore::initialize(vocab.target.len(), vocab.source.len());
        Ok(Self {
            vocab,
            corpus,
            params,
            trainer: EmTrainer::new(),
            config,
            load_report,
            train_time: Duration::ZERO,
        })
    }

    /// Runs the configured number of EM iterations.
    pub fn train(&mut self) -> Result<Vec<IterationStats>> {
        self.train_iterations(self.config.iteration_count)
    }

    pub fn train_iterations(&mut self, iterations: usize) -> Result<Vec<IterationStats>> {
        tracing::info!(
            iterations,
            sentence_pairs = self.corpus.len(),
            target_vocab = self.vocab.target.len(),
            source_vocab = self.vocab.source.len(),
            "starting EM training"
        );
        let started = Instant::now();
        let stats = self.trainer.train(&self.corpus, &mut self.params, iterations)?;
        self.train_time += started.elapsed();
        tracing::info!(
            iterations_done = self.trainer.iterations_done(),
            translation_entries = self.params.translation().len(),
            train_time_ms = self.train_time.as_millis() as u64,
            "EM training finished"
        );
        Ok(stats)
    }

    /// t(f | e) as the next E-step would read it.
    pub fn read_t(&self, e: WordId, f: WordId) -> f64 {
        self.params
            .read_t(e, f, self.trainer.iterations_done() == 0)
    }

    /// Turns a stored pair back into words, null word included.
    pub fn sentence_words(&self, index: usize) -> Result<(Vec<&str>, Vec<&str>)> {
        let pair = self.corpus.get(index).ok_or(AlignError::PairOutOfRange {
            index,
            len: self.corpus.len(),
        })?;
        let target = pair
            .target
            .iter()
            .map(|&e| self.vocab.get_word(e, Language::Target))
            .collect::<Result<Vec<_>>>()?;
        let source = pair
            .source
            .iter()
            .map(|&f| self.vocab.get_word(f, Language::Source))
            .collect::<Result<Vec<_>>>()?;
        Ok((target, source))
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            vocab: self.vocab.clone(),
            translation: self.params.translation().clone(),
            metadata: self.metadata(),
        }
    }

    pub fn into_snapshot(self) -> ModelSnapshot {
        let metadata = self.metadata();
        ModelSnapshot {
            vocab: self.vocab,
            translation: self.params.into_translation(),
            metadata,
        }
    }

    fn metadata(&self) -> TrainingMetadata {
        TrainingMetadata {
            train_time: self.train_time,
            iterations: self.trainer.iterations_done(),
            sentence_pairs: self.corpus.len(),
            config: self.config,
        }
    }

    pub fn vocab(&self) -> &Vocabularies {
        &self.vocab
    }

    pub fn corpus(&self) -> &AlignedCorpus {
        &self.corpus
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn load_report(&self) -> LoadReport {
        self.load_report
    }

    pub fn iterations_done(&self) -> usize {
        self.trainer.iterations_done()
    }
}

fn check_ids(vocab: &Vocabularies, corpus: &AlignedCorpus) -> Result<()> {
    for pair in corpus.pairs() {
        let sides = [
            (Language::Target, &pair.target, vocab.target.len()),
            (Language::Source, &pair.source, vocab.source.len()),
        ];
        for (language, ids, len) in sides {
            if let Some(&id) = ids.iter().find(|&&id| id >= len) {
                return Err(AlignError::IndexOutOfRange { language, id, len });
            }
        }
    }
    Ok(())
}
