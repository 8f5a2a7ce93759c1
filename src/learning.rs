// File: src/learning.rs
use crate::core::corpus::AlignedCorpus;
use crate::core::params::ParameterStore;
use crate::core::types::EmStep;
use crate::errors::{AlignError, Result};
use std::time::{Duration, Instant};

/// Summary of one completed EM iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Sum over source positions of ln(sum over target positions of t(f | e)),
    /// computed from the parameters the E-step read.
    pub log_likelihood: f64,
    /// Number of stored T entries after the M-step.
    pub translation_entries: usize,
    pub elapsed: Duration,
}

/// Runs IBM Model 1 Expectation-Maximization over a fixed corpus.
///
/// The first E-step reads the uniform prior; every later one reads the T
/// produced by the previous M-step.
#[derive(Debug, Default)]
pub struct EmTrainer {
    iterations_done: usize,
}

impl EmTrainer {
    pub fn new() -> Self {
        Self { iterations_done: 0 }
    }

    /// A trainer that continues after `iterations_done` completed iterations.
    pub fn resume(iterations_done: usize) -> Self {
        Self { iterations_done }
    }

    pub fn iterations_done(&self) -> usize {
        self.iterations_done
    }

    /// Runs `iterations` full iterations and returns the stats of each.
    pub fn train(
        &mut self,
        corpus: &AlignedCorpus,
        params: &mut ParameterStore,
        iterations: usize,
    ) -> Result<Vec<IterationStats>> {
        (0..iterations)
            .map(|_| self.run_iteration(corpus, params))
            .collect()
    }

    /// Clears C, then runs one E-step and one M-step.
    pub fn run_iteration(
        &mut self,
        corpus: &AlignedCorpus,
        params: &mut ParameterStore,
    ) -> Result<IterationStats> {
        let started = Instant::now();
        let use_uniform_prior = self.iterations_done == 0;

        params.reset_counts();
        let log_likelihood = self.expectation_step(corpus, params, use_uniform_prior)?;
        self.maximization_step(corpus, params)?;
        self.iterations_done += 1;

        let stats = IterationStats {
            iteration: self.iterations_done,
            log_likelihood,
            translation_entries: params.translation().len(),
            elapsed: started.elapsed(),
        };
        tracing::debug!(
            iteration = stats.iteration,
            log_likelihood = stats.log_likelihood,
            translation_entries = stats.translation_entries,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "EM iteration complete"
        );
        Ok(stats)
    }

    /// Accumulates expected alignment counts into C from the current T.
    ///
    /// Every target position contributes, so a word repeated in a sentence is
    /// counted once per occurrence. Returns the log-likelihood of the corpus
    /// under the parameters that were read.
    pub fn expectation_step(
        &self,
        corpus: &AlignedCorpus,
        params: &mut ParameterStore,
        use_uniform_prior: bool,
    ) -> Result<f64> {
        let mut log_likelihood = 0.0;
        for pair in corpus.pairs() {
            for &f in &pair.source {
                let denom: f64 = pair
                    .target
                    .iter()
                    .map(|&e| params.read_t(e, f, use_uniform_prior))
                    .sum();
                if denom == 0.0 {
                    return Err(AlignError::ZeroDenominator {
                        step: EmStep::Expectation,
                        target_id: None,
                        source_id: Some(f),
                    });
                }
                log_likelihood += denom.ln();
                for &e in &pair.target {
                    let t = params.read_t(e, f, use_uniform_prior);
                    params.accumulate_c(e, f, t / denom);
                }
            }
        }
        Ok(log_likelihood)
    }

    /// Re-estimates T from C.
    ///
    /// Each row C[e] is normalized by its total over the whole source
    /// vocabulary. Only pairs that co-occur in some sentence pair get written,
    /// so T keeps the sparsity of the corpus.
    pub fn maximization_step(
        &self,
        corpus: &AlignedCorpus,
        params: &mut ParameterStore,
    ) -> Result<()> {
        let totals: Vec<f64> = (0..params.counts().num_rows())
            .map(|e| params.count_total(e))
            .collect();

        for pair in corpus.pairs() {
            if pair.source.is_empty() {
                continue;
            }
            for &e in &pair.target {
                let denom = totals.get(e).copied().unwrap_or(0.0);
                if denom == 0.0 {
                    return Err(AlignError::ZeroDenominator {
                        step: EmStep::Maximization,
                        target_id: Some(e),
                        source_id: None,
                    });
                }
                for &f in &pair.source {
                    let count = params.read_c(e, f);
                    params.write_t(e, f, count / denom);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::corpus::SentencePair;

    const EPS: f64 = 1e-12;

    fn pair(target: &[usize], source: &[usize]) -> SentencePair {
        SentencePair {
            target: target.to_vec(),
            source: source.to_vec(),
        }
    }

    fn dog_corpus() -> (AlignedCorpus, ParameterStore) {
        // nullword=0 a=1 dog=2 / un=0 chien=1
        let corpus: AlignedCorpus = vec![pair(&[0, 1, 2], &[0, 1])].into_iter().collect();
        (corpus, ParameterStore::initialize(3, 2))
    }

    #[test]
    fn first_e_step_spreads_counts_uniformly() {
        let (corpus, mut params) = dog_corpus();
        let trainer = EmTrainer::new();
        trainer.expectation_step(&corpus, &mut params, true).unwrap();
        for e in 0..3 {
            for f in 0..2 {
                assert!((params.read_c(e, f) - 1.0 / 3.0).abs() < EPS);
            }
        }
        assert!(params.translation().is_empty());
    }

    #[test]
    fn first_m_step_normalizes_rows() {
        let (corpus, mut params) = dog_corpus();
        let mut trainer = EmTrainer::new();
        trainer.run_iteration(&corpus, &mut params).unwrap();
        for e in 0..3 {
            for f in 0..2 {
                assert!((params.read_t(e, f, false) - 0.5).abs() < EPS);
            }
        }
        assert_eq!(trainer.iterations_done(), 1);
    }

    #[test]
    fn duplicate_target_words_count_per_position() {
        // target: null, x, x ; source: y
        let corpus: AlignedCorpus = vec![pair(&[0, 1, 1], &[0])].into_iter().collect();
        let mut params = ParameterStore::initialize(2, 1);
        EmTrainer::new()
            .expectation_step(&corpus, &mut params, true)
            .unwrap();
        assert!((params.read_c(0, 0) - 1.0 / 3.0).abs() < EPS);
        assert!((params.read_c(1, 0) - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn counts_are_reset_between_iterations() {
        let (corpus, mut params) = dog_corpus();
        let mut trainer = EmTrainer::new();
        trainer.train(&corpus, &mut params, 3).unwrap();
        // Each source position distributes exactly one unit of count.
        let total: f64 = (0..3).map(|e| params.count_total(e)).sum();
        assert!((total - 2.0).abs() < 1e-9);
    }

    #[test]
    fn never_co_occurring_pairs_stay_zero() {
        // the house / la maison ; the book / le livre
        // null=0 the=1 house=2 book=3 ; la=0 maison=1 le=2 livre=3
        let corpus: AlignedCorpus = vec![
            pair(&[0, 1, 2], &[0, 1]),
            pair(&[0, 1, 3], &[2, 3]),
        ]
        .into_iter()
        .collect();
        let mut params = ParameterStore::initialize(4, 4);
        EmTrainer::new().train(&corpus, &mut params, 4).unwrap();
        assert_eq!(params.read_t(2, 3, false), 0.0);
        assert_eq!(params.read_t(3, 0, false), 0.0);
        assert_eq!(params.translation().get(2, 2), None);
        assert!(params.read_t(1, 0, false) > 0.0);
    }

    #[test]
    fn sparsity_closure_matches_co_occurrence() {
        let corpus: AlignedCorpus = vec![
            pair(&[0, 1, 2], &[0, 1]),
            pair(&[0, 1, 3], &[2, 3]),
            pair(&[0, 3], &[3]),
        ]
        .into_iter()
        .collect();
        let mut params = ParameterStore::initialize(4, 4);
        EmTrainer::new().train(&corpus, &mut params, 2).unwrap();

        for e in 0..4 {
            let mut expected: Vec<usize> = corpus
                .pairs()
                .iter()
                .filter(|p| p.target.contains(&e))
                .flat_map(|p| p.source.iter().copied())
                .collect();
            expected.sort_unstable();
            expected.dedup();

            let mut stored: Vec<usize> = params
                .translation()
                .row(e)
                .unwrap()
                .iter()
                .filter(|(_, &v)| v > 0.0)
                .map(|(&f, _)| f)
                .collect();
            stored.sort_unstable();
            assert_eq!(stored, expected, "row {}", e);
        }
    }

    #[test]
    fn repeated_m_step_is_bit_identical() {
        let (corpus, mut params) = dog_corpus();
        let mut trainer = EmTrainer::new();
        trainer.train(&corpus, &mut params, 2).unwrap();
        let before = params.translation().clone();
        trainer.maximization_step(&corpus, &mut params).unwrap();
        assert_eq!(params.translation(), &before);
    }

    #[test]
    fn zero_iterations_leave_t_unchanged() {
        let (corpus, mut params) = dog_corpus();
        let mut trainer = EmTrainer::new();
        trainer.train(&corpus, &mut params, 2).unwrap();
        let before = params.translation().clone();
        let stats = trainer.train(&corpus, &mut params, 0).unwrap();
        assert!(stats.is_empty());
        assert_eq!(params.translation(), &before);
        assert_eq!(trainer.iterations_done(), 2);
    }

    #[test]
    fn rows_of_t_sum_to_one() {
        let corpus: AlignedCorpus = vec![
            pair(&[0, 1, 2], &[0, 1]),
            pair(&[0, 1, 3], &[0, 2]),
        ]
        .into_iter()
        .collect();
        let mut params = ParameterStore::initialize(4, 3);
        EmTrainer::new().train(&corpus, &mut params, 5).unwrap();
        for e in 0..4 {
            assert!((params.translation().row_sum(e) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn em_concentrates_shared_word() {
        // "the" co-occurs with "la" twice, "house"/"maison" and "flower"/"fleur" once.
        // null=0 the=1 house=2 flower=3 ; la=0 maison=1 fleur=2
        let corpus: AlignedCorpus = vec![
            pair(&[0, 1, 2], &[0, 1]),
            pair(&[0, 1, 3], &[0, 2]),
        ]
        .into_iter()
        .collect();
        let mut params = ParameterStore::initialize(4, 3);
        EmTrainer::new().train(&corpus, &mut params, 10).unwrap();
        assert!(params.read_t(1, 0, false) > params.read_t(1, 1, false));
        assert!(params.read_t(2, 1, false) > params.read_t(2, 0, false));
    }

    #[test]
    fn log_likelihood_does_not_decrease() {
        let corpus: AlignedCorpus = vec![
            pair(&[0, 1, 2], &[0, 1]),
            pair(&[0, 1, 3], &[0, 2]),
            pair(&[0, 2, 3], &[1, 2]),
        ]
        .into_iter()
        .collect();
        let mut params = ParameterStore::initialize(4, 3);
        let stats = EmTrainer::new().train(&corpus, &mut params, 6).unwrap();
        for window in stats.windows(2) {
            assert!(window[1].log_likelihood >= window[0].log_likelihood - 1e-9);
        }
    }

    #[test]
    fn inconsistent_tables_report_zero_denominator() {
        // T was trained on a different corpus than the one being read.
        let trained: AlignedCorpus = vec![pair(&[0, 1], &[0])].into_iter().collect();
        let other: AlignedCorpus = vec![pair(&[0, 1], &[1])].into_iter().collect();
        let mut params = ParameterStore::initialize(2, 2);
        let mut trainer = EmTrainer::new();
        trainer.run_iteration(&trained, &mut params).unwrap();
        let err = trainer.run_iteration(&other, &mut params).unwrap_err();
        assert!(matches!(
            err,
            AlignError::ZeroDenominator {
                step: EmStep::Expectation,
                source_id: Some(1),
                ..
            }
        ));
    }

    #[test]
    fn m_step_without_counts_reports_zero_denominator() {
        let corpus: AlignedCorpus = vec![pair(&[0, 1], &[0])].into_iter().collect();
        let mut params = ParameterStore::initialize(2, 1);
        let err = EmTrainer::new()
            .maximization_step(&corpus, &mut params)
            .unwrap_err();
        assert!(matches!(
            err,
            AlignError::ZeroDenominator {
                step: EmStep::Maximization,
                target_id: Some(0),
                source_id: None,
            }
        ));
    }

    #[test]
    fn empty_source_sentence_is_harmless() {
        let corpus: AlignedCorpus = vec![pair(&[0, 1], &[]), pair(&[0, 2], &[0])]
            .into_iter()
            .collect();
        let mut params = ParameterStore::initialize(3, 1);
        EmTrainer::new().train(&corpus, &mut params, 2).unwrap();
        assert_eq!(params.translation().row(1).map(|r| r.len()), Some(0));
        assert!((params.read_t(2, 0, false) - 1.0).abs() < EPS);
    }
}
