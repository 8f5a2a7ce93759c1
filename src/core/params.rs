// src/core/params.rs
use crate::core::table::SparseTable;
use crate::core::types::WordId;

/// The translation table T and the expected-count table C.
///
/// Both start with one empty row per target id. The uniform starting value of
/// T is never written down; it is returned by [`ParameterStore::read_t`]
/// while `use_uniform_prior` is set.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    translation: SparseTable,
    counts: SparseTable,
    uniform: f64,
}

impl ParameterStore {
    pub fn initialize(target_vocab_size: usize, source_vocab_size: usize) -> Self {
        let uniform = if source_vocab_size == 0 {
            0.0
        } else {
            1.0 / source_vocab_size as f64
        };
        Self {
            translation: SparseTable::new(target_vocab_size),
            counts: SparseTable::new(target_vocab_size),
            uniform,
        }
    }

    /// t(f | e). Absent entries are exactly 0: the pair never co-occurred.
    #[inline]
    pub fn read_t(&self, e: WordId, f: WordId, use_uniform_prior: bool) -> f64 {
        if use_uniform_prior {
            return self.uniform;
        }
        self.translation.value(e, f)
    }

    #[inline]
    pub fn write_t(&mut self, e: WordId, f: WordId, value: f64) {
        self.translation.set(e, f, value);
    }

    #[inline]
    pub fn accumulate_c(&mut self, e: WordId, f: WordId, amount: f64) {
        self.counts.add(e, f, amount);
    }

    #[inline]
    pub fn read_c(&self, e: WordId, f: WordId) -> f64 {
        self.counts.value(e, f)
    }

    /// Total expected count of target word `e` over the whole source vocabulary.
    ///
    /// Unstored entries are zero, so summing the stored row is the same as
    /// summing `read_c(e, wf)` for every source id `wf`.
    pub fn count_total(&self, e: WordId) -> f64 {
        self.counts.row_sum(e)
    }

    pub fn reset_counts(&mut self) {
        self.counts.clear();
    }

    pub fn uniform(&self) -> f64 {
        self.uniform
    }

    pub fn translation(&self) -> &SparseTable {
        &self.translation
    }

    pub fn counts(&self) -> &SparseTable {
        &self.counts
    }

    pub fn into_translation(self) -> SparseTable {
        self.translation
    }
}
