// --- File: src/core/table.rs
use crate::core::types::WordId;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// One row of a sparse table: source id -> value.
pub type SparseRow = HashMap<WordId, f64>;

/// A (target id, source id) -> value table that only stores observed pairs.
///
/// There is one row per target id; a row holds entries only for the source
/// ids that were explicitly written. Missing entries read as `None`, which
/// callers treat as zero. Memory is O(stored pairs), not O(|E| x |F|).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseTable {
    rows: Vec<SparseRow>,
}

impl SparseTable {
    pub fn new(num_rows: usize) -> Self {
        Self {
            rows: (0..num_rows).map(|_| SparseRow::new()).collect(),
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The stored value, distinguishing "absent" from a stored zero.
    #[inline]
    pub fn get(&self, e: WordId, f: WordId) -> Option<f64> {
        self.rows.get(e).and_then(|row| row.get(&f).copied())
    }

    /// The stored value, or 0 for an absent entry.
    #[inline]
    pub fn value(&self, e: WordId, f: WordId) -> f64 {
        self.get(e, f).unwrap_or(0.0)
    }

    #[inline]
    pub fn set(&mut self, e: WordId, f: WordId, value: f64) {
        self.rows[e].insert(f, value);
    }

    /// Adds `amount` to an entry, treating a missing entry as 0.
    #[inline]
    pub fn add(&mut self, e: WordId, f: WordId, amount: f64) {
        *self.rows[e].entry(f).or_insert(0.0) += amount;
    }

    pub fn row(&self, e: WordId) -> Option<&SparseRow> {
        self.rows.get(e)
    }

    /// Sum of all stored values in row `e`.
    pub fn row_sum(&self, e: WordId) -> f64 {
        self.rows.get(e).map_or(0.0, |row| row.values().sum())
    }

    /// Empties every row, keeping the row count.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.clear();
        }
    }

    /// Total number of stored entries across all rows.
    pub fn len(&self) -> usize {
        self.rows.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(HashMap::is_empty)
    }

    /// The entry with the largest value in row `e`.
    /// Ties go to the smaller source id so the answer is stable.
    pub fn row_max(&self, e: WordId) -> Option<(WordId, f64)> {
        self.rows.get(e)?.iter().map(|(&f, &v)| (f, v)).fold(None, |best, (f, v)| match best {
            Some((bf, bv)) if bv > v || (bv == v && bf < f) => Some((bf, bv)),
            _ => Some((f, v)),
        })
    }

    /// The `k` largest entries of row `e`, in descending order of value.
    pub fn row_top_k(&self, e: WordId, k: usize) -> Vec<(WordId, f64)> {
        let mut entries: Vec<(WordId, f64)> = match self.rows.get(e) {
            Some(row) => row.iter().map(|(&f, &v)| (f, v)).collect(),
            None => return vec![],
        };
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(k);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_distinct_from_stored_zero() {
        let mut table = SparseTable::new(2);
        table.set(1, 4, 0.0);
        assert_eq!(table.get(1, 4), Some(0.0));
        assert_eq!(table.get(1, 5), None);
        assert_eq!(table.value(1, 5), 0.0);
        assert_eq!(table.get(7, 0), None);
    }

    #[test]
    fn add_creates_then_accumulates() {
        let mut table = SparseTable::new(1);
        table.add(0, 3, 0.25);
        table.add(0, 3, 0.5);
        assert_eq!(table.get(0, 3), Some(0.75));
        assert_eq!(table.len(), 1);
        assert_eq!(table.row_sum(0), 0.75);
    }

    #[test]
    fn clear_keeps_rows() {
        let mut table = SparseTable::new(3);
        table.add(2, 0, 1.0);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.num_rows(), 3);
    }

    #[test]
    fn row_max_and_top_k() {
        let mut table = SparseTable::new(1);
        table.set(0, 0, 0.2);
        table.set(0, 1, 0.5);
        table.set(0, 2, 0.3);
        assert_eq!(table.row_max(0), Some((1, 0.5)));
        assert_eq!(table.row_top_k(0, 2), vec![(1, 0.5), (2, 0.3)]);
        assert_eq!(SparseTable::new(1).row_max(0), None);
    }

    #[test]
    fn row_max_breaks_ties_on_smaller_id() {
        let mut table = SparseTable::new(1);
        table.set(0, 5, 0.5);
        table.set(0, 2, 0.5);
        assert_eq!(table.row_max(0), Some((2, 0.5)));
    }
}
