// src/config.rs
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Training options. Any field missing from a config file takes its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Sentence pairs with more tokens than this on either side are dropped.
    pub max_sentence_length: usize,
    /// Loading stops once more than this many pairs are kept; 0 means no limit.
    pub max_pairs: usize,
    /// Number of EM iterations.
    pub iteration_count: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_sentence_length: 30,
            max_pairs: 0,
            iteration_count: 3,
        }
    }
}

impl TrainConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
