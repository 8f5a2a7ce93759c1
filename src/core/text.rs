// src/core/text.rs
use regex::Regex;
use std::sync::LazyLock;

/// Canonical token every run of digits is folded into.
pub const NUMBER_TOKEN: &str = "NUM";

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Lower-cases a line, folds digit runs into [`NUMBER_TOKEN`] and splits on whitespace.
///
/// Deliberately coarse: proper nouns lose their capitalization and every
/// number looks the same to the model.
pub fn normalize_and_split(line: &str) -> Vec<String> {
    let lowered = line.to_lowercase();
    DIGIT_RUN
        .replace_all(&lowered, NUMBER_TOKEN)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
