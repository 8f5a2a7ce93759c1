// --- File: src/core/vocabulary.rs
use crate::core::types::{Language, WordId, NULL_WORD, NULL_WORD_ID};
use crate::errors::{AlignError, Result};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// A bidirectional word <-> id index for a single language.
/// Ids are handed out densely in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    word_to_id: HashMap<String, WordId>,
    id_to_word: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// A vocabulary whose id 0 is already taken by the null word.
    pub fn with_null_word() -> Self {
        let mut vocab = Self::new();
        vocab.get_or_insert(NULL_WORD);
        vocab
    }

    /// Returns the id of `word`, assigning the next free id if it is new.
    pub fn get_or_insert(&mut self, word: &str) -> WordId {
        if let Some(&id) = self.word_to_id.get(word) {
            return id;
        }
        let id = self.id_to_word.len();
        self.word_to_id.insert(word.to_string(), id);
        self.id_to_word.push(word.to_string());
        id
    }

    pub fn get(&self, word: &str) -> Option<WordId> {
        self.word_to_id.get(word).copied()
    }

    pub fn word(&self, id: WordId) -> Option<&str> {
        self.id_to_word.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.id_to_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_word.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.id_to_word.iter().map(String::as_str)
    }
}

/// The pair of vocabularies for a parallel corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabularies {
    pub target: Vocabulary,
    pub source: Vocabulary,
}

impl Default for Vocabularies {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabularies {
    pub fn new() -> Self {
        Self {
            target: Vocabulary::with_null_word(),
            source: Vocabulary::new(),
        }
    }

    pub fn language(&self, language: Language) -> &Vocabulary {
        match language {
            Language::Target => &self.target,
            Language::Source => &self.source,
        }
    }

    fn language_mut(&mut self, language: Language) -> &mut Vocabulary {
        match language {
            Language::Target => &mut self.target,
            Language::Source => &mut self.source,
        }
    }

    pub fn get_id(&mut self, word: &str, language: Language) -> WordId {
        self.language_mut(language).get_or_insert(word)
    }

    /// Read-only lookup; never grows the vocabulary.
    pub fn lookup(&self, word: &str, language: Language) -> Option<WordId> {
        self.language(language).get(word)
    }

    pub fn get_word(&self, id: WordId, language: Language) -> Result<&str> {
        let vocab = self.language(language);
        vocab.word(id).ok_or(AlignError::IndexOutOfRange {
            language,
            id,
            len: vocab.len(),
        })
    }

    pub fn null_word(&self) -> &str {
        self.target.word(NULL_WORD_ID).unwrap_or(NULL_WORD)
    }
}
