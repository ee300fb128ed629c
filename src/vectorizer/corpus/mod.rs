use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::token::TokenFrequency;

/// Document-frequency statistics of a fit corpus.
///
/// Keeps, per token, the number of documents it appears in, plus the total
/// document count. Tokens are kept in first-seen order across the corpus so
/// ranking by document frequency can break ties deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    /// number of documents added, empty ones included
    doc_num: u64,
    /// token -> document frequency
    #[serde(with = "indexmap::map::serde_seq")]
    token_counts: IndexMap<Box<str>, u64>,
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            token_counts: IndexMap::new(),
        }
    }

    /// Add a document's distinct tokens to the corpus
    pub fn add_set<T>(&mut self, tokens: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for token in tokens {
            *self.token_counts.entry(token.as_ref().into()).or_insert(0) += 1;
        }
    }

    /// Add a counted document
    pub fn add_doc(&mut self, freq: &TokenFrequency) {
        self.add_set(&freq.token_set_ref_str());
    }

    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    /// number of documents containing `token`
    #[inline]
    pub fn token_count(&self, token: &str) -> u64 {
        self.token_counts.get(token).copied().unwrap_or(0)
    }

    /// number of distinct tokens seen
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.token_counts.len()
    }

    /// Up to `max` tokens with the highest document frequency.
    /// Ties keep first-seen order (stable sort).
    pub fn top_tokens(&self, max: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .token_counts
            .iter()
            .map(|(t, &c)| (&**t, c))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(max);
        ranked
    }
}
