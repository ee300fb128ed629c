use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::stop_words::StopWords;

/// Minimum token length in characters
pub const MIN_TOKEN_LEN: usize = 2;

/// Split already-normalized text into tokens.
///
/// A token is a maximal run of alphanumeric or `_` characters of at least
/// [`MIN_TOKEN_LEN`] characters. Stop words are dropped.
/// "node.js" yields `node` and `js`; "c++" yields nothing.
pub fn tokenize(text: &str, stop_words: &StopWords) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() >= MIN_TOKEN_LEN)
        .filter(|w| !stop_words.contains(w))
        .map(|w| w.to_string())
        .collect()
}

/// TokenFrequency 構造体
/// Token occurrence counts of a single document.
///
/// Keys keep first-seen order, which the vocabulary fit relies on to
/// break document-frequency ties deterministically.
///
/// # Examples
/// ```
/// use resume_matcher::TokenFrequency;
/// let mut freq = TokenFrequency::new();
/// freq.add_tokens(&["rust", "serde", "rust"]);
/// assert_eq!(freq.token_count("rust"), 2);
/// assert_eq!(freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

impl TokenFrequency {
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// Tokenize `text` and count the result
    pub fn from_text(text: &str, stop_words: &StopWords) -> Self {
        let mut freq = Self::new();
        freq.add_tokens(&tokenize(text, stop_words));
        freq
    }

    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        let count = self.token_count.entry(token.to_string()).or_insert(0);
        *count += 1;
        self.total_token_count += 1;
        self
    }

    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }

    /// occurrences of `token`, 0 if absent
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// total number of tokens counted
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// distinct tokens in first-seen order
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(|s| s.as_str()).collect()
    }

    /// (token, count) in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.token_count.iter().map(|(t, &c)| (t.as_str(), c))
    }

    #[inline]
    pub fn unique_len(&self) -> usize {
        self.token_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_count.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_punctuation_and_drops_short() {
        let toks = tokenize("python, sql & node.js, c++ r", &StopWords::none());
        assert_eq!(toks, vec!["python", "sql", "node", "js"]);
    }

    #[test]
    fn tokenize_removes_stop_words() {
        let toks = tokenize("need a python machine learning expert", &StopWords::english());
        assert_eq!(toks, vec!["need", "python", "machine", "learning", "expert"]);
    }

    #[test]
    fn tokenize_keeps_underscores_and_digits() {
        let toks = tokenize("snake_case 5 years 10x", &StopWords::none());
        assert_eq!(toks, vec!["snake_case", "years", "10x"]);
    }

    #[test]
    fn frequency_keeps_first_seen_order() {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&["java", "spring", "java", "boot"]);
        assert_eq!(freq.token_set_ref_str(), vec!["java", "spring", "boot"]);
        assert_eq!(freq.token_count("java"), 2);
        assert_eq!(freq.token_count("kotlin"), 0);
        assert_eq!(freq.unique_len(), 3);
        assert_eq!(freq.token_sum(), 4);
    }
}
