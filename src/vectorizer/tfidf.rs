use indexmap::IndexSet;

use crate::{utils::math::vector::SparseVec, vectorizer::{corpus::Corpus, token::TokenFrequency}};

/// TF-IDF calculation strategy.
///
/// The vectorizer asks the engine for the IDF weight of every vocabulary
/// entry once at fit time, and for the TF vector of each document at
/// transform time. The final weight is their product, L2-normalized by
/// the vectorizer.
pub trait TFIDFEngine {
    /// IDFベクトルを生成する
    /// # Arguments
    /// * `corpus` - document-frequency statistics of the fit corpus
    /// * `vocab` - vocabulary, position = feature index
    /// # Returns
    /// * `Vec<f64>` - IDF weight per feature index
    fn idf_vec(corpus: &Corpus, vocab: &IndexSet<Box<str>>) -> Vec<f64>;

    /// TFベクトルを生成する
    /// Tokens missing from `vocab` are dropped.
    fn tf_vec(freq: &TokenFrequency, vocab: &IndexSet<Box<str>>) -> SparseVec<f64>;
}

/// Default engine: raw term counts and smoothed IDF
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    fn idf_vec(corpus: &Corpus, vocab: &IndexSet<Box<str>>) -> Vec<f64> {
        let doc_num = corpus.doc_num() as f64;
        vocab
            .iter()
            .map(|token| {
                let doc_freq = corpus.token_count(token) as f64;
                ((1.0 + doc_num) / (1.0 + doc_freq)).ln() + 1.0
            })
            .collect()
    }

    fn tf_vec(freq: &TokenFrequency, vocab: &IndexSet<Box<str>>) -> SparseVec<f64> {
        let mut inds = Vec::with_capacity(freq.unique_len());
        let mut vals = Vec::with_capacity(freq.unique_len());
        for (token, count) in freq.iter() {
            if let Some(idx) = vocab.get_index_of(token) {
                inds.push(idx as u32);
                vals.push(count as f64);
            }
        }
        SparseVec::from_unsorted(vocab.len(), inds, vals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(tokens: &[&str]) -> IndexSet<Box<str>> {
        tokens.iter().map(|t| Box::<str>::from(*t)).collect()
    }

    #[test]
    fn idf_is_smoothed_and_rarer_is_heavier() {
        let mut corpus = Corpus::new();
        corpus.add_set(&["python", "sql"]);
        corpus.add_set(&["python"]);
        let idf = DefaultTFIDFEngine::idf_vec(&corpus, &vocab(&["python", "sql"]));
        // n = 2: python df 2 -> ln(3/3)+1, sql df 1 -> ln(3/2)+1
        assert!((idf[0] - 1.0).abs() < 1e-12);
        assert!((idf[1] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert!(idf[1] > idf[0]);
    }

    #[test]
    fn tf_uses_raw_counts_and_drops_unknown_tokens() {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&["sql", "kotlin", "python", "sql"]);
        let tf = DefaultTFIDFEngine::tf_vec(&freq, &vocab(&["python", "sql"]));
        assert_eq!(tf.dim(), 2);
        assert_eq!(tf.iter().collect::<Vec<_>>(), vec![(0, 1.0), (1, 2.0)]);
    }
}
