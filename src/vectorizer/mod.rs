pub mod compare;
pub mod corpus;
pub mod stop_words;
pub mod tfidf;
pub mod token;

use indexmap::IndexSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{MatchError, Result},
    utils::{math::vector::SparseVec, normalizer::normalize},
    vectorizer::{corpus::Corpus, stop_words::StopWords, tfidf::{DefaultTFIDFEngine, TFIDFEngine}, token::TokenFrequency},
};

/// Sparse TF-IDF vector over the vocabulary index space
pub type FeatureVector = SparseVec<f64>;

/// Fitted state of the vectorizer. Immutable once produced by `fit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyState {
    /// token -> feature index (position), lexicographic order
    vocab: IndexSet<Box<str>>,
    /// IDF weight per feature index
    idf: Vec<f64>,
    /// stop words the vocabulary was fit with, reused by transform
    stop_words: StopWords,
    /// number of documents in the fit corpus
    doc_num: u64,
}

impl VocabularyState {
    /// vocabulary size = dimensionality of every vector
    #[inline]
    pub fn dim(&self) -> usize {
        self.vocab.len()
    }

    /// feature index of `token`
    #[inline]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.vocab.get_index_of(token)
    }

    /// token at feature index
    pub fn token(&self, index: usize) -> Option<&str> {
        self.vocab.get_index(index).map(|t| &**t)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.vocab.iter().map(|t| &**t)
    }

    #[inline]
    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }

    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }
}

/// TF-IDF Vectorizer
/// Learns a bounded vocabulary from a training corpus, then turns any text
/// into an L2-normalized sparse TF-IDF vector.
///
/// `E` selects the TF/IDF formulas, see [`TFIDFEngine`].
#[derive(Debug, Clone)]
pub struct Vectorizer<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    max_features: usize,
    stop_words: StopWords,
    state: Option<VocabularyState>,
    _marker: std::marker::PhantomData<E>,
}

impl<E> Vectorizer<E>
where
    E: TFIDFEngine,
{
    /// Create an unfitted vectorizer
    pub fn new(max_features: usize, stop_words: StopWords) -> Self {
        Self {
            max_features,
            stop_words,
            state: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// Wrap an already fitted state (e.g. one loaded from an artifact)
    pub fn from_state(state: VocabularyState) -> Self {
        Self {
            max_features: state.dim(),
            stop_words: state.stop_words.clone(),
            state: Some(state),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn state(&self) -> Option<&VocabularyState> {
        self.state.as_ref()
    }

    pub fn into_state(self) -> Option<VocabularyState> {
        self.state
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Learn vocabulary and IDF weights from `corpus`.
    ///
    /// Keeps up to `max_features` tokens ranked by document frequency
    /// (ties: first-seen order), then indexes them lexicographically.
    /// Each text is lowercased before tokenizing, same as in `transform`.
    ///
    /// # Errors
    /// `Configuration` when `max_features` is 0, the corpus is empty, or no
    /// token survives tokenization.
    pub fn fit<S>(&mut self, corpus: &[S]) -> Result<&VocabularyState>
    where
        S: AsRef<str>,
    {
        if self.max_features == 0 {
            return Err(MatchError::config("max_features must be positive"));
        }
        if corpus.is_empty() {
            return Err(MatchError::config("cannot fit vocabulary on an empty corpus"));
        }

        let mut stats = Corpus::new();
        for text in corpus {
            let text = normalize(Some(text.as_ref()));
            stats.add_doc(&TokenFrequency::from_text(&text, &self.stop_words));
        }
        if stats.vocab_size() == 0 {
            return Err(MatchError::config("corpus is empty after normalization and stop-word removal"));
        }

        let mut selected: Vec<Box<str>> = stats
            .top_tokens(self.max_features)
            .into_iter()
            .map(|(t, _)| Box::<str>::from(t))
            .collect();
        selected.sort();
        let vocab: IndexSet<Box<str>> = selected.into_iter().collect();
        let idf = E::idf_vec(&stats, &vocab);
        debug!(
            docs = stats.doc_num(),
            seen = stats.vocab_size(),
            kept = vocab.len(),
            "vocabulary fitted"
        );

        Ok(&*self.state.insert(VocabularyState {
            vocab,
            idf,
            stop_words: self.stop_words.clone(),
            doc_num: stats.doc_num(),
        }))
    }

    /// Convert `text` into an L2-normalized TF-IDF vector.
    /// Out-of-vocabulary tokens are dropped; text with no known token
    /// yields the zero vector.
    ///
    /// # Errors
    /// `NotFitted` when called before `fit`.
    pub fn transform(&self, text: &str) -> Result<FeatureVector> {
        let state = self.state.as_ref().ok_or(MatchError::NotFitted)?;
        Ok(Self::transform_with_state(state, text))
    }

    /// `transform` over many texts, in parallel. Output order = input order.
    pub fn transform_all<S>(&self, texts: &[S]) -> Result<Vec<FeatureVector>>
    where
        S: AsRef<str> + Sync,
        E: Sync,
    {
        let state = self.state.as_ref().ok_or(MatchError::NotFitted)?;
        Ok(texts
            .par_iter()
            .map(|t| Self::transform_with_state(state, t.as_ref()))
            .collect())
    }

    fn transform_with_state(state: &VocabularyState, text: &str) -> FeatureVector {
        let freq = TokenFrequency::from_text(&normalize(Some(text)), &state.stop_words);
        if freq.is_empty() {
            return FeatureVector::zeros(state.dim());
        }
        let tf = E::tf_vec(&freq, &state.vocab);
        let (inds, vals): (Vec<u32>, Vec<f64>) = tf
            .iter()
            .map(|(idx, tf)| (idx as u32, tf * state.idf[idx]))
            .unzip();
        let mut vec = SparseVec::from_unsorted(state.dim(), inds, vals);
        vec.normalize();
        vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(corpus: &[&str], max_features: usize) -> Vectorizer {
        let mut v = Vectorizer::new(max_features, StopWords::english());
        v.fit(corpus).unwrap();
        v
    }

    #[test]
    fn fit_rejects_bad_configuration() {
        let mut v: Vectorizer = Vectorizer::new(0, StopWords::english());
        assert!(matches!(v.fit(&["python"]), Err(MatchError::Configuration(_))));

        let mut v: Vectorizer = Vectorizer::new(10, StopWords::english());
        let empty: [&str; 0] = [];
        assert!(matches!(v.fit(&empty), Err(MatchError::Configuration(_))));
        assert!(matches!(v.fit(&["", "the and of"]), Err(MatchError::Configuration(_))));
        assert!(!v.is_fitted());
    }

    #[test]
    fn transform_before_fit_is_not_fitted() {
        let v: Vectorizer = Vectorizer::new(10, StopWords::english());
        assert!(matches!(v.transform("python"), Err(MatchError::NotFitted)));
        assert!(matches!(v.transform_all(&["python"]), Err(MatchError::NotFitted)));
    }

    #[test]
    fn vocabulary_is_lexicographic_and_bounded() {
        let v = fitted(&["python sql docker", "python sql", "python"], 2);
        let state = v.state().unwrap();
        assert_eq!(state.tokens().collect::<Vec<_>>(), vec!["python", "sql"]);
        assert_eq!(state.index_of("docker"), None);
        assert_eq!(state.doc_num(), 3);
    }

    #[test]
    fn document_frequency_ties_keep_first_seen() {
        // all df = 1: first two seen survive
        let v = fitted(&["zebra yak", "xenon"], 2);
        assert_eq!(v.state().unwrap().tokens().collect::<Vec<_>>(), vec!["yak", "zebra"]);
    }

    #[test]
    fn transform_is_unit_length_and_drops_unknown() {
        let v = fitted(&["python machine learning", "java spring boot"], 500);
        let vec = v.transform("python python learning kotlin").unwrap();
        assert!((vec.norm() - 1.0).abs() < 1e-9);
        assert_eq!(vec.nnz(), 2);

        let zero = v.transform("kotlin").unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero.dim(), v.state().unwrap().dim());
    }

    #[test]
    fn fitting_twice_is_identical() {
        let corpus = ["python sql machine learning", "java spring boot sql", "react node js"];
        let a = fitted(&corpus, 500);
        let b = fitted(&corpus, 500);
        assert_eq!(a.state(), b.state());
        assert_eq!(a.transform(corpus[1]).unwrap(), b.transform(corpus[1]).unwrap());
    }

    #[test]
    fn case_does_not_split_features() {
        let v = fitted(&["python machine learning", "java spring boot"], 500);
        let mixed = v.transform("Python Machine Learning").unwrap();
        assert_eq!(mixed, v.transform("python machine learning").unwrap());
        assert_eq!(mixed.nnz(), 3);

        let v = fitted(&["Python", "python", "JAVA"], 500);
        assert_eq!(v.state().unwrap().tokens().collect::<Vec<_>>(), vec!["java", "python"]);
    }

    #[test]
    fn transform_all_preserves_order() {
        let v = fitted(&["python", "java"], 500);
        let all = v.transform_all(&["java", "python"]).unwrap();
        assert_eq!(all[0], v.transform("java").unwrap());
        assert_eq!(all[1], v.transform("python").unwrap());
    }
}
