/// This crate is a resume / job matching engine built on a TF-IDF vectorizer.
pub mod config;
pub mod dataset;
pub mod error;
pub mod matcher;
pub mod utils;
pub mod vectorizer;

/// TF-IDF Vectorizer
/// Learns a bounded vocabulary and IDF weights from a corpus, then turns
/// texts into L2-normalized sparse TF-IDF vectors over that vocabulary.
///
/// `Vectorizer<E>` is generic over the weighting engine `E`
/// (`DefaultTFIDFEngine` by default).
///
/// A fitted vectorizer can be frozen into a `VocabularyState` and restored
/// from it; the state is what artifacts persist.
pub use vectorizer::{FeatureVector, Vectorizer, VocabularyState};

/// Token Frequency structure
/// Occurrence count of each token within one document, plus the total token
/// count. Base data for TF calculation.
pub use vectorizer::token::{tokenize, TokenFrequency};

/// Document-frequency statistics of a corpus.
/// Only counts are kept: the number of documents and, per token, the number
/// of documents it appears in. Base data for IDF calculation.
pub use vectorizer::corpus::Corpus;

/// Stop-word set applied while tokenizing
pub use vectorizer::stop_words::{StopWords, ENGLISH_STOP_WORDS};

/// TF IDF Calculation Engine Trait
/// Plug a different weighting strategy into `Vectorizer<E>` by implementing
/// this trait. `DefaultTFIDFEngine` uses raw term counts and smoothed IDF.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Cosine similarity and the resume x job similarity matrix
pub use vectorizer::compare::{build_matrix, cosine_similarity, SimilarityMatrix};

/// Build parameters
pub use config::BuildConfig;

/// Error type of every fallible operation in this crate
pub use error::{Axis, MatchError, Result};

/// Dataset records and loaders
pub use dataset::{load_jobs, load_resumes, sample_dataset, JobRecord, ResumeRecord};

/// Documents
/// A resume or a job with its raw fields and the normalized combined text
/// that gets vectorized.
pub use matcher::document::{Document, DocumentKind};

/// Artifact
/// Frozen result of a build: vocabulary, documents, vectors and similarity
/// matrix. Never mutated; rebuilding produces a new one.
pub use matcher::artifact::Artifact;

/// Builds artifacts from datasets, or loads a persisted one when available
pub use matcher::builder::ArtifactBuilder;

/// Artifact persistence
/// Versioned CBOR blobs behind the `ArtifactStore` trait, with file-backed
/// and in-memory stores.
pub use matcher::persist::{
    from_bytes, to_bytes, ArtifactStore, FileArtifactStore, MemoryArtifactStore, ARTIFACT_FORMAT_VERSION,
};

/// Shared handle to the serving artifact, swapped atomically on rebuild
pub use matcher::store::ArtifactHandle;

/// Ranking Service, Hits and Hit Entry structures
/// - `RankingService`: ranking queries answered from an artifact snapshot
/// - `Hits`: ranked results, best first
/// - `HitEntry`: one document with its score
pub use matcher::ranking::{HitEntry, Hits, JobRef, RankingService};

/// Optional linear re-scoring of ranking outputs
pub use matcher::rescore::LinearRescorer;
