use std::fmt;

use thiserror::Error;

use crate::matcher::document::DocumentKind;

/// Which side of the similarity matrix an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// row axis (resumes)
    Resume,
    /// column axis (jobs)
    Job,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Resume => write!(f, "resume"),
            Axis::Job => write!(f, "job"),
        }
    }
}

impl From<DocumentKind> for Axis {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Resume => Axis::Resume,
            DocumentKind::Job => Axis::Job,
        }
    }
}

/// Error taxonomy of the matching engine
#[derive(Debug, Error)]
pub enum MatchError {
    /// invalid build parameters, aborts a rebuild
    #[error("configuration error: {0}")]
    Configuration(String),

    /// transform requested on a vectorizer that was never fitted
    #[error("vectorizer is not fitted; call fit() before transform()")]
    NotFitted,

    /// query referenced a document id that does not exist
    #[error("{kind} with id {id} not found")]
    NotFound { kind: DocumentKind, id: u64 },

    /// direct matrix/document access outside the artifact bounds
    #[error("{axis} index {index} out of range (len {len})")]
    IndexOutOfRange { axis: Axis, index: usize, len: usize },

    /// persisted artifact was written by an incompatible format version
    #[error("incompatible artifact format version {found} (expected {expected})")]
    IncompatibleArtifact { found: u32, expected: u32 },

    #[error("artifact codec error: {0}")]
    Codec(#[from] serde_cbor::Error),

    /// dataset or config file could not be parsed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MatchError>;

impl MatchError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        MatchError::Configuration(msg.into())
    }

    pub(crate) fn out_of_range(axis: Axis, index: usize, len: usize) -> Self {
        MatchError::IndexOutOfRange { axis, index, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = MatchError::NotFound { kind: DocumentKind::Resume, id: 42 };
        assert_eq!(err.to_string(), "resume with id 42 not found");

        let err = MatchError::out_of_range(Axis::Job, 7, 3);
        assert_eq!(err.to_string(), "job index 7 out of range (len 3)");
    }
}
