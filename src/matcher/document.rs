use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{dataset::{JobRecord, ResumeRecord}, utils::normalizer::normalize_joined};

/// Kind of a logical text unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Resume,
    Job,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Resume => write!(f, "resume"),
            DocumentKind::Job => write!(f, "job"),
        }
    }
}

/// A resume or a job, frozen at build time.
///
/// `raw_fields` keeps every known attribute in record order; absent
/// attributes are simply not present. `combined_text` is derived from the
/// configured field order and is what gets vectorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub kind: DocumentKind,
    #[serde(with = "indexmap::map::serde_seq")]
    pub raw_fields: IndexMap<String, String>,
    pub combined_text: String,
}

impl Document {
    /// Build a document and derive `combined_text` from `field_order`.
    ///
    /// Fields named in `field_order` are joined by a single space, missing
    /// ones as empty strings, and the result is normalized.
    pub fn new(id: u64, kind: DocumentKind, raw_fields: IndexMap<String, String>, field_order: &[String]) -> Self {
        let combined_text = normalize_joined(
            field_order
                .iter()
                .map(|name| raw_fields.get(name).map(|s| s.as_str())),
        );
        Self {
            id,
            kind,
            raw_fields,
            combined_text,
        }
    }

    pub fn from_resume(record: &ResumeRecord, field_order: &[String]) -> Self {
        Self::new(record.id, DocumentKind::Resume, record.fields(), field_order)
    }

    pub fn from_job(record: &JobRecord, field_order: &[String]) -> Self {
        Self::new(record.id, DocumentKind::Job, record.fields(), field_order)
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.raw_fields.get(name).map(|s| s.as_str())
    }

    /// Display label: candidate name or job title, else "<kind> <id>"
    pub fn label(&self) -> String {
        let key = match self.kind {
            DocumentKind::Resume => "name",
            DocumentKind::Job => "title",
        };
        match self.field(key) {
            Some(v) if !v.trim().is_empty() => v.to_string(),
            _ => format!("{} {}", self.kind, self.id),
        }
    }
}
