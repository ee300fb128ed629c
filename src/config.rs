use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{MatchError, Result},
    matcher::rescore::LinearRescorer,
    vectorizer::stop_words::StopWords,
};

pub const DEFAULT_MAX_FEATURES: usize = 500;
pub const MAX_FEATURES_ENV: &str = "MATCHER_MAX_FEATURES";

/// Build parameters of an artifact.
/// Every field has a default, so a partial JSON file is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// upper bound of the vocabulary size
    pub max_features: usize,
    /// `None` = built-in English list
    pub stop_words: Option<Vec<String>>,
    /// resume fields concatenated into the combined text, in order
    pub resume_fields: Vec<String>,
    /// job fields concatenated into the combined text, in order
    pub job_fields: Vec<String>,
    /// optional linear re-scoring of ranking outputs
    pub rescore: Option<LinearRescorer>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            stop_words: None,
            resume_fields: to_strings(&["skills", "current_role", "target_role", "resume_summary", "education"]),
            job_fields: to_strings(&["job_description", "required_skills"]),
            rescore: None,
        }
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl BuildConfig {
    /// Load from a JSON file; missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| MatchError::config(format!("invalid config file: {e}")))
    }

    /// Apply `MATCHER_MAX_FEATURES` when set. Unparsable values are ignored
    /// with a warning.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(MAX_FEATURES_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) => self.max_features = n,
                Err(_) => warn!(value = %raw, "ignoring {MAX_FEATURES_ENV}: not a non-negative integer"),
            }
        }
        self
    }

    /// stop-word set to fit with
    pub fn stop_word_set(&self) -> StopWords {
        match &self.stop_words {
            Some(words) => StopWords::from_words(words),
            None => StopWords::english(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(MatchError::config("max_features must be positive"));
        }
        if self.resume_fields.is_empty() {
            return Err(MatchError::config("resume_fields must name at least one field"));
        }
        if self.job_fields.is_empty() {
            return Err(MatchError::config("job_fields must name at least one field"));
        }
        if let Some(rescore) = &self.rescore {
            rescore.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = BuildConfig::default();
        assert_eq!(cfg.max_features, 500);
        assert_eq!(cfg.job_fields, vec!["job_description", "required_skills"]);
        assert_eq!(cfg.resume_fields.len(), 5);
        assert!(cfg.stop_word_set().contains("the"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: BuildConfig = serde_json::from_str(r#"{"max_features": 50, "stop_words": ["Need"]}"#).unwrap();
        assert_eq!(cfg.max_features, 50);
        assert_eq!(cfg.resume_fields, BuildConfig::default().resume_fields);
        let sw = cfg.stop_word_set();
        assert!(sw.contains("need"));
        assert!(!sw.contains("the"));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cfg = BuildConfig { max_features: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(MatchError::Configuration(_))));

        let cfg = BuildConfig { job_fields: vec![], ..Default::default() };
        assert!(cfg.validate().is_err());

        let cfg = BuildConfig { rescore: Some(LinearRescorer::new(0.0, 0.1)), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn from_json_file_reports_bad_input_as_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_features": -3}"#).unwrap();
        assert!(matches!(BuildConfig::from_json_file(&path), Err(MatchError::Configuration(_))));
    }

    #[test]
    fn env_override_applies_or_is_ignored() {
        // the only test touching this variable
        std::env::set_var(MAX_FEATURES_ENV, " 42 ");
        assert_eq!(BuildConfig::default().with_env_overrides().max_features, 42);

        std::env::set_var(MAX_FEATURES_ENV, "lots");
        let cfg = BuildConfig { max_features: 7, ..Default::default() }.with_env_overrides();
        assert_eq!(cfg.max_features, 7);

        std::env::remove_var(MAX_FEATURES_ENV);
        assert_eq!(BuildConfig::default().with_env_overrides().max_features, DEFAULT_MAX_FEATURES);
    }
}
