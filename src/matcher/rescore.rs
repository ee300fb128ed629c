use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Optional linear re-scoring of cosine scores:
/// `s' = clamp(weight * s + bias, 0, 1)`.
///
/// A positive weight keeps the order of any ranking it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRescorer {
    pub weight: f64,
    pub bias: f64,
}

impl LinearRescorer {
    pub fn new(weight: f64, bias: f64) -> Self {
        Self { weight, bias }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(MatchError::config(format!("rescore weight must be positive, got {}", self.weight)));
        }
        if !self.bias.is_finite() {
            return Err(MatchError::config("rescore bias must be finite"));
        }
        Ok(())
    }

    #[inline]
    pub fn apply(&self, score: f64) -> f64 {
        (self.weight * score + self.bias).clamp(0.0, 1.0)
    }
}
