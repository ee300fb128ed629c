use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Axis, MatchError, Result},
    vectorizer::FeatureVector,
};

/// コサイン類似度
/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
///
/// TF-IDF weights are non-negative, so the result lies in [0, 1]; it is
/// clamped there to absorb rounding. Either side being the zero vector
/// gives 0, never NaN.
#[inline]
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    scaled_dot(a, b, a.norm(), b.norm())
}

#[inline]
fn scaled_dot(a: &FeatureVector, b: &FeatureVector, norm_a: f64, norm_b: f64) -> f64 {
    let denom = norm_a * norm_b;
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Dense resume x job similarity matrix, row-major.
/// Entry (i, j) is the similarity of resume i to job j.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// number of resumes
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// number of jobs
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        if row >= self.rows {
            return Err(MatchError::out_of_range(Axis::Resume, row, self.rows));
        }
        if col >= self.cols {
            return Err(MatchError::out_of_range(Axis::Job, col, self.cols));
        }
        Ok(self.data[row * self.cols + col])
    }

    pub fn row(&self, row: usize) -> Result<&[f64]> {
        if row >= self.rows {
            return Err(MatchError::out_of_range(Axis::Resume, row, self.rows));
        }
        Ok(&self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// column values in row order
    pub fn column(&self, col: usize) -> Result<Vec<f64>> {
        if col >= self.cols {
            return Err(MatchError::out_of_range(Axis::Job, col, self.cols));
        }
        Ok((0..self.rows).map(|r| self.data[r * self.cols + col]).collect())
    }

    /// Best score of a row, 0.0 for a matrix without columns.
    pub fn row_max(&self, row: usize) -> Result<f64> {
        Ok(self.row(row)?.iter().copied().fold(0.0, f64::max))
    }
}

/// Pairwise similarity of every resume vector against every job vector.
///
/// Rows are computed in parallel; every entry depends only on its two
/// vectors, so the result is identical to a sequential pass. Norms are
/// computed once per vector, and dot products walk only the non-zero
/// entries.
pub fn build_matrix(resumes: &[FeatureVector], jobs: &[FeatureVector]) -> SimilarityMatrix {
    let job_norms: Vec<f64> = jobs.iter().map(|j| j.norm()).collect();
    let data: Vec<f64> = resumes
        .par_iter()
        .flat_map_iter(|r| {
            let r_norm = r.norm();
            jobs.iter()
                .zip(job_norms.iter())
                .map(move |(j, &j_norm)| scaled_dot(r, j, r_norm, j_norm))
        })
        .collect();
    SimilarityMatrix {
        rows: resumes.len(),
        cols: jobs.len(),
        data,
    }
}
