pub mod math;

use std::fmt::Debug;

use num::Float;
use serde::{Deserialize, Serialize};

use crate::utils::sort::radix_sort_u32_soa;

/// SparseVec は 0 要素を省略した疎ベクトルです
/// `inds` holds the non-zero positions, `vals` the matching values.
///
/// Entries are always kept sorted by ascending index, which lets
/// dot products walk both vectors in a single merge pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVec<N>
where
    N: Float,
{
    dim: usize,
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> SparseVec<N>
where
    N: Float,
{
    /// all-zero vector of dimension `dim`
    #[inline]
    pub fn zeros(dim: usize) -> Self {
        SparseVec {
            dim,
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    /// Build from entries in arbitrary index order.
    /// Zero values are dropped; indices must be unique and `< dim`.
    ///
    /// # Arguments
    /// * `dim` - dimension of the vector space
    /// * `inds` - entry positions
    /// * `vals` - entry values, same length as `inds`
    pub fn from_unsorted(dim: usize, mut inds: Vec<u32>, mut vals: Vec<N>) -> Self {
        debug_assert_eq!(inds.len(), vals.len());
        debug_assert!(inds.iter().all(|&i| (i as usize) < dim));
        radix_sort_u32_soa(&mut inds, &mut vals);
        debug_assert!(inds.windows(2).all(|w| w[0] < w[1]), "duplicate index in sparse vector");

        let mut vec = SparseVec {
            dim,
            inds: Vec::with_capacity(inds.len()),
            vals: Vec::with_capacity(vals.len()),
        };
        for (i, v) in inds.into_iter().zip(vals) {
            if !v.is_zero() {
                vec.inds.push(i);
                vec.vals.push(v);
            }
        }
        vec
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// number of stored (non-zero) entries
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.inds.is_empty()
    }

    /// (index, value) pairs in ascending index order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds.iter().zip(self.vals.iter()).map(|(&i, &v)| (i as usize, v))
    }
}
