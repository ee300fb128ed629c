use std::cmp::Ordering;

use num::Float;

use super::SparseVec;

impl<N> SparseVec<N>
where
    N: Float,
{
    /// ドット積
    /// d(a, b) = Σ(a_i * b_i)
    ///
    /// Walks both index lists once, so the cost is O(nnz(a) + nnz(b)).
    #[inline]
    pub fn dot(&self, other: &Self) -> N {
        debug_assert_eq!(self.dim, other.dim, "vectors must share a dimension");
        let mut result = N::zero();
        let (mut i, mut j) = (0usize, 0usize);
        while i < self.inds.len() && j < other.inds.len() {
            match self.inds[i].cmp(&other.inds[j]) {
                Ordering::Equal => {
                    result = result + self.vals[i] * other.vals[j];
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        result
    }

    /// L2 norm ||a|| = sqrt(Σ(a_i^2))
    #[inline]
    pub fn norm(&self) -> N {
        self.vals.iter().fold(N::zero(), |acc, &v| acc + v * v).sqrt()
    }

    /// Scale to unit length. The zero vector stays zero.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > N::zero() {
            for v in self.vals.iter_mut() {
                *v = *v / norm;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::math::vector::SparseVec;

    #[test]
    fn dot_only_counts_shared_indices() {
        let a = SparseVec::from_unsorted(5, vec![0, 2, 4], vec![1.0f64, 2.0, 3.0]);
        let b = SparseVec::from_unsorted(5, vec![1, 2, 4], vec![7.0f64, 0.5, 2.0]);
        assert_eq!(a.dot(&b), 1.0 + 6.0);
    }

    #[test]
    fn normalize_gives_unit_length() {
        let mut a = SparseVec::from_unsorted(3, vec![0, 1], vec![3.0f64, 4.0]);
        a.normalize();
        assert!((a.norm() - 1.0).abs() < 1e-12);
        assert!((a.iter().next().unwrap().1 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn zero_vector_has_zero_norm() {
        let mut a = SparseVec::<f64>::zeros(3);
        a.normalize();
        assert_eq!(a.norm(), 0.0);
        assert!(a.is_zero());
    }
}
