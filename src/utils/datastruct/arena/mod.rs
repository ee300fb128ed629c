use serde::{Deserialize, Serialize};

/// Append-only arena addressed by stable integer index.
///
/// Entries are never moved or removed once collected, so an index handed
/// out at build time stays valid for the whole life of the arena and
/// survives a serialize/deserialize round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arena<T> {
    pool: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self { pool: Vec::new() }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.pool.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.pool
    }

    /// position of the first entry matching `pred`
    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.pool.iter().position(pred)
    }
}

impl<T> FromIterator<T> for Arena<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { pool: iter.into_iter().collect() }
    }
}
