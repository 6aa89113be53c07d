//! Fixed-size per-phase storage

use amt_core::{EFFORT_BUCKET_COUNT, SessionPhase};
use serde::{Deserialize, Serialize};

/// One `T` per tradeable session phase.
///
/// Lookups by phase go through [`SessionPhase::storage_bucket`], so
/// maintenance and unknown phases share the first tradeable bucket's storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseBuckets<T> {
    buckets: [T; EFFORT_BUCKET_COUNT],
}

impl<T> PhaseBuckets<T> {
    /// Build each bucket from its phase
    pub fn from_fn(mut f: impl FnMut(SessionPhase) -> T) -> Self {
        Self {
            buckets: std::array::from_fn(|i| f(SessionPhase::TRADEABLE[i])),
        }
    }

    #[inline]
    pub fn get(&self, phase: SessionPhase) -> &T {
        &self.buckets[phase.storage_bucket()]
    }

    #[inline]
    pub fn get_mut(&mut self, phase: SessionPhase) -> &mut T {
        &mut self.buckets[phase.storage_bucket()]
    }

    /// Bucket by dense index, `None` past the last tradeable phase
    pub fn by_index(&self, index: usize) -> Option<&T> {
        self.buckets.get(index)
    }

    /// Buckets paired with their phase, in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (SessionPhase, &T)> {
        SessionPhase::TRADEABLE.iter().copied().zip(self.buckets.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SessionPhase, &mut T)> {
        SessionPhase::TRADEABLE
            .iter()
            .copied()
            .zip(self.buckets.iter_mut())
    }

    pub fn len(&self) -> usize {
        EFFORT_BUCKET_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<T: Default> Default for PhaseBuckets<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}
