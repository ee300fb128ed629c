use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, RwLock,
};

use tracing::{info, warn};

use crate::{
    dataset::{JobRecord, ResumeRecord},
    error::Result,
    matcher::{artifact::Artifact, builder::ArtifactBuilder},
};

/// Process-wide reference to the serving artifact.
///
/// Readers clone the current `Arc` at call start and work on that snapshot
/// for the rest of the call. Writers replace the `Arc` under a write lock
/// that is held only for the pointer swap, so readers observe either the
/// old or the new artifact, never a mix.
#[derive(Debug)]
pub struct ArtifactHandle {
    current: RwLock<Arc<Artifact>>,
    generation: AtomicU64,
}

impl ArtifactHandle {
    pub fn new(artifact: Artifact) -> Self {
        Self {
            current: RwLock::new(Arc::new(artifact)),
            generation: AtomicU64::new(0),
        }
    }

    /// current snapshot
    pub fn snapshot(&self) -> Arc<Artifact> {
        // the guarded value is a plain Arc, a poisoned lock still holds a whole one
        Arc::clone(&self.current.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// number of swaps performed so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replace the serving artifact, returning the previous one.
    pub fn swap(&self, artifact: Artifact) -> Arc<Artifact> {
        let next = Arc::new(artifact);
        let prev = {
            let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *guard, next)
        };
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(generation, "artifact swapped");
        prev
    }

    /// Build a fresh artifact and swap it in.
    /// On failure the serving artifact is left untouched and the error is
    /// returned.
    pub fn rebuild(&self, builder: &ArtifactBuilder, resumes: &[ResumeRecord], jobs: &[JobRecord]) -> Result<Arc<Artifact>> {
        match builder.build(resumes, jobs) {
            Ok(artifact) => {
                self.swap(artifact);
                Ok(self.snapshot())
            }
            Err(e) => {
                warn!(error = %e, "rebuild failed; keeping current artifact");
                Err(e)
            }
        }
    }
}
