use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{MatchError, Result},
    matcher::artifact::Artifact,
};

/// Version of the persisted blob layout. Bump on any change to the
/// serialized shape of [`Artifact`].
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format_version: u32,
    artifact: &'a Artifact,
}

#[derive(Deserialize)]
struct EnvelopeHeader {
    format_version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    artifact: Artifact,
}

/// Encode an artifact as a versioned CBOR blob
pub fn to_bytes(artifact: &Artifact) -> Result<Vec<u8>> {
    Ok(serde_cbor::to_vec(&EnvelopeRef {
        format_version: ARTIFACT_FORMAT_VERSION,
        artifact,
    })?)
}

/// Decode a blob written by [`to_bytes`].
///
/// # Errors
/// `IncompatibleArtifact` when the blob carries another format version,
/// `Codec` when it is not a valid blob at all.
pub fn from_bytes(bytes: &[u8]) -> Result<Artifact> {
    let header: EnvelopeHeader = serde_cbor::from_slice(bytes)?;
    if header.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(MatchError::IncompatibleArtifact {
            found: header.format_version,
            expected: ARTIFACT_FORMAT_VERSION,
        });
    }
    let envelope: Envelope = serde_cbor::from_slice(bytes)?;
    Ok(envelope.artifact)
}

/// Opaque blob store for artifacts.
/// The blob is written and read as a whole, never patched.
pub trait ArtifactStore {
    type Handle;

    fn save(&self, artifact: &Artifact) -> Result<Self::Handle>;
    fn load(&self, handle: &Self::Handle) -> Result<Artifact>;
    /// whether `handle` currently refers to a stored blob
    fn contains(&self, handle: &Self::Handle) -> bool;
}

/// Single-file store. `save` writes a sibling temp file and renames it over
/// the target, so readers never see a half-written blob.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    path: PathBuf,
}

impl FileArtifactStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactStore for FileArtifactStore {
    type Handle = PathBuf;

    fn save(&self, artifact: &Artifact) -> Result<PathBuf> {
        let bytes = to_bytes(artifact)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        if let Err(e) = fs::write(&tmp, &bytes).and_then(|_| fs::rename(&tmp, &self.path)) {
            // report `e`, not a cleanup failure
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        info!(path = %self.path.display(), bytes = bytes.len(), "artifact saved");
        Ok(self.path.clone())
    }

    fn load(&self, handle: &PathBuf) -> Result<Artifact> {
        let bytes = fs::read(handle)?;
        let artifact = from_bytes(&bytes)?;
        info!(
            path = %handle.display(),
            resumes = artifact.resume_count(),
            jobs = artifact.job_count(),
            "artifact loaded"
        );
        Ok(artifact)
    }

    fn contains(&self, handle: &PathBuf) -> bool {
        handle.is_file()
    }
}

/// In-process store, handles are slot numbers
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    blobs: RwLock<Vec<Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    type Handle = usize;

    fn save(&self, artifact: &Artifact) -> Result<usize> {
        let bytes = to_bytes(artifact)?;
        let mut blobs = self.blobs.write().unwrap_or_else(|e| e.into_inner());
        blobs.push(bytes);
        Ok(blobs.len() - 1)
    }

    fn load(&self, handle: &usize) -> Result<Artifact> {
        let blobs = self.blobs.read().unwrap_or_else(|e| e.into_inner());
        let bytes = blobs.get(*handle).ok_or_else(|| {
            MatchError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, format!("no artifact blob at slot {handle}")))
        })?;
        from_bytes(bytes)
    }

    fn contains(&self, handle: &usize) -> bool {
        self.blobs.read().unwrap_or_else(|e| e.into_inner()).len() > *handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::BuildConfig, dataset::sample_dataset, matcher::builder::ArtifactBuilder};

    fn sample_artifact() -> Artifact {
        let (resumes, jobs) = sample_dataset();
        ArtifactBuilder::new(BuildConfig::default()).build(&resumes, &jobs).unwrap()
    }

    #[test]
    fn blob_round_trip_is_exact() {
        let artifact = sample_artifact();
        let bytes = to_bytes(&artifact).unwrap();
        assert_eq!(from_bytes(&bytes).unwrap(), artifact);
        // deterministic encoding
        assert_eq!(to_bytes(&artifact).unwrap(), bytes);
    }

    #[test]
    fn rejects_other_format_versions_and_garbage() {
        #[derive(Serialize)]
        struct Future {
            format_version: u32,
        }
        let bytes = serde_cbor::to_vec(&Future { format_version: 99 }).unwrap();
        assert!(matches!(
            from_bytes(&bytes),
            Err(MatchError::IncompatibleArtifact { found: 99, expected: ARTIFACT_FORMAT_VERSION })
        ));
        assert!(matches!(from_bytes(b"not cbor at all"), Err(MatchError::Codec(_))));
    }

    #[test]
    fn file_store_saves_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::new(dir.path().join("nested").join("matcher.cbor"));
        assert!(!store.contains(&store.path().to_path_buf()));
        let artifact = sample_artifact();
        let handle = store.save(&artifact).unwrap();
        assert!(store.contains(&handle));
        assert_eq!(store.load(&handle).unwrap(), artifact);
    }

    #[test]
    fn failed_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory in the way makes the rename fail
        let target = dir.path().join("matcher.cbor");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupant"), b"x").unwrap();

        let store = FileArtifactStore::new(&target);
        assert!(matches!(store.save(&sample_artifact()), Err(MatchError::Io(_))));
        assert!(!dir.path().join("matcher.cbor.tmp").exists());
        assert!(target.is_dir());
    }

    #[test]
    fn memory_store_hands_out_slots() {
        let store = MemoryArtifactStore::new();
        assert!(!store.contains(&0));
        let handle = store.save(&sample_artifact()).unwrap();
        assert_eq!(handle, 0);
        assert!(store.load(&handle).is_ok());
        assert!(store.load(&5).is_err());
    }
}
