//! In-memory artifact store, for embedding and tests

use std::sync::RwLock;

use rustc_hash::FxHashMap;

use super::{ArtifactId, BlobStore};
use crate::error::Result;

/// Artifact store keeping blobs in a map
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    blobs: RwLock<FxHashMap<ArtifactId, Vec<u8>>>,
}

impl MemoryArtifactStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryArtifactStore {
    fn read(&self, id: ArtifactId) -> Result<Option<Vec<u8>>> {
        let blobs = self
            .blobs
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(blobs.get(&id).cloned())
    }

    fn write(&self, id: ArtifactId, bytes: &[u8]) -> Result<()> {
        self.blobs
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id, bytes.to_vec());
        Ok(())
    }
}
