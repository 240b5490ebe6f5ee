//! Filesystem artifact store
//!
//! Each artifact lives in `<root>/<disease>_<kind>.json`.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::debug;

use super::{ArtifactId, BlobStore};
use crate::error::Result;

/// Artifact store backed by a directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file holding an artifact
    #[must_use]
    pub fn path_for(&self, id: ArtifactId) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

impl BlobStore for FsArtifactStore {
    fn read(&self, id: ArtifactId) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(id);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, id: ArtifactId, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(id);
        // Write beside the target and rename so readers never see a partial file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disease::Disease;
    use crate::store::ArtifactKind;

    #[test]
    fn test_naming_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("models"));
        let id = ArtifactId::new(Disease::Heart, ArtifactKind::Model);

        assert_eq!(
            store.path_for(id),
            dir.path().join("models").join("heart_model.json")
        );
        assert_eq!(store.read(id).unwrap(), None);

        store.write(id, b"{}").unwrap();
        assert_eq!(store.read(id).unwrap(), Some(b"{}".to_vec()));
    }
}
