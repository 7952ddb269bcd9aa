use atlas_model::Library;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to write library document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize library document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed single-document store for the library.
///
/// One JSON document, last write wins. A missing or malformed document reads
/// as the empty library so the caller never has to handle a broken store.
pub struct LibraryStore {
    path: PathBuf,
}

impl LibraryStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("library.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Library {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Library::default(),
            Err(err) => {
                log::error!("failed to read {}: {err}", self.path.display());
                return Library::default();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(library) => library,
            Err(err) => {
                log::error!("malformed library document {}: {err}", self.path.display());
                Library::default()
            }
        }
    }

    pub async fn save(&self, library: &Library) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_vec_pretty(library)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_model::{Process, ProcessKind};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn missing_document_loads_as_the_empty_library() {
        let dir = tempfile::tempdir().unwrap();
        let store = LibraryStore::new(dir.path());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_document_loads_as_the_empty_library() {
        let dir = tempfile::tempdir().unwrap();
        let store = LibraryStore::new(dir.path());
        tokio::fs::write(store.path(), b"{ not json").await.unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LibraryStore::new(dir.path());

        let library = Library {
            processes: vec![Process::new("100000", "Apply label", ProcessKind::Main)],
            ..Library::default()
        };
        store.save(&library).await.unwrap();

        assert_eq!(store.load().await, library);
    }

    #[tokio::test]
    async fn save_creates_the_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = LibraryStore::new(&dir.path().join("nested"));
        store.save(&Library::default()).await.unwrap();
        assert!(store.path().exists());
    }
}
