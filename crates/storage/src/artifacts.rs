//! Converted-artifact storage and retrieval.

use crate::error::{StorageError, StorageResult};
use crate::keys::safe_component;
use bytes::Bytes;
use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::instrument;

/// Read buffer size for streaming downloads (64 KiB).
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Byte stream over an artifact's contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Store for finished artifacts awaiting download.
///
/// Artifacts are flat files directly under the root; there is no expiry or
/// garbage collection for artifacts that are never downloaded.
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a new artifact store, creating the root directory if absent.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Root directory holding all artifacts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_path(&self, name: &str) -> StorageResult<PathBuf> {
        safe_component(name)?;
        Ok(self.root.join(name))
    }

    /// Move a finished file into the store under `name`.
    ///
    /// Replaces any previous artifact with the same name.
    #[instrument(skip(self))]
    pub async fn persist(&self, src: &Path, name: &str) -> StorageResult<PathBuf> {
        let dest = self.artifact_path(name)?;
        fs::rename(src, &dest).await?;
        Ok(dest)
    }

    /// Check whether an artifact exists.
    pub async fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.artifact_path(name)?;
        fs::try_exists(&path).await.map_err(StorageError::Io)
    }

    /// Size in bytes of a stored artifact.
    pub async fn size(&self, name: &str) -> StorageResult<u64> {
        let path = self.artifact_path(name)?;
        let metadata = fs::metadata(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;
        Ok(metadata.len())
    }

    /// Stream an artifact's bytes.
    #[instrument(skip(self))]
    pub async fn get_stream(&self, name: &str) -> StorageResult<ByteStream> {
        let path = self.artifact_path(name)?;
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        // Stream the file in chunks instead of loading it into memory.
        let stream = async_stream::try_stream! {
            let mut file = file;
            let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                yield Bytes::copy_from_slice(&buf[..n]);
            }
        };

        Ok(Box::pin(stream))
    }

    /// Verify the store root exists and is a directory.
    pub async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root).await.map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("artifact store root not accessible: {e}"),
            ))
        })?;
        if !metadata.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("artifact store root is not a directory: {:?}", self.root),
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn collect(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_persist_and_stream_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("converted")).await.unwrap();

        let src = dir.path().join("staged.apk");
        fs::write(&src, b"apk bytes").await.unwrap();

        let dest = store.persist(&src, "x.apk").await.unwrap();
        assert!(store.exists("x.apk").await.unwrap());
        assert!(!fs::try_exists(&src).await.unwrap());
        assert_eq!(store.size("x.apk").await.unwrap(), 9);

        let stream = store.get_stream("x.apk").await.unwrap();
        assert_eq!(collect(stream).await, b"apk bytes");
        assert_eq!(dest, store.root().join("x.apk"));
    }

    #[tokio::test]
    async fn test_persist_replaces_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("converted")).await.unwrap();

        for contents in [b"first".as_slice(), b"second".as_slice()] {
            let src = dir.path().join("staged.apk");
            fs::write(&src, contents).await.unwrap();
            store.persist(&src, "x.apk").await.unwrap();
        }

        let stream = store.get_stream("x.apk").await.unwrap();
        assert_eq!(collect(stream).await, b"second");
    }

    #[tokio::test]
    async fn test_missing_artifact_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).await.unwrap();

        assert!(matches!(
            store.size("absent.apk").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.get_stream("absent.apk").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).await.unwrap();

        assert!(store.exists("../escape").await.is_err());
        assert!(store.get_stream("a/b.apk").await.is_err());
    }
}
