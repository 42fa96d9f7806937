//! Session-scoped chunk storage and reassembly.

use crate::error::{StorageError, StorageResult};
use crate::keys::safe_component;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Store for pending upload chunks, one directory per session.
///
/// Layout: `<root>/<session>/<filename>.part<index>` for chunk artifacts.
/// The merged file is written next to its chunks as
/// `<root>/<session>/<filename>`, so removing the session directory removes
/// every intermediate at once.
pub struct ChunkStore {
    root: PathBuf,
}

impl ChunkStore {
    /// Create a new chunk store, creating the root directory if absent.
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Root directory holding all session directories.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one session's artifacts.
    pub fn session_dir(&self, session: &str) -> StorageResult<PathBuf> {
        safe_component(session)?;
        Ok(self.root.join(session))
    }

    fn chunk_name(filename: &str, index: u32) -> String {
        format!("{filename}.part{index}")
    }

    /// Path of one chunk artifact.
    pub fn chunk_path(&self, session: &str, filename: &str, index: u32) -> StorageResult<PathBuf> {
        safe_component(filename)?;
        Ok(self
            .session_dir(session)?
            .join(Self::chunk_name(filename, index)))
    }

    /// Write one chunk, creating the session directory if needed.
    ///
    /// The bytes go to a temp file first and are renamed into place, so a
    /// re-upload of the same index replaces the previous artifact whole
    /// (last write wins, never a partial mix of the two).
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn store_chunk(
        &self,
        session: &str,
        filename: &str,
        index: u32,
        data: Bytes,
    ) -> StorageResult<()> {
        let path = self.chunk_path(session, filename, index)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = path.with_file_name(format!(".tmp.{}", Uuid::new_v4()));
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp_path, &path).await?;

        Ok(())
    }

    /// Check whether a chunk artifact exists.
    pub async fn chunk_exists(
        &self,
        session: &str,
        filename: &str,
        index: u32,
    ) -> StorageResult<bool> {
        let path = self.chunk_path(session, filename, index)?;
        fs::try_exists(&path).await.map_err(StorageError::Io)
    }

    /// Merge a session's chunks into one file, in ascending index order.
    ///
    /// With `declared_total` the presence of every index in `0..total` is
    /// verified before any byte is written, and a gap fails with
    /// [`StorageError::MissingChunk`]. Without it the merge stops at the
    /// first missing index and treats the file as complete — a dropped
    /// middle chunk silently truncates the output.
    ///
    /// Each chunk is deleted once its bytes have been appended. Returns the
    /// merged file's path.
    #[instrument(skip(self))]
    pub async fn reassemble(
        &self,
        session: &str,
        filename: &str,
        declared_total: Option<u32>,
    ) -> StorageResult<PathBuf> {
        safe_component(filename)?;
        let dir = self.session_dir(session)?;
        if !fs::try_exists(&dir).await? {
            return Err(StorageError::NotFound(format!("upload session {session}")));
        }

        if let Some(total) = declared_total {
            for index in 0..total {
                if !fs::try_exists(dir.join(Self::chunk_name(filename, index))).await? {
                    return Err(StorageError::MissingChunk { index });
                }
            }
        }

        let merged_path = dir.join(filename);
        let mut merged = fs::File::create(&merged_path).await?;

        let mut index = 0u32;
        loop {
            if let Some(total) = declared_total
                && index >= total
            {
                break;
            }
            let chunk_path = dir.join(Self::chunk_name(filename, index));
            match fs::read(&chunk_path).await {
                Ok(data) => {
                    merged.write_all(&data).await?;
                    fs::remove_file(&chunk_path).await?;
                    index += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => break,
                Err(e) => return Err(StorageError::Io(e)),
            }
        }

        merged.sync_all().await?;
        tracing::debug!(session, filename, chunks = index, "Merged chunks");

        Ok(merged_path)
    }

    /// Remove a session directory and everything in it. Idempotent.
    #[instrument(skip(self))]
    pub async fn remove_session(&self, session: &str) -> StorageResult<()> {
        let dir = self.session_dir(session)?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Remove session directories not modified within `ttl`.
    ///
    /// Returns the number of sessions removed. Individual removal failures
    /// are logged and skipped so one bad directory cannot stall the sweep.
    #[instrument(skip(self))]
    pub async fn sweep_stale(&self, ttl: Duration) -> StorageResult<usize> {
        let Some(cutoff) = SystemTime::now().checked_sub(ttl) else {
            return Ok(0);
        };

        let mut removed = 0usize;
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(_) => continue,
            };
            if modified < cutoff {
                match fs::remove_dir_all(entry.path()).await {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        tracing::warn!(
                            session = %entry.file_name().to_string_lossy(),
                            error = %e,
                            "Failed to remove stale session"
                        );
                    }
                }
            }
        }

        Ok(removed)
    }

    /// Verify the store root exists and is a directory.
    pub async fn health_check(&self) -> StorageResult<()> {
        let metadata = fs::metadata(&self.root).await.map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("chunk store root not accessible: {e}"),
            ))
        })?;
        if !metadata.is_dir() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                format!("chunk store root is not a directory: {:?}", self.root),
            )));
        }
        Ok(())
    }
}
