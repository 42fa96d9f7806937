//! Zip-member extraction for reassembled bundles.

use crate::error::{StorageError, StorageResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::instrument;
use uuid::Uuid;
use zip::ZipArchive;

/// Extract the first archive member whose name ends with `suffix`.
///
/// Members are scanned in container order; directories are skipped. The
/// match is written under `dest_dir` preserving its internal relative path
/// (`split_0/base.apk` lands at `dest_dir/split_0/base.apk`), and the
/// extracted file's path is returned. Member names that would escape
/// `dest_dir` are rejected.
///
/// Bytes go to a temp sibling and are renamed once complete, so a failed
/// extraction leaves no partial file behind.
///
/// Blocking; call via `spawn_blocking` from async code.
#[instrument]
pub fn extract_member(
    archive_path: &Path,
    suffix: &str,
    dest_dir: &Path,
) -> StorageResult<PathBuf> {
    let file = fs::File::open(archive_path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|e| StorageError::InvalidArchive(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| StorageError::InvalidArchive(e.to_string()))?;
        if entry.is_dir() || !entry.name().ends_with(suffix) {
            continue;
        }

        let Some(relative) = entry.enclosed_name() else {
            return Err(StorageError::InvalidKey(format!(
                "archive member escapes destination: {}",
                entry.name()
            )));
        };
        let target = dest_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = target.with_file_name(format!(".tmp.{}", Uuid::new_v4()));
        let copied = (|| -> io::Result<()> {
            let mut out = fs::File::create(&temp_path)?;
            io::copy(&mut entry, &mut out)?;
            out.sync_all()
        })();
        if let Err(e) = copied {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::Io(e));
        }
        fs::rename(&temp_path, &target)?;

        tracing::debug!(member = entry.name(), "Extracted archive member");
        return Ok(target);
    }

    Err(StorageError::MemberNotFound(suffix.to_string()))
}
