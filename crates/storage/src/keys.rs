//! Path-component validation for client-derived names.

use crate::error::{StorageError, StorageResult};

/// Maximum length accepted for a single path component.
pub const MAX_COMPONENT_LEN: usize = 255;

/// Validate a name as a single, safe path component.
///
/// Session ids, filenames, and artifact names are joined directly onto a
/// store root, so they must not contain separators, traversal sequences, or
/// control characters. The server validates its inputs too; this check is
/// the storage layer's own line of defense.
pub fn safe_component(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidKey("empty name".to_string()));
    }
    if name.len() > MAX_COMPONENT_LEN {
        return Err(StorageError::InvalidKey(format!(
            "name longer than {MAX_COMPONENT_LEN} bytes"
        )));
    }
    if name == "." || name == ".." {
        return Err(StorageError::InvalidKey(format!(
            "path traversal not allowed: {name}"
        )));
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        return Err(StorageError::InvalidKey(format!(
            "unsafe character in name: {name}"
        )));
    }
    Ok(())
}
