//! Uploaded filename validation and artifact naming.

/// Validate a caller-supplied filename as a single safe path component.
///
/// Chunk artifacts, the merged file, and the final artifact name are all
/// derived from this string, so it must not be able to escape its session
/// directory or break response headers.
pub fn validate_filename(name: &str) -> crate::Result<()> {
    if name.is_empty() {
        return Err(crate::Error::InvalidFilename("must not be empty".to_string()));
    }
    if name.len() > crate::MAX_FILENAME_LEN {
        return Err(crate::Error::InvalidFilename(format!(
            "longer than {} bytes",
            crate::MAX_FILENAME_LEN
        )));
    }
    if name.starts_with('.') {
        return Err(crate::Error::InvalidFilename(format!(
            "must not start with '.': {name}"
        )));
    }
    if name
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '"') || c.is_control())
    {
        return Err(crate::Error::InvalidFilename(format!(
            "unsafe character in filename: {name}"
        )));
    }
    Ok(())
}

/// Canonical artifact name for an uploaded bundle: the filename's stem with
/// an `.apk` extension (`x.apks` becomes `x.apk`).
pub fn artifact_name(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => filename,
    };
    format!("{stem}.apk")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename_accepts_common_names() {
        for name in ["x.apks", "My App (1.2).apks", "bundle", "a-b_c.zip"] {
            validate_filename(name).unwrap();
        }
    }

    #[test]
    fn test_validate_filename_rejects_unsafe_names() {
        for name in ["", ".", "..", ".hidden", "a/b.apks", "a\\b", "x\"y", "x\n"] {
            assert!(validate_filename(name).is_err(), "accepted {name:?}");
        }
        let long = "a".repeat(crate::MAX_FILENAME_LEN + 1);
        assert!(validate_filename(&long).is_err());
    }

    #[test]
    fn test_artifact_name_replaces_extension() {
        assert_eq!(artifact_name("x.apks"), "x.apk");
        assert_eq!(artifact_name("archive.v2.apks"), "archive.v2.apk");
        assert_eq!(artifact_name("bundle"), "bundle.apk");
    }
}
