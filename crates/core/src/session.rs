//! Upload session identifiers, conversion lifecycle, and API types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for an upload session.
///
/// The token is caller-supplied; uniqueness is not server-enforced. Parsing
/// rejects anything that is not a single safe path component, since the
/// token names the session's directory on disk.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Parse and validate a caller-supplied session token.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if s.is_empty() {
            return Err(crate::Error::InvalidSessionId("must not be empty".to_string()));
        }
        if s.len() > crate::MAX_SESSION_ID_LEN {
            return Err(crate::Error::InvalidSessionId(format!(
                "longer than {} bytes",
                crate::MAX_SESSION_ID_LEN
            )));
        }
        if s == "." || s == ".." {
            return Err(crate::Error::InvalidSessionId(format!(
                "path traversal not allowed: {s}"
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(crate::Error::InvalidSessionId(format!(
                "only alphanumerics, '.', '_' and '-' are allowed: {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conversion pipeline state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvertPhase {
    /// Chunks are being uploaded; no convert call yet.
    AwaitingChunks,
    /// Chunks are being merged into one file.
    Merging,
    /// The merged file is being opened and its member extracted.
    Extracting,
    /// The renamed artifact exists; session artifacts are gone.
    Done,
    /// The conversion failed; session artifacts are gone.
    Failed,
}

impl ConvertPhase {
    /// Check if the phase is terminal for the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Stable name for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingChunks => "awaiting_chunks",
            Self::Merging => "merging",
            Self::Extracting => "extracting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

/// Request to convert a completed chunked upload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConvertRequest {
    /// The uploaded bundle's filename, as sent with each chunk.
    pub filename: String,
    /// The session token the chunks were uploaded under.
    #[serde(rename = "uniqueId")]
    pub unique_id: String,
    /// Declared chunk count. When present, the merge verifies every index
    /// in `0..total_chunks` was received and fails otherwise; when absent,
    /// the merge stops at the first gap and treats the file as complete.
    #[serde(rename = "totalChunks", default)]
    pub total_chunks: Option<u32>,
}

/// Response from a successful conversion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
    /// Always `true`; failures are reported as structured errors.
    pub success: bool,
    /// Path the artifact can be fetched from.
    pub download_url: String,
}

/// Response from storing one chunk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadChunkResponse {
    /// Always `true`; failures are reported as structured errors.
    pub success: bool,
}
