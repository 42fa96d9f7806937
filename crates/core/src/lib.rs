//! Core domain types and shared logic for Splitpack.
//!
//! This crate defines the canonical data model used by the storage and
//! server crates:
//! - Upload session identifiers and the conversion lifecycle
//! - Request/response types for the HTTP surface
//! - Filename validation and artifact naming
//! - Configuration types
//! - Word-list extraction from PDF text

pub mod config;
pub mod error;
pub mod name;
pub mod session;
pub mod wordlist;

pub use config::{AppConfig, ServerConfig, StorageConfig};
pub use error::{Error, Result};
pub use name::{artifact_name, validate_filename};
pub use session::{
    ConvertPhase, ConvertRequest, ConvertResponse, SessionId, UploadChunkResponse,
};

/// Suffix identifying the archive member the converter extracts.
pub const BASE_APK_SUFFIX: &str = "base.apk";

/// Default maximum chunk size: 16 MiB
pub const DEFAULT_MAX_CHUNK_SIZE: u64 = 16 * 1024 * 1024;

/// Maximum accepted length for a session identifier.
pub const MAX_SESSION_ID_LEN: usize = 128;

/// Maximum accepted length for an uploaded filename.
pub const MAX_FILENAME_LEN: usize = 255;
