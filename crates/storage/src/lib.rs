//! Filesystem stores for Splitpack.
//!
//! This crate provides:
//! - Session-scoped chunk storage with atomic writes and ordered reassembly
//! - Zip-member extraction for reassembled bundles
//! - Converted-artifact storage with streaming reads
//! - Stale-session sweeping

pub mod archive;
pub mod artifacts;
pub mod chunks;
pub mod error;
pub mod keys;

pub use archive::extract_member;
pub use artifacts::{ArtifactStore, ByteStream};
pub use chunks::ChunkStore;
pub use error::{StorageError, StorageResult};
