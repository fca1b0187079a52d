//! Remote store access.
//!
//! The issuance workflow only needs three operations from the repository that
//! holds the badges: a tree listing, the change history, and an append-only
//! file write that records one commit. [`RemoteStore`] is that seam.
//!
//! ## Implementations
//! - `github.rs` — GitHub contents/commits REST API (blocking `reqwest`).
//! - `dir.rs` — a local directory with a JSONL commit log.
//! - `memory.rs` — in-process store for tests.
//!
//! Errors are never retried here; they surface to the caller as-is.

pub mod dir;
pub mod github;
pub mod memory;

pub use dir::DirStore;
pub use github::{GitHubStore, GitHubStoreConfig};
pub use memory::MemoryStore;

use crate::domain::models::{CommitRecord, TreeEntry, WriteReceipt};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("file already exists: {0}")]
    Conflict(String),
    #[error("invalid store path: {0}")]
    InvalidPath(String),
    #[error("invalid api base url: {0}")]
    InvalidUrl(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json from store: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid base64 content: {0}")]
    Encoding(#[from] base64::DecodeError),
}

pub trait RemoteStore: Send + Sync {
    /// Lists `path` (empty for the repository root). Directories are expanded
    /// one level.
    fn read_tree(&self, path: &str) -> Result<Vec<TreeEntry>, StoreError>;

    /// Returns up to `depth` pages of history, most recent commit first.
    fn read_history(&self, depth: u32) -> Result<Vec<CommitRecord>, StoreError>;

    /// Creates `path` with base64 `content` in a single commit. Existing paths
    /// are never overwritten.
    fn write_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<WriteReceipt, StoreError>;
}

impl<S: RemoteStore + ?Sized> RemoteStore for Box<S> {
    fn read_tree(&self, path: &str) -> Result<Vec<TreeEntry>, StoreError> {
        (**self).read_tree(path)
    }

    fn read_history(&self, depth: u32) -> Result<Vec<CommitRecord>, StoreError> {
        (**self).read_history(depth)
    }

    fn write_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
    ) -> Result<WriteReceipt, StoreError> {
        (**self).write_file(path, message, content)
    }
}

/// Rejects absolute paths and parent-directory hops before a store touches
/// them.
pub(crate) fn checked_path(path: &str) -> Result<&str, StoreError> {
    let trimmed = path.trim_matches('/');
    if trimmed
        .split('/')
        .any(|segment| segment == ".." || segment == ".")
        || path.starts_with('/')
    {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(trimmed)
}
