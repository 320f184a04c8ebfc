//! typefeed_vfs: Restricted, asynchronous file access.
//!
//! The resolver never touches the disk directly. Everything goes through the
//! [`Filesystem`] trait, whose paths are project-relative and `/`-separated
//! (the empty string is the project root). Implementations must refuse to
//! leave the project root.

pub mod memory;
pub mod native;

pub use memory::MemoryFs;
pub use native::NativeFs;

use async_trait::async_trait;
use std::fmt;

/// Result type for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;

/// Errors that can occur during filesystem operations.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// File or directory not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The path points outside the project root.
    #[error("path escapes the project root: {0}")]
    OutsideRoot(String),

    /// Any other I/O failure (permissions, encoding, transient errors).
    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_directory: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
        }
    }
}

/// File access scoped to a single project root.
#[async_trait]
pub trait Filesystem: Send + Sync + fmt::Debug {
    /// Read a file as UTF-8 text.
    async fn read_file(&self, path: &str) -> FsResult<String>;

    /// List the entries of a directory.
    async fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>>;

    /// Whether a file or directory exists at `path`. Errors count as absent.
    async fn exists(&self, path: &str) -> bool;

    /// Whether a regular file exists at `path`. Directories do not count.
    async fn is_file(&self, path: &str) -> bool;
}
