//! Filesystem seam for the spacedav gateway.
//!
//! The gateway manipulates the shared directory tree only through the
//! [`GatewayFs`] trait: stat, recursive mkdir, atomic rename, recursive
//! remove, directory listing, whole-file read/write, and mode forcing.
//! [`HostFs`] is the production implementation over `tokio::fs`; tests may
//! substitute fakes to exercise failure paths.
//!
//! Virtual-path normalization lives in [`path`] and is purely lexical.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod host;
pub mod path;

pub use error::{FsError, FsResult};
pub use host::HostFs;

use async_trait::async_trait;
use std::path::Path;

/// Metadata returned by [`GatewayFs::stat`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FsMetadata {
    /// True if the entry is a directory.
    pub is_dir: bool,
    /// True if the entry is a regular file.
    pub is_file: bool,
    /// Size in bytes.
    pub size: u64,
    /// Modification time, seconds since the UNIX epoch.
    pub mtime: u64,
}

/// Directory entry returned by [`GatewayFs::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FsDirEntry {
    /// Entry name.
    pub name: String,
    /// True if the entry is a directory.
    pub is_dir: bool,
    /// Size in bytes (0 for directories on most filesystems).
    pub size: u64,
    /// Modification time, seconds since the UNIX epoch.
    pub mtime: u64,
}

/// The filesystem primitives the gateway core relies on.
///
/// `rename` is expected to be atomic within a single filesystem;
/// cross-device renames surface the underlying error as-is.
#[async_trait]
pub trait GatewayFs: Send + Sync {
    /// Metadata for a path. A missing path yields [`FsError::NotFound`]
    /// so callers can distinguish absence from I/O failure.
    async fn stat(&self, path: &Path) -> FsResult<FsMetadata>;

    /// Create a directory and any missing ancestors with the given mode.
    async fn mkdir_all(&self, path: &Path, mode: u32) -> FsResult<()>;

    /// Atomically rename `src` to `dst`.
    async fn rename(&self, src: &Path, dst: &Path) -> FsResult<()>;

    /// Recursively remove a file or directory tree.
    async fn remove_all(&self, path: &Path) -> FsResult<()>;

    /// List a directory.
    async fn read_dir(&self, path: &Path) -> FsResult<Vec<FsDirEntry>>;

    /// Read a whole file into memory.
    async fn read_file(&self, path: &Path) -> FsResult<Vec<u8>>;

    /// Create or truncate a file with the given contents.
    async fn write_file(&self, path: &Path, contents: &[u8]) -> FsResult<()>;

    /// Force an entry's permission mode. Used after MKCOL/PUT because the
    /// tenant-root parent may carry a group-inherit bit the protocol
    /// engine's own mode argument does not override.
    async fn set_mode(&self, path: &Path, mode: u32) -> FsResult<()>;
}
