use std::path::Path;
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use tokio::fs;

use crate::{FsDirEntry, FsError, FsMetadata, FsResult, GatewayFs};

/// Production [`GatewayFs`] backed by the host filesystem via `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostFs;

impl HostFs {
    /// Create a host filesystem handle.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn mtime_secs(meta: &std::fs::Metadata) -> u64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs())
}

#[cfg(unix)]
async fn chmod(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await
}

#[cfg(not(unix))]
async fn chmod(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl GatewayFs for HostFs {
    async fn stat(&self, path: &Path) -> FsResult<FsMetadata> {
        let meta = fs::metadata(path)
            .await
            .map_err(|e| FsError::from_io(path, e))?;
        Ok(FsMetadata {
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            size: meta.len(),
            mtime: mtime_secs(&meta),
        })
    }

    async fn mkdir_all(&self, path: &Path, mode: u32) -> FsResult<()> {
        fs::create_dir_all(path).await?;
        // create_dir_all honors the process umask; force the requested mode
        // on the leaf so tenant roots come out group-writable.
        chmod(path, mode).await?;
        Ok(())
    }

    async fn rename(&self, src: &Path, dst: &Path) -> FsResult<()> {
        fs::rename(src, dst)
            .await
            .map_err(|e| FsError::from_io(src, e))
    }

    async fn remove_all(&self, path: &Path) -> FsResult<()> {
        let meta = fs::symlink_metadata(path)
            .await
            .map_err(|e| FsError::from_io(path, e))?;
        if meta.is_dir() {
            fs::remove_dir_all(path).await?;
        } else {
            fs::remove_file(path).await?;
        }
        Ok(())
    }

    async fn read_dir(&self, path: &Path) -> FsResult<Vec<FsDirEntry>> {
        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(path)
            .await
            .map_err(|e| FsError::from_io(path, e))?;
        while let Some(entry) = read_dir.next_entry().await? {
            let (is_dir, size, mtime) = match entry.metadata().await {
                Ok(meta) => (meta.is_dir(), meta.len(), mtime_secs(&meta)),
                // Broken symlinks and permission misses degrade to a bare name.
                Err(_) => (false, 0, 0),
            };
            entries.push(FsDirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
                size,
                mtime,
            });
        }
        Ok(entries)
    }

    async fn read_file(&self, path: &Path) -> FsResult<Vec<u8>> {
        fs::read(path).await.map_err(|e| FsError::from_io(path, e))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> FsResult<()> {
        fs::write(path, contents)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }

    async fn set_mode(&self, path: &Path, mode: u32) -> FsResult<()> {
        chmod(path, mode)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }
}
