//! Filesystem implementation over the host disk.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{DirEntry, Filesystem, FsError, FsResult};

/// Disk-backed [`Filesystem`] confined to `root`.
#[derive(Debug, Clone)]
pub struct NativeFs {
    root: PathBuf,
}

impl NativeFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a project path onto the disk, rejecting absolute paths and any
    /// `..` that would climb above the root.
    fn resolve(&self, path: &str) -> FsResult<PathBuf> {
        if typefeed_tspath::is_rooted(path) {
            return Err(FsError::OutsideRoot(path.to_string()));
        }

        let mut segments: Vec<&str> = Vec::new();
        for segment in path.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(FsError::OutsideRoot(path.to_string()));
                    }
                }
                other => segments.push(other),
            }
        }

        let mut resolved = self.root.clone();
        resolved.extend(segments);
        Ok(resolved)
    }
}

fn map_io_error(path: &str, err: std::io::Error) -> FsError {
    match err.kind() {
        ErrorKind::NotFound => FsError::NotFound(path.to_string()),
        _ => FsError::Io {
            path: path.to_string(),
            reason: err.to_string(),
        },
    }
}

#[async_trait]
impl Filesystem for NativeFs {
    async fn read_file(&self, path: &str) -> FsResult<String> {
        let disk_path = self.resolve(path)?;
        tokio::fs::read_to_string(&disk_path)
            .await
            .map_err(|e| map_io_error(path, e))
    }

    async fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        let disk_path = self.resolve(path)?;
        let mut reader = tokio::fs::read_dir(&disk_path)
            .await
            .map_err(|e| map_io_error(path, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| map_io_error(path, e))? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            // Follow symlinks: linked package directories are common.
            let is_directory = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            entries.push(DirEntry { name, is_directory });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(disk_path) => tokio::fs::try_exists(&disk_path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn is_file(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(disk_path) => tokio::fs::metadata(&disk_path)
                .await
                .is_ok_and(|m| m.is_file()),
            Err(_) => false,
        }
    }
}
