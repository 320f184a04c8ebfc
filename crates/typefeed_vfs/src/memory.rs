//! In-memory filesystem.
//!
//! Directories are implied by the files beneath them. Handy for embedders
//! that already hold project contents in memory, and for tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

use crate::{DirEntry, Filesystem, FsError, FsResult};
use typefeed_tspath::to_project_path;

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<String, String>,
    failing: BTreeSet<String>,
    reads: Vec<String>,
}

/// A [`Filesystem`] backed by a map of project paths to contents.
#[derive(Debug, Default)]
pub struct MemoryFs {
    state: RwLock<MemoryState>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(path, content)` pairs.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<String>,
    {
        let fs = Self::new();
        for (path, content) in files {
            fs.insert(path.as_ref(), content);
        }
        fs
    }

    pub fn insert(&self, path: &str, content: impl Into<String>) {
        self.state
            .write()
            .files
            .insert(to_project_path(path), content.into());
    }

    /// Make every read or listing of `path` fail with an I/O error.
    pub fn fail_on(&self, path: &str) {
        self.state.write().failing.insert(to_project_path(path));
    }

    /// Paths passed to `read_file`, in call order.
    pub fn reads(&self) -> Vec<String> {
        self.state.read().reads.clone()
    }

    fn is_dir(state: &MemoryState, dir: &str) -> bool {
        if dir.is_empty() {
            return true;
        }
        let prefix = format!("{}/", dir);
        state
            .files
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(path, _)| path.starts_with(&prefix))
    }

    fn check_failing(state: &MemoryState, path: &str) -> FsResult<()> {
        if state.failing.contains(path) {
            return Err(FsError::Io {
                path: path.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Filesystem for MemoryFs {
    async fn read_file(&self, path: &str) -> FsResult<String> {
        let key = to_project_path(path);
        let mut state = self.state.write();
        state.reads.push(key.clone());
        Self::check_failing(&state, &key)?;
        state
            .files
            .get(&key)
            .cloned()
            .ok_or(FsError::NotFound(key))
    }

    async fn read_dir(&self, path: &str) -> FsResult<Vec<DirEntry>> {
        let key = to_project_path(path);
        let state = self.state.read();
        Self::check_failing(&state, &key)?;
        if !Self::is_dir(&state, &key) {
            return Err(FsError::NotFound(key));
        }

        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{}/", key)
        };

        let mut children: BTreeMap<String, bool> = BTreeMap::new();
        for file in state.files.keys() {
            let Some(rest) = file.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    children.insert(dir.to_string(), true);
                }
                None => {
                    children.entry(rest.to_string()).or_insert(false);
                }
            }
        }

        Ok(children
            .into_iter()
            .map(|(name, is_directory)| DirEntry { name, is_directory })
            .collect())
    }

    async fn exists(&self, path: &str) -> bool {
        let key = to_project_path(path);
        let state = self.state.read();
        state.files.contains_key(&key) || Self::is_dir(&state, &key)
    }

    async fn is_file(&self, path: &str) -> bool {
        self.state.read().files.contains_key(&to_project_path(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> MemoryFs {
        MemoryFs::with_files([
            ("src/main.ts", "import './a';"),
            ("src/a.ts", "export const a = 1;"),
            ("node_modules/@types/node/index.d.ts", "declare module 'fs' {}"),
        ])
    }

    #[tokio::test]
    async fn test_read_and_exists() {
        let fs = fixture();
        assert_eq!(fs.read_file("/src/a.ts").await.unwrap(), "export const a = 1;");
        assert!(fs.exists("src").await);
        assert!(fs.exists("node_modules/@types").await);
        assert!(!fs.exists("src/b.ts").await);
        assert!(fs.exists("").await);
    }

    #[tokio::test]
    async fn test_is_file_excludes_directories() {
        let fs = fixture();
        assert!(fs.is_file("src/a.ts").await);
        assert!(!fs.is_file("src").await);
        assert!(!fs.is_file("").await);
        assert!(!fs.is_file("src/b.ts").await);
    }

    #[tokio::test]
    async fn test_read_dir() {
        let fs = fixture();
        assert_eq!(
            fs.read_dir("").await.unwrap(),
            vec![DirEntry::directory("node_modules"), DirEntry::directory("src")]
        );
        assert_eq!(
            fs.read_dir("src").await.unwrap(),
            vec![DirEntry::file("a.ts"), DirEntry::file("main.ts")]
        );
        assert!(matches!(fs.read_dir("lib").await, Err(FsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sibling_prefix_is_not_a_child() {
        let fs = MemoryFs::with_files([("src-old/a.ts", "")]);
        assert!(!fs.exists("src").await);
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let fs = fixture();
        fs.fail_on("src/a.ts");
        assert!(matches!(fs.read_file("src/a.ts").await, Err(FsError::Io { .. })));
        assert_eq!(fs.reads(), vec!["src/a.ts"]);
    }
}
