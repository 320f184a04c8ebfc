//! The registered file corpus.

use indexmap::IndexMap;

/// Files already handed to the type-checking engine, keyed by project path
/// and kept in registration order. Grows only.
#[derive(Debug, Default)]
pub struct Corpus {
    files: IndexMap<String, String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless present. Returns whether the path was new.
    pub(crate) fn insert(&mut self, path: String, content: String) -> bool {
        if self.files.contains_key(&path) {
            return false;
        }
        self.files.insert(path, content);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Content as it was at registration time.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }
}
