//! The `compilerOptions.paths` table.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Marker standing in for the captured part of a specifier.
pub const WILDCARD: char = '*';

/// One `paths` entry: a pattern and its ordered target templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub pattern: String,
    pub targets: Vec<String>,
}

impl AliasEntry {
    pub fn new(pattern: impl Into<String>, targets: Vec<String>) -> Self {
        Self {
            pattern: pattern.into(),
            targets,
        }
    }
}

/// Ordered alias table.
///
/// Entries keep declaration order, duplicates included: a JSON object with
/// the same pattern twice yields two entries, and the first one shadows the
/// second during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pattern: impl Into<String>, targets: Vec<String>) {
        self.entries.push(AliasEntry::new(pattern, targets));
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Into<String>> FromIterator<(P, Vec<String>)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (P, Vec<String>)>>(iter: I) -> Self {
        let mut table = AliasTable::new();
        for (pattern, targets) in iter {
            table.push(pattern, targets);
        }
        table
    }
}

impl<'de> Deserialize<'de> for AliasTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AliasTableVisitor;

        impl<'de> Visitor<'de> for AliasTableVisitor {
            type Value = AliasTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from alias patterns to lists of target templates")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<AliasTable, A::Error> {
                let mut table = AliasTable::new();
                while let Some((pattern, targets)) = map.next_entry::<String, Targets>()? {
                    table.push(pattern, targets.0);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(AliasTableVisitor)
    }
}

impl Serialize for AliasTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.pattern, &entry.targets)?;
        }
        map.end()
    }
}

/// Targets may be written as a single string or as a list.
struct Targets(Vec<String>);

impl<'de> Deserialize<'de> for Targets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(target) => Targets(vec![target]),
            OneOrMany::Many(targets) => Targets(targets),
        })
    }
}
