//! Package manifest (`package.json`) fields the type loader reads.

use serde::Deserialize;

/// The manifest fields that point at a package's declarations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    pub types: Option<String>,
    pub typings: Option<String>,
}

impl PackageJson {
    /// The declared types entry: `types`, falling back to `typings`.
    pub fn types_entry(&self) -> Option<&str> {
        [self.types.as_deref(), self.typings.as_deref()]
            .into_iter()
            .flatten()
            .find(|entry| !entry.trim().is_empty())
    }
}

/// Parse a package.json from a string. Malformed manifests yield `None`.
pub fn parse_package_json(content: &str) -> Option<PackageJson> {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(value) if value.is_object() => {
            let field = |key: &str| {
                value
                    .get(key)
                    .and_then(|v| v.as_str())
                    .map(String::from)
            };
            Some(PackageJson {
                types: field("types"),
                typings: field("typings"),
            })
        }
        Ok(_) => None,
        Err(err) => {
            tracing::debug!(error = %err, "malformed package manifest");
            None
        }
    }
}
