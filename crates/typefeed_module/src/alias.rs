//! Alias resolution over `compilerOptions.paths`.

use typefeed_tsoptions::{AliasTable, WILDCARD};
use typefeed_tspath::{combine_paths, normalize_path, strip_current_directory_prefix};

/// A compiled alias pattern. The part of a specifier between `prefix` and
/// `suffix` is the capture substituted into each target.
#[derive(Debug, Clone)]
struct AliasMatcher {
    prefix: String,
    suffix: String,
    exact: bool,
    targets: Vec<String>,
}

impl AliasMatcher {
    fn compile(pattern: &str, targets: &[String]) -> Option<Self> {
        match pattern.matches(WILDCARD).count() {
            0 => Some(Self {
                prefix: pattern.to_string(),
                suffix: String::new(),
                exact: true,
                targets: targets.to_vec(),
            }),
            1 => {
                let (prefix, suffix) = pattern.split_once(WILDCARD)?;
                Some(Self {
                    prefix: prefix.to_string(),
                    suffix: suffix.to_string(),
                    exact: false,
                    targets: targets.to_vec(),
                })
            }
            _ => None,
        }
    }

    fn capture<'s>(&self, specifier: &'s str) -> Option<&'s str> {
        if self.exact {
            return (specifier == self.prefix).then_some("");
        }
        if specifier.len() < self.prefix.len() + self.suffix.len() {
            return None;
        }
        specifier
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())
    }
}

/// Maps module specifiers to project-relative path stems.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    base_path: String,
    matchers: Vec<AliasMatcher>,
}

impl AliasResolver {
    pub fn new(table: &AliasTable, base_path: &str) -> Self {
        let matchers = table
            .iter()
            .filter_map(|entry| {
                let compiled = AliasMatcher::compile(&entry.pattern, &entry.targets);
                if compiled.is_none() {
                    tracing::warn!(
                        pattern = %entry.pattern,
                        "ignoring alias pattern with more than one wildcard"
                    );
                }
                compiled
            })
            .collect();

        Self {
            base_path: base_path.to_string(),
            matchers,
        }
    }

    /// Whether any pattern matches the specifier.
    pub fn matches(&self, specifier: &str) -> bool {
        self.matchers.iter().any(|m| m.capture(specifier).is_some())
    }

    /// All candidate stems from the first matching pattern, in target order.
    ///
    /// Later patterns are never consulted once one matches, even if they are
    /// more specific.
    pub fn candidates(&self, specifier: &str) -> Option<Vec<String>> {
        self.matchers.iter().find_map(|matcher| {
            let captured = matcher.capture(specifier)?;
            Some(
                matcher
                    .targets
                    .iter()
                    .map(|target| self.substitute(target, captured))
                    .collect(),
            )
        })
    }

    /// The first candidate stem of the first matching pattern.
    pub fn resolve(&self, specifier: &str) -> Option<String> {
        self.candidates(specifier)?.into_iter().next()
    }

    fn substitute(&self, target: &str, captured: &str) -> String {
        let rewritten = target.replacen(WILDCARD, captured, 1);
        let joined = combine_paths(&self.base_path, &rewritten);
        let stripped = strip_current_directory_prefix(&joined);
        normalize_path(stripped).trim_start_matches('/').to_string()
    }
}
