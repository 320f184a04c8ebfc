//! Lexical extraction of module specifiers.
//!
//! This is pattern matching over source text, not parsing. It recognizes
//! static imports and re-exports, `import type`, side-effect imports,
//! dynamic `import()` and `require()`. Specifiers inside comments or
//! strings that merely look like imports are picked up too.

use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::fmt;

lazy_static! {
    static ref SPECIFIER_PATTERN: Regex = Regex::new(
        r#"(?m)(?:^|[^\w$.])(?:(?:import|export)\s*(?:type\s+)?(?:[\w$*{}\s,]+?\s*from\s*)?["']([^"'\n]+)["']|(?:import|require)\s*\(\s*["']([^"'\n]+)["']\s*\))"#
    )
    .expect("specifier pattern is valid");
}

/// Turns source text into the module specifiers it references.
pub trait SpecifierExtractor: Send + Sync + fmt::Debug {
    /// Specifiers in order of first occurrence, without duplicates.
    fn extract(&self, source: &str) -> Vec<String>;
}

/// The regex-based extractor used by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternExtractor;

impl SpecifierExtractor for PatternExtractor {
    fn extract(&self, source: &str) -> Vec<String> {
        extract_specifiers(source)
    }
}

/// Extract specifiers with [`PatternExtractor`].
pub fn extract_specifiers(source: &str) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut specifiers = Vec::new();

    for caps in SPECIFIER_PATTERN.captures_iter(source) {
        let Some(m) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let specifier = m.as_str().trim();
        if specifier.is_empty() {
            continue;
        }
        if seen.insert(specifier) {
            specifiers.push(specifier.to_string());
        }
    }

    specifiers
}
