//! Extension and index-file probing.
//!
//! Produces the ordered list of concrete files a bare module path may refer
//! to. Callers test the candidates in order and take the first that exists.

use crate::{has_known_suffix, remove_extension, Extension};

/// Suffixes appended to a bare stem, in priority order: direct TypeScript
/// files, then declarations, then JavaScript.
pub const PROBE_EXTENSIONS: &[Extension] = &[
    Extension::Ts,
    Extension::Tsx,
    Extension::Dts,
    Extension::Js,
    Extension::Jsx,
];

/// File stem looked up inside a directory of the same name.
pub const INDEX_FILE_STEM: &str = "index";

/// Enumerate candidate files for `stem`.
///
/// Direct file matches always come before directory-index matches. A stem
/// that already carries a known suffix is tried verbatim first, then probed
/// with the suffix removed, so `./util.js` still reaches `util.ts`. Its
/// verbatim directory index comes last.
pub fn probe_candidates(stem: &str) -> Vec<String> {
    let stem = stem.trim_end_matches('/');
    let mut candidates = Vec::with_capacity(PROBE_EXTENSIONS.len() * 3 + 1);

    let suffixed = has_known_suffix(stem);
    let bare = if suffixed {
        candidates.push(stem.to_string());
        remove_extension(stem)
    } else {
        stem.to_string()
    };

    if !bare.is_empty() {
        for ext in PROBE_EXTENSIONS {
            push_unique(&mut candidates, format!("{}{}", bare, ext.as_str()));
        }
        for ext in PROBE_EXTENSIONS {
            push_unique(
                &mut candidates,
                format!("{}/{}{}", bare, INDEX_FILE_STEM, ext.as_str()),
            );
        }
    } else if !suffixed {
        // The project root has no file form, only an index.
        for ext in PROBE_EXTENSIONS {
            push_unique(&mut candidates, format!("{}{}", INDEX_FILE_STEM, ext.as_str()));
        }
    }
    if suffixed {
        for ext in PROBE_EXTENSIONS {
            push_unique(
                &mut candidates,
                format!("{}/{}{}", stem, INDEX_FILE_STEM, ext.as_str()),
            );
        }
    }

    candidates
}

fn push_unique(candidates: &mut Vec<String>, candidate: String) {
    if !candidates.contains(&candidate) {
        candidates.push(candidate);
    }
}
