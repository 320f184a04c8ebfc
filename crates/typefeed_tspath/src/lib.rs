//! typefeed_tspath: Path normalization and extension handling.
//!
//! All paths handled here are `/`-separated strings. Project paths are
//! relative to the project root (the empty string is the root itself);
//! nothing in this crate touches the filesystem.

mod probe;

pub use probe::{probe_candidates, INDEX_FILE_STEM, PROBE_EXTENSIONS};

/// File extensions the resolver knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Ts,
    Tsx,
    Dts,
    Js,
    Jsx,
    Json,
    Mts,
    Cts,
    Dmts,
    Dcts,
    Mjs,
    Cjs,
}

/// Suffix table. Declaration suffixes come before the plain ones they end
/// with, so the first `ends_with` hit is the right one.
const SUFFIXES: &[(&str, Extension)] = &[
    (".d.ts", Extension::Dts),
    (".d.mts", Extension::Dmts),
    (".d.cts", Extension::Dcts),
    (".ts", Extension::Ts),
    (".tsx", Extension::Tsx),
    (".mts", Extension::Mts),
    (".cts", Extension::Cts),
    (".js", Extension::Js),
    (".jsx", Extension::Jsx),
    (".mjs", Extension::Mjs),
    (".cjs", Extension::Cjs),
    (".json", Extension::Json),
];

impl Extension {
    /// The suffix, dot included.
    pub fn as_str(self) -> &'static str {
        SUFFIXES
            .iter()
            .find(|(_, ext)| *ext == self)
            .map_or("", |(suffix, _)| suffix)
    }

    pub fn is_declaration(self) -> bool {
        matches!(self, Extension::Dts | Extension::Dmts | Extension::Dcts)
    }

    /// Whether a file of this kind can be open in the editor as a live
    /// model: any script, never a declaration or JSON.
    pub fn is_editable_source(self) -> bool {
        !self.is_declaration() && self != Extension::Json
    }

    /// Case-insensitive suffix match.
    pub fn from_path(path: &str) -> Option<Extension> {
        let lower = path.to_ascii_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| lower.ends_with(suffix))
            .map(|(_, ext)| *ext)
    }
}

/// Normalize a path structurally.
///
/// Segments are pushed on a stack: `.` and empty segments are dropped and
/// `..` pops the previous segment. A `..` with nothing left to pop is
/// discarded, so the result never climbs above its starting point. A leading
/// `/` is kept.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let rooted = path.starts_with('/');

    let mut stack: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    let joined = stack.join("/");
    if rooted {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Append `relative` to `base` without normalizing. A rooted `relative`
/// replaces `base`.
pub fn combine_paths(base: &str, relative: &str) -> String {
    if base.is_empty() || is_rooted(relative) {
        relative.to_string()
    } else if base.ends_with('/') {
        format!("{}{}", base, relative)
    } else {
        format!("{}/{}", base, relative)
    }
}

/// Join `relative` onto `base` and normalize the result.
pub fn join_normalized(base: &str, relative: &str) -> String {
    normalize_path(&combine_paths(base, relative))
}

/// Whether the path is absolute: a leading separator or a drive letter.
pub fn is_rooted(path: &str) -> bool {
    match path.as_bytes() {
        [b'/' | b'\\', ..] => true,
        [drive, b':', b'/' | b'\\', ..] => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

/// The directory part of a path, trailing `/` included; empty for a bare
/// file name.
pub fn get_directory_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    match path.rfind('/') {
        Some(last_slash) => path[..=last_slash].to_string(),
        None => String::new(),
    }
}

/// Drop a known suffix. Paths without one come back unchanged.
pub fn remove_extension(path: &str) -> String {
    match Extension::from_path(path) {
        Some(ext) => path[..path.len() - ext.as_str().len()].to_string(),
        None => path.to_string(),
    }
}

/// Strip any number of leading `./` markers.
pub fn strip_current_directory_prefix(path: &str) -> &str {
    let mut rest = path;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    if rest == "." {
        ""
    } else {
        rest
    }
}

/// Turn any path into a project-relative one: normalized, no leading `/`.
pub fn to_project_path(path: &str) -> String {
    normalize_path(path).trim_start_matches('/').to_string()
}

/// Build the virtual URI under which a project path is shown to the
/// type-checking engine.
pub fn to_file_uri(project_path: &str) -> String {
    format!("file:///{}", project_path.trim_start_matches('/'))
}

/// Whether the path names a declaration file.
pub fn is_declaration_file(path: &str) -> bool {
    Extension::from_path(path).is_some_and(Extension::is_declaration)
}

/// Whether the path ends in any known source or declaration suffix.
pub fn has_known_suffix(path: &str) -> bool {
    Extension::from_path(path).is_some()
}
