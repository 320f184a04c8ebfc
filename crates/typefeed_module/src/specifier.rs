//! Module specifier classification.

use crate::alias::AliasResolver;

/// Marker for specifiers resolved against the project root.
pub const ROOT_RELATIVE_MARKER: char = '/';

/// Prefix for Node built-in modules (`node:fs`).
pub const NODE_BUILTIN_PREFIX: &str = "node:";

/// How a specifier is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `./x`, `../x`, `.` or `..`, joined against the importing file.
    Relative,
    /// Matches the alias table, or starts with the root-relative marker.
    Aliased,
    /// A package name, optionally scoped, optionally with a subpath.
    External,
}

/// Whether the specifier starts with a path-relative marker.
pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Classify a specifier. Relative markers take precedence over aliases.
pub fn classify(specifier: &str, aliases: &AliasResolver) -> SpecifierKind {
    if is_relative(specifier) {
        SpecifierKind::Relative
    } else if specifier.starts_with(ROOT_RELATIVE_MARKER) || aliases.matches(specifier) {
        SpecifierKind::Aliased
    } else {
        SpecifierKind::External
    }
}

/// Split a module name into package name and subpath.
/// e.g. "@scope/pkg/sub/path" -> ("@scope/pkg", "sub/path")
/// e.g. "lodash/fp" -> ("lodash", "fp")
pub fn split_module_name(module_name: &str) -> (&str, &str) {
    let split_at = if module_name.starts_with('@') {
        module_name
            .match_indices('/')
            .nth(1)
            .map(|(idx, _)| idx)
    } else {
        module_name.find('/')
    };

    match split_at {
        Some(idx) => (&module_name[..idx], &module_name[idx + 1..]),
        None => (module_name, ""),
    }
}

/// The package an external specifier belongs to.
///
/// `node:` built-ins all map to the `node` package, whose type stubs declare
/// them. No validation happens here: a name that matches no installed
/// package simply loads nothing.
pub fn package_name(specifier: &str) -> &str {
    if specifier.starts_with(NODE_BUILTIN_PREFIX) {
        return "node";
    }
    split_module_name(specifier).0
}

/// Directory name of a package's stubs under the type-stub root:
/// `@scope/pkg` becomes `scope__pkg`.
pub fn type_stub_name(package: &str) -> String {
    match package.strip_prefix('@').and_then(|s| s.split_once('/')) {
        Some((scope, name)) => format!("{}__{}", scope, name),
        None => package.to_string(),
    }
}

/// Inverse of [`type_stub_name`].
pub fn package_from_type_stub(stub: &str) -> String {
    match stub.split_once("__") {
        Some((scope, name)) if !scope.is_empty() && !name.is_empty() => {
            format!("@{}/{}", scope, name)
        }
        _ => stub.to_string(),
    }
}
