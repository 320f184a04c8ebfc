//! typefeed_module: Module specifier handling.
//!
//! Pure building blocks for the resolver: alias resolution over
//! `compilerOptions.paths`, specifier classification, lexical specifier
//! extraction, and package manifest parsing. None of it performs I/O.

pub mod alias;
pub mod extract;
pub mod package_json;
pub mod specifier;

pub use alias::AliasResolver;
pub use extract::{extract_specifiers, PatternExtractor, SpecifierExtractor};
pub use package_json::{parse_package_json, PackageJson};
pub use specifier::{
    classify, is_relative, package_from_type_stub, package_name, split_module_name,
    type_stub_name, SpecifierKind, NODE_BUILTIN_PREFIX, ROOT_RELATIVE_MARKER,
};
