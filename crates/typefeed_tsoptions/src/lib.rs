//! typefeed_tsoptions: tsconfig.json parsing and compiler options.
//!
//! Parses the project's compiler configuration document (JSON with comments)
//! into a raw [`TsConfig`], and normalizes it into the immutable
//! [`CompilerOptions`] record handed to the type-checking engine.

pub mod alias;
pub mod jsonc;

pub use alias::{AliasEntry, AliasTable, WILDCARD};

use serde::{Deserialize, Serialize};

/// Root-relative paths probed for a configuration document, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["tsconfig.json", "jsconfig.json"];

/// Type roots used when the document does not name any.
pub const DEFAULT_TYPE_ROOT: &str = "node_modules/@types";

/// Errors produced while interpreting a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document was found but could not be read.
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    /// The document is not valid JSON after comment stripping.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// An `extends` chain loops back on itself or is too long.
    #[error("configuration `extends` chain through {path} is cyclic or too deep")]
    ExtendsChain { path: String },
}

/// Compiler options exactly as written in the document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompilerOptions {
    pub target: Option<String>,
    pub module: Option<String>,
    pub module_resolution: Option<String>,
    pub jsx: Option<String>,
    pub strict: Option<bool>,
    pub allow_js: Option<bool>,
    pub check_js: Option<bool>,
    pub no_emit: Option<bool>,
    pub es_module_interop: Option<bool>,
    pub allow_synthetic_default_imports: Option<bool>,
    pub skip_lib_check: Option<bool>,
    pub isolated_modules: Option<bool>,
    pub resolve_json_module: Option<bool>,
    pub base_url: Option<String>,
    pub paths: Option<AliasTable>,
    pub type_roots: Option<Vec<String>>,
}

impl RawCompilerOptions {
    /// Fill every unset field from `base`. Used for `extends`: the
    /// extending document wins field by field.
    pub fn inherit_from(&mut self, base: RawCompilerOptions) {
        macro_rules! inherit {
            ($($field:ident),* $(,)?) => {
                $( if self.$field.is_none() { self.$field = base.$field; } )*
            };
        }
        inherit!(
            target,
            module,
            module_resolution,
            jsx,
            strict,
            allow_js,
            check_js,
            no_emit,
            es_module_interop,
            allow_synthetic_default_imports,
            skip_lib_check,
            isolated_modules,
            resolve_json_module,
            base_url,
            paths,
            type_roots,
        );
    }
}

/// The tsconfig.json file structure (fields the resolver reads).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    pub compiler_options: Option<RawCompilerOptions>,
    pub extends: Option<Extends>,
}

/// The `extends` field: one base document or several.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Extends {
    One(String),
    Many(Vec<String>),
}

impl Extends {
    /// Base documents in declaration order. Later ones take precedence.
    pub fn bases(&self) -> Vec<&str> {
        match self {
            Extends::One(base) => vec![base.as_str()],
            Extends::Many(bases) => bases.iter().map(String::as_str).collect(),
        }
    }
}

/// Parse a configuration document, tolerating comments and trailing commas.
pub fn parse_tsconfig(path: &str, content: &str) -> Result<TsConfig, ConfigError> {
    let strict = jsonc::to_strict_json(content);
    serde_json::from_str(&strict).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Script target version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScriptTarget {
    ES5,
    ES2015,
    ES2016,
    ES2017,
    ES2018,
    ES2019,
    ES2020,
    ES2021,
    ES2022,
    ES2023,
    ESNext,
}

impl ScriptTarget {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.to_ascii_lowercase().as_str() {
            "es5" => ScriptTarget::ES5,
            "es6" | "es2015" => ScriptTarget::ES2015,
            "es2016" => ScriptTarget::ES2016,
            "es2017" => ScriptTarget::ES2017,
            "es2018" => ScriptTarget::ES2018,
            "es2019" => ScriptTarget::ES2019,
            "es2020" => ScriptTarget::ES2020,
            "es2021" => ScriptTarget::ES2021,
            "es2022" => ScriptTarget::ES2022,
            "es2023" => ScriptTarget::ES2023,
            "esnext" | "latest" => ScriptTarget::ESNext,
            _ => return None,
        })
    }
}

/// Module kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModuleKind {
    CommonJS,
    ES2015,
    ES2020,
    ES2022,
    ESNext,
    Node16,
    NodeNext,
    Preserve,
}

impl ModuleKind {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.to_ascii_lowercase().as_str() {
            "commonjs" => ModuleKind::CommonJS,
            "es6" | "es2015" => ModuleKind::ES2015,
            "es2020" => ModuleKind::ES2020,
            "es2022" => ModuleKind::ES2022,
            "esnext" => ModuleKind::ESNext,
            "node16" => ModuleKind::Node16,
            "nodenext" => ModuleKind::NodeNext,
            "preserve" => ModuleKind::Preserve,
            _ => return None,
        })
    }
}

/// Module resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModuleResolutionKind {
    Classic,
    Node10,
    Node16,
    NodeNext,
    Bundler,
}

impl ModuleResolutionKind {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.to_ascii_lowercase().as_str() {
            "classic" => ModuleResolutionKind::Classic,
            "node" | "node10" => ModuleResolutionKind::Node10,
            "node16" => ModuleResolutionKind::Node16,
            "nodenext" => ModuleResolutionKind::NodeNext,
            "bundler" => ModuleResolutionKind::Bundler,
            _ => return None,
        })
    }
}

/// JSX emit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JsxEmit {
    Preserve,
    React,
    ReactJSX,
    ReactJSXDev,
    ReactNative,
}

impl JsxEmit {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value.to_ascii_lowercase().as_str() {
            "preserve" => JsxEmit::Preserve,
            "react" => JsxEmit::React,
            "react-jsx" => JsxEmit::ReactJSX,
            "react-jsxdev" => JsxEmit::ReactJSXDev,
            "react-native" => JsxEmit::ReactNative,
            _ => return None,
        })
    }
}

/// Normalized compiler options. Every field has a concrete value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub target: ScriptTarget,
    pub module: ModuleKind,
    pub module_resolution: ModuleResolutionKind,
    pub jsx: JsxEmit,
    pub strict: bool,
    pub allow_js: bool,
    pub check_js: bool,
    pub no_emit: bool,
    pub es_module_interop: bool,
    pub allow_synthetic_default_imports: bool,
    pub skip_lib_check: bool,
    pub isolated_modules: bool,
    pub resolve_json_module: bool,
    /// Base path for alias targets, relative to the project root.
    pub base_url: String,
    pub paths: AliasTable,
    pub type_roots: Vec<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            target: ScriptTarget::ESNext,
            module: ModuleKind::ESNext,
            module_resolution: ModuleResolutionKind::Bundler,
            jsx: JsxEmit::ReactJSX,
            strict: true,
            allow_js: true,
            check_js: false,
            no_emit: true,
            es_module_interop: true,
            allow_synthetic_default_imports: true,
            skip_lib_check: true,
            isolated_modules: true,
            resolve_json_module: true,
            base_url: ".".to_string(),
            paths: AliasTable::new(),
            type_roots: vec![DEFAULT_TYPE_ROOT.to_string()],
        }
    }
}

impl CompilerOptions {
    /// Normalize raw options, applying the default for every absent or
    /// unrecognized value.
    pub fn from_raw(raw: RawCompilerOptions) -> Self {
        let defaults = CompilerOptions::default();
        Self {
            target: raw
                .target
                .as_deref()
                .and_then(ScriptTarget::parse)
                .unwrap_or(defaults.target),
            module: raw
                .module
                .as_deref()
                .and_then(ModuleKind::parse)
                .unwrap_or(defaults.module),
            module_resolution: raw
                .module_resolution
                .as_deref()
                .and_then(ModuleResolutionKind::parse)
                .unwrap_or(defaults.module_resolution),
            jsx: raw.jsx.as_deref().and_then(JsxEmit::parse).unwrap_or(defaults.jsx),
            strict: raw.strict.unwrap_or(defaults.strict),
            allow_js: raw.allow_js.unwrap_or(defaults.allow_js),
            check_js: raw.check_js.unwrap_or(defaults.check_js),
            no_emit: raw.no_emit.unwrap_or(defaults.no_emit),
            es_module_interop: raw.es_module_interop.unwrap_or(defaults.es_module_interop),
            allow_synthetic_default_imports: raw
                .allow_synthetic_default_imports
                .unwrap_or(defaults.allow_synthetic_default_imports),
            skip_lib_check: raw.skip_lib_check.unwrap_or(defaults.skip_lib_check),
            isolated_modules: raw.isolated_modules.unwrap_or(defaults.isolated_modules),
            resolve_json_module: raw.resolve_json_module.unwrap_or(defaults.resolve_json_module),
            base_url: raw.base_url.unwrap_or(defaults.base_url),
            paths: raw.paths.unwrap_or_default(),
            type_roots: raw.type_roots.unwrap_or(defaults.type_roots),
        }
    }
}
