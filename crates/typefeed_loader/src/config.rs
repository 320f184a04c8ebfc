//! Loader tunables and the project configuration loader.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use futures::future::BoxFuture;
use rustc_hash::FxHashSet;
use typefeed_module::{is_relative, AliasResolver};
use typefeed_tsoptions::{
    parse_tsconfig, CompilerOptions, ConfigError, RawCompilerOptions, CONFIG_FILE_NAMES,
};
use typefeed_tspath::{get_directory_path, is_rooted, join_normalized, to_project_path};
use typefeed_vfs::Filesystem;

/// Longest `extends` chain followed before giving up.
pub const MAX_EXTENDS_DEPTH: usize = 8;

/// Bounds and lists that steer how much the resolver loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Source files registered along one import chain, entry point included.
    pub max_source_depth: usize,
    /// Declaration files of this many bytes or more are not crawled.
    pub max_declaration_size: usize,
    /// Crawl depth below a type-stub directory.
    pub type_stub_depth: usize,
    /// Crawl depth below a package's own directory.
    pub package_depth: usize,
    /// Directory names the crawler never enters.
    pub denylist: Vec<String>,
    /// Packages loaded before the type-stub root is enumerated.
    pub priority_packages: Vec<String>,
    /// Where installed packages live.
    pub package_root: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_source_depth: 10,
            max_declaration_size: 512 * 1024,
            type_stub_depth: 3,
            package_depth: 2,
            denylist: [
                "test",
                "tests",
                "__tests__",
                "example",
                "examples",
                "docs",
                "doc",
                ".git",
                "node_modules",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            priority_packages: [
                "react",
                "react-dom",
                "react-router-dom",
                "lucide-react",
                "@radix-ui/react-slot",
                "class-variance-authority",
                "clsx",
                "tailwind-merge",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            package_root: "node_modules".to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn is_denylisted(&self, name: &str) -> bool {
        self.denylist.iter().any(|d| d == name)
    }
}

/// Where the compiler options came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from the document at this path.
    Document(String),
    /// No usable document. Built-in defaults apply.
    Default,
}

/// Output of the configuration loader.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub options: Arc<CompilerOptions>,
    pub aliases: AliasResolver,
    pub source: ConfigSource,
}

impl LoadedConfig {
    pub fn from_options(options: CompilerOptions, source: ConfigSource) -> Self {
        let aliases = AliasResolver::new(&options.paths, &options.base_url);
        Self {
            options: Arc::new(options),
            aliases,
            source,
        }
    }

    pub fn default_config() -> Self {
        Self::from_options(CompilerOptions::default(), ConfigSource::Default)
    }
}

/// Read the project configuration, falling back to the defaults.
///
/// The first existing document of [`CONFIG_FILE_NAMES`] is used. If it cannot
/// be read or parsed the failure is logged and the defaults are returned.
pub async fn load_project_config(fs: &dyn Filesystem, package_root: &str) -> LoadedConfig {
    for name in CONFIG_FILE_NAMES {
        if !fs.exists(name).await {
            continue;
        }

        let mut visited = FxHashSet::default();
        return match load_chain(fs, name.to_string(), package_root, &mut visited, 0).await {
            Ok(raw) => {
                info!(path = %name, "loaded project configuration");
                LoadedConfig::from_options(
                    CompilerOptions::from_raw(raw),
                    ConfigSource::Document(name.to_string()),
                )
            }
            Err(err) => {
                warn!(error = %err, "falling back to default configuration");
                LoadedConfig::default_config()
            }
        };
    }

    debug!("no configuration document, using defaults");
    LoadedConfig::default_config()
}

/// Read one document and merge in everything it extends. Paths inside each
/// document are rebased onto the project root.
fn load_chain<'a>(
    fs: &'a dyn Filesystem,
    path: String,
    package_root: &'a str,
    visited: &'a mut FxHashSet<String>,
    depth: usize,
) -> BoxFuture<'a, Result<RawCompilerOptions, ConfigError>> {
    Box::pin(async move {
        if depth > MAX_EXTENDS_DEPTH || !visited.insert(path.clone()) {
            return Err(ConfigError::ExtendsChain { path });
        }

        let content = fs.read_file(&path).await.map_err(|err| ConfigError::Read {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        let config = parse_tsconfig(&path, &content)?;

        let config_dir = get_directory_path(&path);
        let mut raw = config.compiler_options.unwrap_or_default();
        rebase(&mut raw, &config_dir);

        if let Some(extends) = &config.extends {
            for base in extends.bases().into_iter().rev() {
                let base_path = resolve_extends(&config_dir, base, package_root);
                match load_chain(fs, base_path, package_root, visited, depth + 1).await {
                    Ok(base_raw) => raw.inherit_from(base_raw),
                    Err(err) => warn!(error = %err, extends = %base, "ignoring base configuration"),
                }
            }
        }

        Ok(raw)
    })
}

fn rebase(raw: &mut RawCompilerOptions, config_dir: &str) {
    if let Some(base_url) = raw.base_url.as_mut() {
        *base_url = to_project_path(&join_normalized(config_dir, base_url));
    }
    if let Some(roots) = raw.type_roots.as_mut() {
        for root in roots.iter_mut() {
            *root = to_project_path(&join_normalized(config_dir, root));
        }
    }
}

/// Locate the document an `extends` entry names.
fn resolve_extends(config_dir: &str, target: &str, package_root: &str) -> String {
    if is_relative(target) || is_rooted(target) {
        let path = to_project_path(&join_normalized(config_dir, target));
        if path.ends_with(".json") {
            path
        } else {
            format!("{}.json", path)
        }
    } else if target.ends_with(".json") {
        format!("{}/{}", package_root, target)
    } else {
        format!("{}/{}/tsconfig.json", package_root, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typefeed_tsoptions::JsxEmit;
    use typefeed_vfs::MemoryFs;

    #[tokio::test]
    async fn test_missing_document_uses_defaults() {
        let fs = MemoryFs::with_files([("src/main.ts", "")]);
        let loaded = load_project_config(&fs, "node_modules").await;
        assert_eq!(loaded.source, ConfigSource::Default);
        assert_eq!(*loaded.options, CompilerOptions::default());
        assert!(loaded.options.paths.is_empty());
        assert!(!loaded.aliases.matches("@/x"));
    }

    #[tokio::test]
    async fn test_malformed_document_uses_defaults() {
        let fs = MemoryFs::with_files([("tsconfig.json", "{ \"compilerOptions\": ")]);
        let loaded = load_project_config(&fs, "node_modules").await;
        assert_eq!(loaded.source, ConfigSource::Default);
    }

    #[tokio::test]
    async fn test_reads_commented_document() {
        let fs = MemoryFs::with_files([(
            "tsconfig.json",
            r#"{
                // editor project
                "compilerOptions": {
                    "jsx": "preserve", /* keep JSX */
                    "baseUrl": ".",
                    "paths": { "@/*": ["./src/*"] },
                }
            }"#,
        )]);
        let loaded = load_project_config(&fs, "node_modules").await;
        assert_eq!(loaded.source, ConfigSource::Document("tsconfig.json".into()));
        assert_eq!(loaded.options.jsx, JsxEmit::Preserve);
        assert_eq!(loaded.aliases.resolve("@/a/b").as_deref(), Some("src/a/b"));
    }

    #[tokio::test]
    async fn test_jsconfig_is_second_choice() {
        let fs = MemoryFs::with_files([(
            "jsconfig.json",
            r#"{ "compilerOptions": { "checkJs": true } }"#,
        )]);
        let loaded = load_project_config(&fs, "node_modules").await;
        assert_eq!(loaded.source, ConfigSource::Document("jsconfig.json".into()));
        assert!(loaded.options.check_js);
    }

    #[tokio::test]
    async fn test_extends_chain_is_merged() {
        let fs = MemoryFs::with_files([
            (
                "tsconfig.json",
                r#"{ "extends": "./configs/base", "compilerOptions": { "strict": false } }"#,
            ),
            (
                "configs/base.json",
                r#"{ "compilerOptions": { "strict": true, "checkJs": true, "baseUrl": "..", "paths": { "~/*": ["lib/*"] } } }"#,
            ),
        ]);
        let loaded = load_project_config(&fs, "node_modules").await;
        assert!(!loaded.options.strict);
        assert!(loaded.options.check_js);
        assert_eq!(loaded.options.base_url, "");
        assert_eq!(loaded.aliases.resolve("~/x").as_deref(), Some("lib/x"));
    }

    #[tokio::test]
    async fn test_extends_package_and_missing_base() {
        let fs = MemoryFs::with_files([
            (
                "tsconfig.json",
                r#"{ "extends": ["@tsconfig/strictest", "./nope.json"], "compilerOptions": {} }"#,
            ),
            (
                "node_modules/@tsconfig/strictest/tsconfig.json",
                r#"{ "compilerOptions": { "checkJs": true } }"#,
            ),
        ]);
        let loaded = load_project_config(&fs, "node_modules").await;
        assert_eq!(loaded.source, ConfigSource::Document("tsconfig.json".into()));
        assert!(loaded.options.check_js);
    }

    #[tokio::test]
    async fn test_cyclic_extends_terminates() {
        let fs = MemoryFs::with_files([
            ("tsconfig.json", r#"{ "extends": "./a.json", "compilerOptions": { "allowJs": false } }"#),
            ("a.json", r#"{ "extends": "./tsconfig.json" }"#),
        ]);
        let loaded = load_project_config(&fs, "node_modules").await;
        assert!(!loaded.options.allow_js);
    }

    #[test]
    fn test_loader_config_partial_json() {
        let config: LoaderConfig =
            serde_json::from_str(r#"{ "maxSourceDepth": 3, "denylist": ["vendor"] }"#).unwrap();
        assert_eq!(config.max_source_depth, 3);
        assert_eq!(config.max_declaration_size, 512 * 1024);
        assert!(config.is_denylisted("vendor"));
        assert!(!config.is_denylisted("docs"));
    }
}
