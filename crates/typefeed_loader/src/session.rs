//! The resolver session.

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use typefeed_module::{AliasResolver, PatternExtractor, SpecifierExtractor};
use typefeed_tsoptions::CompilerOptions;
use typefeed_tspath::{to_file_uri, to_project_path, Extension};
use typefeed_vfs::Filesystem;

use crate::config::{load_project_config, ConfigSource, LoadedConfig, LoaderConfig};
use crate::corpus::Corpus;
use crate::engine::TypeEngine;
use crate::outcome::LoadOutcome;

/// Lifecycle of a session. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionPhase {
    Uninitialized,
    ConfigLoaded,
    Ready,
}

/// State of one editor instance: its configuration, what has been fed to
/// the engine so far, and which packages have been handled.
///
/// Operations take `&mut self`, so loads within a session never overlap.
pub struct Session<F, E> {
    pub(crate) fs: Arc<F>,
    pub(crate) engine: E,
    pub(crate) config: LoaderConfig,
    pub(crate) extractor: Box<dyn SpecifierExtractor>,
    pub(crate) options: Arc<CompilerOptions>,
    pub(crate) aliases: AliasResolver,
    config_source: ConfigSource,
    pub(crate) corpus: Corpus,
    pub(crate) loaded_packages: FxHashSet<String>,
    /// External package names seen by the graph loader, not yet loaded.
    pub(crate) discovered_packages: IndexSet<String>,
    phase: SessionPhase,
}

impl<F: Filesystem, E: TypeEngine> Session<F, E> {
    pub fn new(fs: Arc<F>, engine: E) -> Self {
        let defaults = LoadedConfig::default_config();
        Self {
            fs,
            engine,
            config: LoaderConfig::default(),
            extractor: Box::new(PatternExtractor),
            options: defaults.options,
            aliases: defaults.aliases,
            config_source: defaults.source,
            corpus: Corpus::new(),
            loaded_packages: FxHashSet::default(),
            discovered_packages: IndexSet::new(),
            phase: SessionPhase::Uninitialized,
        }
    }

    pub fn with_loader_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the lexical specifier extractor.
    pub fn with_extractor(mut self, extractor: Box<dyn SpecifierExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn options(&self) -> &Arc<CompilerOptions> {
        &self.options
    }

    pub fn aliases(&self) -> &AliasResolver {
        &self.aliases
    }

    pub fn config_source(&self) -> &ConfigSource {
        &self.config_source
    }

    pub fn loader_config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Package names waiting for [`Session::load_discovered_packages`].
    pub fn discovered_packages(&self) -> impl Iterator<Item = &str> {
        self.discovered_packages.iter().map(String::as_str)
    }

    pub fn is_package_loaded(&self, name: &str) -> bool {
        self.loaded_packages.contains(name)
    }

    /// End the session, handing back the engine.
    pub fn teardown(self) -> E {
        info!(files = self.corpus.len(), "session torn down");
        self.engine
    }

    fn advance(&mut self, phase: SessionPhase) {
        if phase > self.phase {
            debug!(from = ?self.phase, to = ?phase, "session phase");
            self.phase = phase;
        }
    }

    /// Read the project configuration and hand the options to the engine.
    /// Runs once per session.
    pub async fn configure(&mut self) {
        if self.phase != SessionPhase::Uninitialized {
            return;
        }

        let loaded = load_project_config(self.fs.as_ref(), &self.config.package_root).await;
        self.options = loaded.options;
        self.aliases = loaded.aliases;
        self.config_source = loaded.source;
        self.engine.set_compiler_options(Arc::clone(&self.options));
        self.advance(SessionPhase::ConfigLoaded);
    }

    /// Bring the session to `Ready`: configuration, bulk package load, then
    /// the entry point and the packages it pulls in.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self, entry: &str) -> LoadOutcome {
        self.configure().await;
        let preloaded = self.preload_packages().await;
        let outcome = self.load_source(entry, 0).await;
        let discovered = self.load_discovered_packages().await;
        self.advance(SessionPhase::Ready);
        info!(
            preloaded,
            discovered,
            files = self.corpus.len(),
            "session ready"
        );
        outcome
    }

    /// Follow the imports of a newly active file.
    pub async fn activate(&mut self, path: &str) -> LoadOutcome {
        self.configure().await;
        self.load_source(path, 0).await
    }

    /// Feed a file to the engine unless it was fed before. Returns whether
    /// this call registered it.
    ///
    /// Project-local scripts are also opened as live models.
    pub fn register(&mut self, path: &str, content: &str) -> bool {
        let path = to_project_path(path);
        if self.corpus.contains(&path) {
            return false;
        }

        let uri = to_file_uri(&path);
        self.engine.add_extra_source(&uri, content);
        if self.is_live_source(&path) {
            self.engine.open_model(&uri, content);
        }
        debug!(path = %path, bytes = content.len(), "registered");
        self.corpus.insert(path, content.to_string())
    }

    fn is_live_source(&self, path: &str) -> bool {
        let editable = Extension::from_path(path).is_some_and(|ext| ext.is_editable_source());
        let root = self.config.package_root.trim_end_matches('/');
        let in_packages = path == root
            || path
                .strip_prefix(root)
                .is_some_and(|rest| rest.starts_with('/'));
        editable && !in_packages
    }
}
