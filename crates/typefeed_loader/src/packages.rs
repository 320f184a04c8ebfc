//! Package type loading.
//!
//! A package's declarations come from its type stubs when a stub directory
//! exists under one of the type roots, and otherwise from the package's own
//! directory: the manifest's types entry plus a shallow crawl.

use tracing::{debug, instrument};

use typefeed_module::{package_from_type_stub, parse_package_json, type_stub_name};
use typefeed_tspath::{has_known_suffix, join_normalized, strip_current_directory_prefix};
use typefeed_vfs::Filesystem;

use crate::engine::TypeEngine;
use crate::outcome::PackageOutcome;
use crate::session::Session;

const MANIFEST_FILE: &str = "package.json";
const DEFAULT_TYPES_ENTRY: &str = "index.d.ts";

impl<F: Filesystem, E: TypeEngine> Session<F, E> {
    /// Load the declarations of one package. Each name is handled at most
    /// once per session, whatever the outcome.
    #[instrument(skip(self))]
    pub async fn load_package(&mut self, name: &str) -> PackageOutcome {
        if !self.loaded_packages.insert(name.to_string()) {
            return PackageOutcome::AlreadyLoaded;
        }
        self.discovered_packages.shift_remove(name);

        let stub = type_stub_name(name);
        let type_roots = self.options.type_roots.clone();
        for root in &type_roots {
            let stub_dir = join_normalized(root, &stub);
            if self.fs.exists(&stub_dir).await {
                let stats = self.crawl(&stub_dir, self.config.type_stub_depth).await;
                debug!(dir = %stub_dir, registered = stats.registered, "loaded type stubs");
                return PackageOutcome::TypeStubs {
                    registered: stats.registered,
                };
            }
        }

        let package_dir = join_normalized(&self.config.package_root, name);
        if !self.fs.exists(&package_dir).await {
            debug!("package not installed");
            return PackageOutcome::NotFound;
        }

        let before = self.corpus.len();
        let entry = types_entry(self.fs.as_ref(), &package_dir).await;
        if self.fs.exists(&entry).await {
            match self.fs.read_file(&entry).await {
                Ok(content) => {
                    self.register(&entry, &content);
                }
                Err(err) => debug!(path = %entry, error = %err, "types entry read failed"),
            }
        }
        self.crawl(&package_dir, self.config.package_depth).await;

        let registered = self.corpus.len() - before;
        debug!(dir = %package_dir, registered, "loaded package declarations");
        PackageOutcome::Manifest { registered }
    }

    /// Session-start bulk load: the priority packages, then every package
    /// with stubs under a type root. Returns the number of files registered.
    pub async fn preload_packages(&mut self) -> usize {
        let before = self.corpus.len();

        let priority = self.config.priority_packages.clone();
        for name in &priority {
            self.load_package(name).await;
        }

        let type_roots = self.options.type_roots.clone();
        for root in &type_roots {
            let entries = match self.fs.read_dir(root).await {
                Ok(entries) => entries,
                Err(err) => {
                    debug!(dir = %root, error = %err, "type root not listable");
                    continue;
                }
            };
            for entry in entries {
                if !entry.is_directory || entry.name.starts_with('.') {
                    continue;
                }
                let name = package_from_type_stub(&entry.name);
                self.load_package(&name).await;
            }
        }

        self.corpus.len() - before
    }

    /// Load every package recorded by the graph loader since the last call.
    /// Returns the number of files registered.
    pub async fn load_discovered_packages(&mut self) -> usize {
        let mut registered = 0;
        while let Some(name) = self.discovered_packages.shift_remove_index(0) {
            registered += self.load_package(&name).await.registered();
        }
        registered
    }
}

/// The declaration file a package's manifest points at, or the
/// conventional index when it names none.
async fn types_entry<F: Filesystem>(fs: &F, package_dir: &str) -> String {
    let manifest_path = join_normalized(package_dir, MANIFEST_FILE);
    let declared = match fs.read_file(&manifest_path).await {
        Ok(content) => parse_package_json(&content)
            .and_then(|manifest| manifest.types_entry().map(str::to_string)),
        Err(err) => {
            debug!(path = %manifest_path, error = %err, "no readable manifest");
            None
        }
    };

    match declared {
        Some(entry) => {
            let entry = join_normalized(package_dir, strip_current_directory_prefix(&entry));
            if has_known_suffix(&entry) {
                entry
            } else {
                format!("{}.d.ts", entry)
            }
        }
        None => join_normalized(package_dir, DEFAULT_TYPES_ENTRY),
    }
}
