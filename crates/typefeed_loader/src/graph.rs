//! Recursive source graph loading.
//!
//! Starting from one file, register it and follow every relative or aliased
//! import it contains. The corpus doubles as the visited set, and an explicit
//! depth bounds each chain, so cycles and diamonds terminate without any
//! further bookkeeping. External imports are only recorded here; their
//! declarations are loaded in bulk by [`Session::load_discovered_packages`].

use futures::future::BoxFuture;
use tracing::{debug, trace};

use typefeed_module::{classify, package_name, SpecifierKind, ROOT_RELATIVE_MARKER};
use typefeed_tspath::{
    get_directory_path, join_normalized, probe_candidates, to_project_path, Extension,
};
use typefeed_vfs::Filesystem;

use crate::engine::TypeEngine;
use crate::outcome::{LoadOutcome, Probe, SkipReason};
use crate::session::Session;

impl<F: Filesystem, E: TypeEngine> Session<F, E> {
    /// Load `path` and, recursively, its local imports.
    ///
    /// `path` may be a bare stem; it is probed for a concrete file. Requests
    /// at or beyond the depth bound are dropped, so a chain registers at
    /// most `max_source_depth` files counting the one at depth 0.
    pub async fn load_source(&mut self, path: &str, depth: usize) -> LoadOutcome {
        self.load_source_at(to_project_path(path), depth).await
    }

    /// First candidate for `stem` that exists.
    pub async fn probe(&self, stem: &str) -> Probe {
        probe_fs(self.fs.as_ref(), stem).await
    }

    fn load_source_at(&mut self, stem: String, depth: usize) -> BoxFuture<'_, LoadOutcome> {
        Box::pin(async move {
            if depth >= self.config.max_source_depth {
                trace!(path = %stem, depth, "source depth bound reached");
                return LoadOutcome::Skipped(SkipReason::DepthExceeded);
            }
            if self.corpus.contains(&stem) {
                return LoadOutcome::AlreadyLoaded;
            }

            let path = match probe_fs(self.fs.as_ref(), &stem).await {
                Probe::Found(path) => path,
                Probe::NotFound => {
                    debug!(path = %stem, "unresolved source");
                    return LoadOutcome::NotFound;
                }
            };
            if self.corpus.contains(&path) {
                return LoadOutcome::AlreadyLoaded;
            }

            let content = match self.fs.read_file(&path).await {
                Ok(content) => content,
                Err(err) => {
                    debug!(path = %path, error = %err, "source read failed");
                    return LoadOutcome::NotFound;
                }
            };
            self.register(&path, &content);

            if is_scannable(&path) {
                let importer_dir = get_directory_path(&path);
                let specifiers = self.extractor.extract(&content);
                for specifier in specifiers {
                    self.follow(&importer_dir, &specifier, depth).await;
                }
            }

            LoadOutcome::Loaded(path)
        })
    }

    async fn follow(&mut self, importer_dir: &str, specifier: &str, depth: usize) {
        let kind = classify(specifier, &self.aliases);
        match kind {
            SpecifierKind::Relative => {
                let target = join_normalized(importer_dir, specifier);
                self.load_source_at(target, depth + 1).await;
            }
            SpecifierKind::Aliased => {
                let candidates = match self.aliases.candidates(specifier) {
                    Some(candidates) => candidates,
                    None => vec![to_project_path(
                        specifier.trim_start_matches(ROOT_RELATIVE_MARKER),
                    )],
                };
                for stem in candidates {
                    if self.load_source_at(stem, depth + 1).await != LoadOutcome::NotFound {
                        break;
                    }
                }
            }
            SpecifierKind::External => {
                let name = package_name(specifier);
                if !name.is_empty() && !self.loaded_packages.contains(name) {
                    self.discovered_packages.insert(name.to_string());
                }
            }
        }
    }
}

async fn probe_fs<F: Filesystem>(fs: &F, stem: &str) -> Probe {
    for candidate in probe_candidates(stem) {
        if fs.is_file(&candidate).await {
            return Probe::Found(candidate);
        }
        trace!(candidate = %candidate, "probe miss");
    }
    Probe::NotFound
}

/// JSON modules are registered but never scanned for imports.
fn is_scannable(path: &str) -> bool {
    Extension::from_path(path).is_some_and(|ext| ext != Extension::Json)
}
