//! The seam to the type-checking engine.

use std::sync::Arc;
use typefeed_tsoptions::CompilerOptions;

/// An in-process type-checking engine fed by the resolver.
///
/// The resolver calls `add_extra_source` exactly once per registered URI.
/// `open_model` is called in addition for project-local editable sources.
pub trait TypeEngine: Send {
    fn set_compiler_options(&mut self, options: Arc<CompilerOptions>);

    fn add_extra_source(&mut self, uri: &str, content: &str);

    fn open_model(&mut self, uri: &str, content: &str);
}

/// Engine that only records what it was given.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub options: Option<Arc<CompilerOptions>>,
    pub options_updates: usize,
    pub extra_sources: Vec<(String, String)>,
    pub models: Vec<(String, String)>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// URIs passed to `add_extra_source`, in call order.
    pub fn source_uris(&self) -> Vec<&str> {
        self.extra_sources.iter().map(|(uri, _)| uri.as_str()).collect()
    }

    /// URIs passed to `open_model`, in call order.
    pub fn model_uris(&self) -> Vec<&str> {
        self.models.iter().map(|(uri, _)| uri.as_str()).collect()
    }
}

impl TypeEngine for RecordingEngine {
    fn set_compiler_options(&mut self, options: Arc<CompilerOptions>) {
        self.options = Some(options);
        self.options_updates += 1;
    }

    fn add_extra_source(&mut self, uri: &str, content: &str) {
        self.extra_sources.push((uri.to_string(), content.to_string()));
    }

    fn open_model(&mut self, uri: &str, content: &str) {
        self.models.push((uri.to_string(), content.to_string()));
    }
}
