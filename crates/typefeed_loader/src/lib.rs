//! typefeed_loader: On-demand loading of sources and declarations.
//!
//! A [`Session`] discovers the files an active source file depends on and
//! feeds them, once each, into a [`TypeEngine`]:
//!
//! - the project configuration is read once ([`config`]);
//! - relative and aliased imports are followed recursively from the active
//!   file, bounded by depth ([`graph`]);
//! - external packages contribute their declaration files, from type stubs
//!   or from the package itself ([`packages`], [`crawl`]).
//!
//! Nothing here is fatal. Misses, skipped files and I/O failures come back as
//! tagged [`outcome`] values and are logged with `tracing`.

pub mod config;
pub mod corpus;
pub mod crawl;
pub mod engine;
pub mod graph;
pub mod outcome;
pub mod packages;
pub mod session;

pub use config::{load_project_config, ConfigSource, LoadedConfig, LoaderConfig};
pub use corpus::Corpus;
pub use engine::{RecordingEngine, TypeEngine};
pub use outcome::{CrawlStats, LoadOutcome, PackageOutcome, Probe, SkipReason};
pub use session::{Session, SessionPhase};
pub use typefeed_tsoptions::CompilerOptions;
