//! Tagged results of resolver operations.
//!
//! None of these are errors. Misses, skips and I/O failures are ordinary
//! outcomes that only reduce how much type information the engine sees.

/// Why a file or directory was passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The recursion bound was reached.
    DepthExceeded,
    /// A declaration file at or above the size threshold.
    TooLarge { size: usize },
    /// Name starts with `.`.
    Hidden,
    /// Directory name is on the crawl denylist.
    Denylisted,
}

/// Result of loading one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file at this path was registered.
    Loaded(String),
    /// The path was already in the corpus.
    AlreadyLoaded,
    /// No probe candidate exists or the file could not be read.
    NotFound,
    Skipped(SkipReason),
}

/// Result of probing the candidates for a path stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Found(String),
    NotFound,
}

/// Where a package's type information came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// Crawled a type-stub directory.
    TypeStubs { registered: usize },
    /// Used the package's own manifest and directory.
    Manifest { registered: usize },
    /// The package was handled earlier in this session.
    AlreadyLoaded,
    /// Neither location exists.
    NotFound,
}

impl PackageOutcome {
    pub fn registered(&self) -> usize {
        match self {
            PackageOutcome::TypeStubs { registered } | PackageOutcome::Manifest { registered } => {
                *registered
            }
            PackageOutcome::AlreadyLoaded | PackageOutcome::NotFound => 0,
        }
    }
}

/// Tally of a declaration directory crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub registered: usize,
    pub skipped: Vec<(String, SkipReason)>,
    /// Entries whose listing or read failed.
    pub failed: usize,
}
