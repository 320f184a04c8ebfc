//! Logging setup for the `typefeed` binary.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: &[&str] = &[
    "typefeed_cli",
    "typefeed_loader",
    "typefeed_module",
    "typefeed_tsoptions",
    "typefeed_vfs",
];

/// Directive string enabling `level` for every workspace crate.
pub fn crate_filter(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. Logs go to stderr so the report on stdout
/// stays machine-readable.
///
/// `--verbose` wins over `--quiet`; with neither, `RUST_LOG` is honoured and
/// the default is `info`.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new(crate_filter("debug"))
    } else if quiet {
        EnvFilter::new(crate_filter("error"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(crate_filter("info")))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
