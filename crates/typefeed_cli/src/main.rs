//! typefeed: Resolve what a type checker needs for one file.
//!
//! Usage:
//!   typefeed [options] <ENTRY> [ACTIVATE...]
//!
//! Runs a resolver session against a project directory and reports every
//! file it would hand to the type-checking engine.

mod logger;

use clap::Parser as ClapParser;
use miette::{miette, IntoDiagnostic, Result, WrapErr};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use typefeed_loader::{CompilerOptions, ConfigSource, LoaderConfig, RecordingEngine, Session};
use typefeed_tspath::to_file_uri;
use typefeed_vfs::NativeFs;

#[derive(ClapParser, Debug)]
#[command(name = "typefeed", about = "On-demand type declaration resolver", version)]
struct Cli {
    /// File the session starts from, relative to the project root.
    #[arg(value_name = "ENTRY")]
    entry: String,

    /// Files activated after the session is ready, in order.
    #[arg(value_name = "ACTIVATE")]
    activate: Vec<String>,

    /// Project root directory.
    #[arg(short = 'p', long = "project", default_value = ".")]
    project: PathBuf,

    /// JSON file with loader settings.
    #[arg(long = "loader-config")]
    loader_config: Option<PathBuf>,

    /// Files registered along one import chain.
    #[arg(long = "max-depth")]
    max_depth: Option<usize>,

    /// Declaration files of this many bytes or more are skipped.
    #[arg(long = "max-declaration-size")]
    max_declaration_size: Option<usize>,

    /// Skip the session-start package load.
    #[arg(long = "no-priority-packages")]
    no_priority_packages: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Debug logging.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Errors only.
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Disable colored log output.
    #[arg(long = "no-color")]
    no_color: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    config: Option<&'a str>,
    compiler_options: &'a CompilerOptions,
    files: Vec<FileReport<'a>>,
}

#[derive(Debug, Serialize)]
struct FileReport<'a> {
    path: &'a str,
    bytes: usize,
    model: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet, cli.no_color);

    if !cli.project.is_dir() {
        return Err(miette!(
            "project root {} is not a directory",
            cli.project.display()
        ));
    }

    let config = loader_config(&cli)?;
    let fs = Arc::new(NativeFs::new(&cli.project));
    let mut session = Session::new(fs, RecordingEngine::new()).with_loader_config(config);

    let outcome = session.initialize(&cli.entry).await;
    info!(entry = %cli.entry, ?outcome, "entry loaded");

    for path in &cli.activate {
        let outcome = session.activate(path).await;
        info!(path = %path, ?outcome, "activated");
    }
    session.load_discovered_packages().await;

    print_report(&session, cli.json)
}

/// Loader settings from `--loader-config`, then the individual flags.
fn loader_config(cli: &Cli) -> Result<LoaderConfig> {
    let mut config = match &cli.loader_config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text)
                .into_diagnostic()
                .wrap_err_with(|| format!("parsing {}", path.display()))?
        }
        None => LoaderConfig::default(),
    };

    if let Some(depth) = cli.max_depth {
        config.max_source_depth = depth;
    }
    if let Some(size) = cli.max_declaration_size {
        config.max_declaration_size = size;
    }
    if cli.no_priority_packages {
        config.priority_packages.clear();
    }
    Ok(config)
}

fn print_report(session: &Session<NativeFs, RecordingEngine>, json: bool) -> Result<()> {
    let models = session.engine().model_uris();
    let config = match session.config_source() {
        ConfigSource::Document(path) => Some(path.as_str()),
        ConfigSource::Default => None,
    };

    let files: Vec<FileReport<'_>> = session
        .corpus()
        .iter()
        .map(|(path, content)| FileReport {
            path,
            bytes: content.len(),
            model: models.contains(&to_file_uri(path).as_str()),
        })
        .collect();

    if json {
        let report = Report {
            config,
            compiler_options: session.options().as_ref(),
            files,
        };
        let text = serde_json::to_string_pretty(&report).into_diagnostic()?;
        println!("{}", text);
        return Ok(());
    }

    println!("config: {}", config.unwrap_or("(defaults)"));
    for file in &files {
        let marker = if file.model { "*" } else { " " };
        println!("{} {:>8}  {}", marker, file.bytes, file.path);
    }
    println!("{} files", files.len());
    Ok(())
}
