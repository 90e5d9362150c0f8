//! Render a single package directory to stdout.
//!
//! Useful when one package is missing from a rendered index: point this at
//! `raw_data/<index>/<package>` and the record, or the stage that failed, is
//! printed without running the whole poll.

use anyhow::{Context, Result, bail};
use clap::Parser;
use operators_poller::logging::init_logging;
use operators_poller::{LogLevel, PackageSource, TracingReporter, assemble_package};
use std::path::PathBuf;

/// Render one package directory as a JSON record
#[derive(Parser, Debug)]
#[command(name = "render-package", version)]
struct Cli {
    /// Package directory holding catalog.json or catalog.yaml
    package_dir: PathBuf,

    /// Index name used in log lines
    #[arg(long, default_value = "local")]
    catalog: String,

    /// Log level (trace, debug, info, warning, error, critical)
    #[arg(long, env = "LOGLEVEL", default_value = "warning")]
    log_level: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LogLevel::from_name(&cli.log_level));

    if !cli.package_dir.is_dir() {
        bail!("package directory not found: {}", cli.package_dir.display());
    }
    let dir = cli
        .package_dir
        .canonicalize()
        .with_context(|| format!("resolving {}", cli.package_dir.display()))?;
    let Some(name) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
        bail!("cannot derive a package name from {}", dir.display());
    };

    let source = PackageSource { name, dir };
    let record = assemble_package(&source, &cli.catalog, &TracingReporter)
        .with_context(|| format!("rendering package {}", source.name))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
