//! Full poll: extract each configured index image, render its packages, and
//! write `<rendered_dir>/<index>.json`.
//!
//! Package failures are logged and leave the exit code alone; only
//! configuration errors and output that cannot be written exit non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use operators_poller::logging::init_logging;
use operators_poller::{
    CatalogOutcome, ImageExtractor, OcImageExtractor, PollerArgs, TracingReporter, run_poller,
};
use std::env;
use std::time::Instant;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let started = Instant::now();
    let cwd = env::current_dir().context("resolving current directory")?;
    let config = PollerArgs::parse().into_config(&cwd)?;
    init_logging(config.log_level);

    let extractor = if config.skip_extract {
        None
    } else {
        Some(OcImageExtractor::from_path()?)
    };
    let extractor_ref = extractor.as_ref().map(|e| e as &dyn ImageExtractor);

    let runs = run_poller(&config, extractor_ref, &TracingReporter)?;
    for run in &runs {
        match &run.outcome {
            CatalogOutcome::Rendered { summary, path } => tracing::info!(
                catalog = run.index.name(),
                rendered = summary.rendered,
                failed = summary.failed,
                "wrote {}",
                path.display()
            ),
            CatalogOutcome::Skipped { reason } => {
                tracing::warn!(catalog = run.index.name(), "no output written: {reason}")
            }
        }
    }
    tracing::info!("Finished in {:.1}s.", started.elapsed().as_secs_f64());
    Ok(())
}
