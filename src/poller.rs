//! Catalog- and run-level orchestration.
//!
//! A catalog is one extracted index directory whose immediate
//! sub-directories are packages. Packages are assembled on a bounded pool of
//! scoped worker threads; each result lands in the slot of its discovery
//! position, so output order never depends on thread timing. Catalogs in a
//! run are handled one after another.

use crate::acquire::ImageExtractor;
use crate::assembler::{PackageSource, assemble_package};
use crate::catalog::CatalogIndex;
use crate::config::PollerConfig;
use crate::output::write_listing;
use crate::record::CatalogListing;
use crate::report::Reporter;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

/// Package counts for one processed catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    pub discovered: usize,
    pub rendered: usize,
    pub failed: usize,
}

/// What happened to one index during a run.
#[derive(Debug)]
pub enum CatalogOutcome {
    Rendered {
        summary: CatalogSummary,
        path: PathBuf,
    },
    /// Acquisition or discovery failed; no file was written for this index.
    Skipped { reason: String },
}

#[derive(Debug)]
pub struct CatalogRun {
    pub index: CatalogIndex,
    pub outcome: CatalogOutcome,
}

/// List package directories in directory-listing order.
///
/// Plain files at the catalog root are ignored.
pub fn discover_packages(index_dir: &Path) -> Result<Vec<PackageSource>> {
    let entries =
        fs::read_dir(index_dir).with_context(|| format!("listing {}", index_dir.display()))?;
    let mut packages = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", index_dir.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => packages.push(PackageSource { name, dir: path }),
            Err(raw) => tracing::warn!("skipping package directory with non UTF-8 name {raw:?}"),
        }
    }
    Ok(packages)
}

/// Assemble every package of one catalog.
///
/// Failed packages are reported through `reporter` and left out of the
/// listing; they never fail the catalog.
pub fn process_catalog(
    index: &CatalogIndex,
    index_dir: &Path,
    workers: usize,
    reporter: &dyn Reporter,
) -> Result<(CatalogListing, CatalogSummary)> {
    let packages = discover_packages(index_dir)?;
    let slots = run_pool(&packages, workers, |source| {
        assemble_package(source, index.name(), reporter).ok()
    });

    let operators_list: Vec<_> = slots.into_iter().flatten().collect();
    let summary = CatalogSummary {
        discovered: packages.len(),
        rendered: operators_list.len(),
        failed: packages.len() - operators_list.len(),
    };
    tracing::info!(
        catalog = index.name(),
        discovered = summary.discovered,
        rendered = summary.rendered,
        failed = summary.failed,
        "Finished processing index image: {}.",
        index.name()
    );
    Ok((CatalogListing { operators_list }, summary))
}

/// Acquire, process and write every configured index.
///
/// Only output-writing errors abort the run; a catalog that cannot be
/// extracted or listed is logged and recorded as skipped.
pub fn run_poller(
    config: &PollerConfig,
    extractor: Option<&dyn ImageExtractor>,
    reporter: &dyn Reporter,
) -> Result<Vec<CatalogRun>> {
    let mut runs = Vec::with_capacity(config.indexes.len());
    for index in &config.indexes {
        let index_dir = config.index_dir(index);

        if let Some(extractor) = extractor.filter(|_| !config.skip_extract) {
            if let Err(err) = extractor.extract(index, &index_dir) {
                tracing::error!(catalog = index.name(), "extraction failed: {err:#}");
                runs.push(CatalogRun {
                    index: index.clone(),
                    outcome: CatalogOutcome::Skipped {
                        reason: format!("{err:#}"),
                    },
                });
                continue;
            }
        }

        let (listing, summary) = match process_catalog(index, &index_dir, config.workers, reporter) {
            Ok(processed) => processed,
            Err(err) => {
                tracing::error!(catalog = index.name(), "cannot process catalog: {err:#}");
                runs.push(CatalogRun {
                    index: index.clone(),
                    outcome: CatalogOutcome::Skipped {
                        reason: format!("{err:#}"),
                    },
                });
                continue;
            }
        };

        let path = write_listing(&config.rendered_dir, index, &listing)?;
        tracing::debug!(catalog = index.name(), "wrote {}", path.display());
        runs.push(CatalogRun {
            index: index.clone(),
            outcome: CatalogOutcome::Rendered { summary, path },
        });
    }
    Ok(runs)
}

/// Run `work` over `items` on up to `workers` scoped threads.
///
/// Slot `i` of the result holds the output for `items[i]`.
fn run_pool<T, R, F>(items: &[T], workers: usize, work: F) -> Vec<Option<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Option<R> + Sync,
{
    let mut slots: Vec<Option<R>> = (0..items.len()).map(|_| None).collect();
    if items.is_empty() {
        return slots;
    }

    let next = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, Option<R>)>();
    thread::scope(|scope| {
        for _ in 0..workers.clamp(1, items.len()) {
            let tx = tx.clone();
            let next = &next;
            let work = &work;
            scope.spawn(move || {
                loop {
                    let position = next.fetch_add(1, Ordering::Relaxed);
                    let Some(item) = items.get(position) else {
                        break;
                    };
                    if tx.send((position, work(item))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);
        for (position, result) in rx {
            slots[position] = result;
        }
    });
    slots
}
