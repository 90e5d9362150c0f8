//! Run configuration.
//!
//! Every flag has an environment fallback so the poller can run unattended
//! from a cron job or container. Relative directories are resolved once here
//! against the caller's working directory; nothing downstream depends on the
//! process CWD.

use crate::catalog::{CatalogIndex, DEFAULT_REGISTRY, DEFAULT_TAG};
use crate::split_list;
use anyhow::{Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Indexes polled when none are configured.
pub const DEFAULT_INDEXES: &[&str] = &[
    "redhat-operator-index",
    "community-operator-index",
    "certified-operator-index",
    "redhat-marketplace-index",
];

const MAX_WORKERS: usize = 64;

/// Command-line surface of `operators-poller`.
#[derive(Parser, Debug, Clone)]
#[command(name = "operators-poller", version)]
#[command(about = "Render operator metadata from file-based catalog index images")]
pub struct PollerArgs {
    /// Index image names; repeat the flag or pass a comma/space separated list
    #[arg(long = "index", value_name = "NAME", env = "POLLER_INDEXES")]
    pub indexes: Vec<String>,

    /// Index image tag
    #[arg(long, env = "POLLER_TAG", default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Registry namespace holding the index images
    #[arg(long, env = "POLLER_REGISTRY", default_value = DEFAULT_REGISTRY)]
    pub registry: String,

    /// Where extracted catalog trees are stored, one directory per index
    #[arg(long, env = "POLLER_RAW_DATA_DIR", default_value = "raw_data")]
    pub raw_data_dir: PathBuf,

    /// Where rendered `<index>.json` files are written
    #[arg(long, env = "POLLER_RENDERED_DIR", default_value = "rendered_info")]
    pub rendered_dir: PathBuf,

    /// Package worker threads per index (default: available parallelism)
    #[arg(long, env = "POLLER_WORKERS")]
    pub workers: Option<usize>,

    /// Reuse the existing raw-data directories instead of extracting images
    #[arg(long, env = "POLLER_SKIP_EXTRACT")]
    pub skip_extract: bool,

    /// Log level (trace, debug, info, warning, error, critical)
    #[arg(long, env = "LOGLEVEL")]
    pub log_level: Option<String>,
}

/// Fully resolved configuration for one run.
#[derive(Clone, Debug)]
pub struct PollerConfig {
    pub indexes: Vec<CatalogIndex>,
    pub raw_data_dir: PathBuf,
    pub rendered_dir: PathBuf,
    pub workers: usize,
    pub skip_extract: bool,
    pub log_level: LogLevel,
}

impl PollerArgs {
    /// Resolve names, paths and defaults. `cwd` anchors relative directories.
    pub fn into_config(self, cwd: &Path) -> Result<PollerConfig> {
        let mut names: Vec<String> = self.indexes.iter().flat_map(|raw| split_list(raw)).collect();
        if names.is_empty() {
            names = DEFAULT_INDEXES.iter().map(|name| name.to_string()).collect();
        }

        let mut indexes: Vec<CatalogIndex> = Vec::new();
        for name in &names {
            let index = CatalogIndex::new(name, &self.registry, &self.tag)?;
            if indexes.contains(&index) {
                bail!("index {name} listed more than once");
            }
            indexes.push(index);
        }

        Ok(PollerConfig {
            indexes,
            raw_data_dir: absolutize(cwd, &self.raw_data_dir),
            rendered_dir: absolutize(cwd, &self.rendered_dir),
            workers: resolve_workers(self.workers),
            skip_extract: self.skip_extract,
            log_level: self
                .log_level
                .as_deref()
                .map(LogLevel::from_name)
                .unwrap_or_default(),
        })
    }
}

impl PollerConfig {
    /// Raw-data directory for one index.
    pub fn index_dir(&self, index: &CatalogIndex) -> PathBuf {
        self.raw_data_dir.join(index.name())
    }
}

/// Log verbosity accepted from flags and `LOGLEVEL`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Map a level name; `critical` folds into `error`, unknown names into `info`.
    pub fn from_name(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" | "critical" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

fn resolve_workers(explicit: Option<usize>) -> usize {
    if let Some(value) = explicit {
        return value.clamp(1, MAX_WORKERS);
    }

    std::thread::available_parallelism()
        .map_or(4, |v| v.get().max(1))
        .min(MAX_WORKERS)
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
