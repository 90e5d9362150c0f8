//! Shared library for the operators poller.
//!
//! The crate turns extracted file-based catalog images into one JSON summary
//! per index. `catalog` holds the declarative-config interpreter stages,
//! `assembler` runs them for a single package, and `poller` drives whole
//! catalogs. The binaries under `src/bin/` are thin wrappers over these
//! functions.

pub mod acquire;
pub mod assembler;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod poller;
pub mod record;
pub mod report;

pub use acquire::{ImageExtractor, OcImageExtractor};
pub use assembler::{PackageFailure, PackageSource, PackageStage, assemble_package};
pub use catalog::{
    CatalogEncoding, CatalogIndex, Descriptor, DescriptorFields, LatestVersion, SchemaKind,
    SchemaObject,
};
pub use config::{LogLevel, PollerArgs, PollerConfig};
pub use error::{MissingDescriptor, PackageError, SoftDecodeError};
pub use output::{render_listing, validate_listing, write_listing};
pub use poller::{CatalogOutcome, CatalogRun, CatalogSummary, discover_packages, process_catalog, run_poller};
pub use record::{CatalogListing, PackageRecord};
pub use report::{PackageScope, RecordingReporter, ReportEvent, Reporter, TracingReporter};

/// Split comma- or whitespace-delimited configuration lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
