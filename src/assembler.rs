//! Per-package stage sequence.
//!
//! A package moves through parse, version resolution, descriptor lookup and
//! field extraction in that order. The first failing stage ends the
//! sequence; the returned [`PackageFailure`] records how far the package got
//! and why it stopped. Soft decode errors collected along the way are
//! reported whether or not the package completes.

use crate::catalog::{catalog_file, extract_fields, locate_descriptor, parse_catalog_file, resolve_latest};
use crate::error::{PackageError, SoftDecodeError};
use crate::record::PackageRecord;
use crate::report::{PackageScope, Reporter};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One package directory inside an extracted index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageSource {
    pub name: String,
    pub dir: PathBuf,
}

/// Last stage a package reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PackageStage {
    Started,
    SchemaParsed,
    VersionResolved,
    DescriptorLocated,
    FieldsExtracted,
    Complete,
}

impl PackageStage {
    pub fn as_str(self) -> &'static str {
        match self {
            PackageStage::Started => "started",
            PackageStage::SchemaParsed => "schema_parsed",
            PackageStage::VersionResolved => "version_resolved",
            PackageStage::DescriptorLocated => "descriptor_located",
            PackageStage::FieldsExtracted => "fields_extracted",
            PackageStage::Complete => "complete",
        }
    }
}

impl fmt::Display for PackageStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure for a package.
#[derive(Debug, Error)]
#[error("failed after {reached}: {error}")]
pub struct PackageFailure {
    pub reached: PackageStage,
    #[source]
    pub error: PackageError,
}

/// Build the record for one package and report the outcome.
pub fn assemble_package(
    source: &PackageSource,
    catalog: &str,
    reporter: &dyn Reporter,
) -> Result<PackageRecord, PackageFailure> {
    let scope = PackageScope {
        catalog,
        package: &source.name,
    };
    let mut skipped = Vec::new();
    let outcome = run_stages(source, &mut skipped);

    for error in &skipped {
        reporter.skipped(scope, error);
    }
    match &outcome {
        Ok(record) => reporter.completed(scope, record),
        Err(failure) => reporter.failed(scope, failure),
    }
    outcome
}

fn run_stages(
    source: &PackageSource,
    skipped: &mut Vec<SoftDecodeError>,
) -> Result<PackageRecord, PackageFailure> {
    let objects = catalog_file(&source.dir)
        .and_then(|(path, encoding)| parse_catalog_file(&path, encoding, skipped))
        .map_err(failed_at(PackageStage::Started))?;

    let latest = resolve_latest(&objects).map_err(failed_at(PackageStage::SchemaParsed))?;

    let descriptor = locate_descriptor(&objects, &latest.version.to_string(), skipped)
        .map_err(failed_at(PackageStage::VersionResolved))?;

    let fields = extract_fields(&descriptor).map_err(failed_at(PackageStage::DescriptorLocated))?;

    Ok(PackageRecord::new(&source.name, &latest, fields))
}

fn failed_at(reached: PackageStage) -> impl FnOnce(PackageError) -> PackageFailure {
    move |error| PackageFailure { reached, error }
}
