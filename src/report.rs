//! Reporting seam between the interpreter and the process logger.
//!
//! Interpreter code never logs directly. It receives a `&dyn Reporter` and
//! tells it about skipped documents, failed packages, and finished records.
//! The binaries pass a [`TracingReporter`]; tests pass [`RecordingReporter`]
//! and assert on what was reported.

use crate::assembler::{PackageFailure, PackageStage};
use crate::error::SoftDecodeError;
use crate::record::PackageRecord;
use std::sync::Mutex;

/// Which package (in which index) an event belongs to.
#[derive(Clone, Copy, Debug)]
pub struct PackageScope<'a> {
    pub catalog: &'a str,
    pub package: &'a str,
}

pub trait Reporter: Send + Sync {
    /// A document or property was skipped; the package continues.
    fn skipped(&self, scope: PackageScope<'_>, error: &SoftDecodeError);

    /// The package produced no record.
    fn failed(&self, scope: PackageScope<'_>, failure: &PackageFailure);

    /// The package produced a record.
    fn completed(&self, scope: PackageScope<'_>, record: &PackageRecord);
}

/// Forwards events to `tracing` with package and catalog fields attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn skipped(&self, scope: PackageScope<'_>, error: &SoftDecodeError) {
        tracing::warn!(
            catalog = scope.catalog,
            package = scope.package,
            "skipped: {error}"
        );
    }

    fn failed(&self, scope: PackageScope<'_>, failure: &PackageFailure) {
        tracing::error!(
            catalog = scope.catalog,
            package = scope.package,
            stage = failure.reached.as_str(),
            "package omitted: {}",
            failure.error
        );
    }

    fn completed(&self, scope: PackageScope<'_>, record: &PackageRecord) {
        tracing::debug!(
            catalog = scope.catalog,
            package = scope.package,
            version = record.latest_version.as_str(),
            channel = record.latest_channel.as_str(),
            stage = PackageStage::Complete.as_str(),
            "info extracted"
        );
    }
}

/// One event captured by [`RecordingReporter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportEvent {
    Skipped { package: String, detail: String },
    Failed { package: String, detail: String },
    Completed { package: String },
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<ReportEvent> {
        self.lock().clone()
    }

    fn push(&self, event: ReportEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReportEvent>> {
        self.events.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl Reporter for RecordingReporter {
    fn skipped(&self, scope: PackageScope<'_>, error: &SoftDecodeError) {
        self.push(ReportEvent::Skipped {
            package: scope.package.to_string(),
            detail: error.to_string(),
        });
    }

    fn failed(&self, scope: PackageScope<'_>, failure: &PackageFailure) {
        self.push(ReportEvent::Failed {
            package: scope.package.to_string(),
            detail: failure.error.to_string(),
        });
    }

    fn completed(&self, scope: PackageScope<'_>, _record: &PackageRecord) {
        self.push(ReportEvent::Completed {
            package: scope.package.to_string(),
        });
    }
}
