//! Error taxonomy for the catalog interpreter.
//!
//! `PackageError` is fatal to one package and is caught at the assembler
//! boundary; `SoftDecodeError` is recovered where it happens and only
//! reported. Glue code outside the interpreter keeps using `anyhow`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure that stops a single package from producing a record.
#[derive(Debug, Error)]
pub enum PackageError {
    /// The package directory has no usable catalog file, or it could not be read.
    #[error("cannot read catalog for package at {}: {detail}", .path.display())]
    Io { path: PathBuf, detail: String },

    /// The catalog file could not be split into schema documents.
    #[error("catalog file {} is not parsable: {detail}", .path.display())]
    Format { path: PathBuf, detail: String },

    /// No channel entry in any channel carries a valid semantic version.
    #[error("no channel entry yields a valid semantic version")]
    VersionResolution,

    /// The bundle for the resolved version, or its descriptor payload, is missing.
    #[error("descriptor for version {version} not found: {reason}")]
    DescriptorNotFound {
        version: String,
        reason: MissingDescriptor,
    },

    /// A field the record cannot be built without is absent from the descriptor.
    #[error("descriptor is missing required field {field}")]
    RequiredFieldMissing { field: &'static str },
}

/// Why the bundle locator came back empty-handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingDescriptor {
    NoMatchingBundle,
    NoClusterServiceVersion,
}

impl fmt::Display for MissingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingDescriptor::NoMatchingBundle => f.write_str("no bundle name ends with the version"),
            MissingDescriptor::NoClusterServiceVersion => {
                f.write_str("no matching bundle embeds a ClusterServiceVersion object")
            }
        }
    }
}

/// Recoverable decode problem; the surrounding scan skips the item and continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SoftDecodeError {
    #[error("YAML document #{index} skipped: {detail}")]
    YamlDocument { index: usize, detail: String },

    #[error("document #{index} is not a schema object: {detail}")]
    SchemaShape { index: usize, detail: String },

    #[error("bundle {bundle} property #{index}: invalid base64 payload: {detail}")]
    Base64 {
        bundle: String,
        index: usize,
        detail: String,
    },

    #[error("bundle {bundle} property #{index}: payload is not a JSON object: {detail}")]
    PayloadJson {
        bundle: String,
        index: usize,
        detail: String,
    },
}
