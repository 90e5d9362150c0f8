//! Identity of one index image in a run.
//!
//! The index name doubles as the raw-data directory name and the output file
//! stem, so it is held to a strict character set before anything touches the
//! filesystem.

use anyhow::{Result, bail};
use std::fmt;

pub const DEFAULT_REGISTRY: &str = "registry.redhat.io/redhat";
pub const DEFAULT_TAG: &str = "v4.11";

/// Index image name plus the pull spec used to source it.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CatalogIndex {
    name: String,
    pullspec: String,
}

impl CatalogIndex {
    /// Build the identity for `<registry>/<name>:<tag>`.
    pub fn new(name: &str, registry: &str, tag: &str) -> Result<Self> {
        validate_index_name(name)?;
        if tag.trim().is_empty() {
            bail!("image tag must not be empty");
        }
        let registry = registry.trim_end_matches('/');
        Ok(Self {
            name: name.to_string(),
            pullspec: format!("{registry}/{name}:{tag}"),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pullspec(&self) -> &str {
        &self.pullspec
    }
}

impl fmt::Display for CatalogIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn validate_index_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("index name must not be empty");
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        bail!("index name must match ^[A-Za-z0-9_.-]+$, got {}", name);
    }

    if name.starts_with('.') {
        bail!("index name must not start with '.', got {}", name);
    }

    Ok(())
}
