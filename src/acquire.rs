//! Index image acquisition.
//!
//! Extraction shells out to `oc image extract`, copying the image's
//! `/configs/` tree into the catalog's raw-data directory. The destination is
//! always passed as an absolute path; the process working directory is left
//! alone.

use crate::catalog::CatalogIndex;
use anyhow::{Context, Result, bail};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Path inside index images that holds the file-based catalog.
pub const CONFIGS_PATH: &str = "/configs/";

/// Materializes an index image's catalog tree on local disk.
pub trait ImageExtractor: Send + Sync {
    fn extract(&self, index: &CatalogIndex, dest: &Path) -> Result<()>;
}

/// Runs the OpenShift client to extract index content.
#[derive(Clone, Debug)]
pub struct OcImageExtractor {
    binary: PathBuf,
}

impl OcImageExtractor {
    /// Locate `oc` on PATH.
    pub fn from_path() -> Result<Self> {
        match find_on_path("oc") {
            Some(binary) => Ok(Self { binary }),
            None => bail!("Unable to locate 'oc' on PATH; install the OpenShift client or pass --skip-extract"),
        }
    }

    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }

    fn command(&self, index: &CatalogIndex, dest: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("image")
            .arg("extract")
            .arg(index.pullspec())
            .arg(format!("--path={CONFIGS_PATH}:{}", dest.display()))
            .arg("--confirm");
        command
    }
}

impl ImageExtractor for OcImageExtractor {
    fn extract(&self, index: &CatalogIndex, dest: &Path) -> Result<()> {
        if !dest.is_absolute() {
            bail!("extraction target must be absolute, got {}", dest.display());
        }
        fs::create_dir_all(dest).with_context(|| format!("creating {}", dest.display()))?;

        tracing::info!(catalog = index.name(), "extracting contents of {}...", index.pullspec());
        let status = self
            .command(index, dest)
            .status()
            .with_context(|| format!("Failed to execute {}", self.binary.display()))?;

        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => bail!("oc image extract {} exited with {code}", index.pullspec()),
            None => bail!("oc image extract {} terminated by signal", index.pullspec()),
        }
    }
}

/// Returns true when a file exists and has any execute bit set.
pub fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = fs::metadata(path) {
            return meta.permissions().mode() & 0o111 != 0;
        }
        false
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Find an executable by name somewhere on PATH.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}
