//! Rendered output: file writing and schema validation.
//!
//! Listings are written as `<rendered_dir>/<index>.json` with a four-space
//! indent. The bundled JSON Schema describes the same shape and is used to
//! check listings before they are written and in tests.

use crate::catalog::CatalogIndex;
use crate::record::CatalogListing;
use anyhow::{Context, Result, anyhow};
use jsonschema::JSONSchema;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

const LISTING_SCHEMA: &str = include_str!("../schema/operators_list.schema.json");

/// Validate a rendered listing against the bundled schema.
///
/// Returns every violation instead of stopping at the first; an empty vector
/// means the listing conforms.
pub fn validate_listing(listing: &Value) -> Result<Vec<String>> {
    let schema: Value =
        serde_json::from_str(LISTING_SCHEMA).context("parsing bundled listing schema")?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling bundled listing schema: {err}"))?;
    let errors = match compiled.validate(listing) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|err| format!("{}: {}", err.instance_path, err))
            .collect(),
    };
    Ok(errors)
}

/// Serialize with the four-space indent used for rendered files.
pub fn render_listing(listing: &CatalogListing) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    listing
        .serialize(&mut serializer)
        .context("serializing catalog listing")?;
    buf.push(b'\n');
    Ok(buf)
}

/// Validate and write `<rendered_dir>/<index>.json`, creating the directory.
pub fn write_listing(
    rendered_dir: &Path,
    index: &CatalogIndex,
    listing: &CatalogListing,
) -> Result<PathBuf> {
    let value = serde_json::to_value(listing).context("converting listing to JSON")?;
    let violations = validate_listing(&value)?;
    if !violations.is_empty() {
        return Err(anyhow!(
            "listing for {} failed schema validation:\n{}",
            index.name(),
            violations.join("\n")
        ));
    }

    fs::create_dir_all(rendered_dir)
        .with_context(|| format!("creating {}", rendered_dir.display()))?;
    let path = rendered_dir.join(format!("{}.json", index.name()));
    fs::write(&path, render_listing(listing)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
