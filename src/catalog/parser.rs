//! Splits a package's catalog file into schema objects.
//!
//! JSON catalogs are a concatenation of objects with no wrapper array and no
//! guaranteed line structure, so they are read with a streaming decoder.
//! YAML catalogs are `---`-separated document streams, split on their
//! markers and parsed one document at a time. Document order is preserved in
//! both cases.

use crate::catalog::schema::SchemaObject;
use crate::error::{PackageError, SoftDecodeError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Catalog file names in lookup order.
const JSON_CATALOG: &str = "catalog.json";
const YAML_CATALOGS: &[&str] = &["catalog.yaml", "catalog.yml"];

/// Serialization of a package's catalog file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogEncoding {
    Json,
    Yaml,
}

/// Pick the catalog file inside a package directory.
///
/// JSON wins when both encodings are present.
pub fn catalog_file(package_dir: &Path) -> Result<(PathBuf, CatalogEncoding), PackageError> {
    let json = package_dir.join(JSON_CATALOG);
    if json.is_file() {
        return Ok((json, CatalogEncoding::Json));
    }
    for name in YAML_CATALOGS {
        let candidate = package_dir.join(name);
        if candidate.is_file() {
            return Ok((candidate, CatalogEncoding::Yaml));
        }
    }
    Err(PackageError::Io {
        path: package_dir.to_path_buf(),
        detail: format!("no {JSON_CATALOG} or catalog.yaml present"),
    })
}

/// Read and parse a catalog file from disk.
pub fn parse_catalog_file(
    path: &Path,
    encoding: CatalogEncoding,
    skipped: &mut Vec<SoftDecodeError>,
) -> Result<Vec<SchemaObject>, PackageError> {
    let content = fs::read_to_string(path).map_err(|err| PackageError::Io {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    parse_catalog_str(&content, encoding, skipped).map_err(|detail| PackageError::Format {
        path: path.to_path_buf(),
        detail,
    })
}

/// Parse catalog text. The error string becomes a `PackageError::Format`.
///
/// Documents that decode but are not schema objects are pushed to `skipped`.
pub fn parse_catalog_str(
    content: &str,
    encoding: CatalogEncoding,
    skipped: &mut Vec<SoftDecodeError>,
) -> Result<Vec<SchemaObject>, String> {
    match encoding {
        CatalogEncoding::Json => parse_json_stream(content, skipped),
        CatalogEncoding::Yaml => parse_yaml_stream(content, skipped),
    }
}

fn parse_json_stream(
    content: &str,
    skipped: &mut Vec<SoftDecodeError>,
) -> Result<Vec<SchemaObject>, String> {
    let mut objects = Vec::new();
    let stream = serde_json::Deserializer::from_str(content).into_iter::<Value>();
    for (index, value) in stream.enumerate() {
        // A broken object boundary leaves the decoder at an unknown offset, so
        // the whole file is rejected.
        let value = value.map_err(|err| format!("document #{index}: {err}"))?;
        push_document(index, value, &mut objects, skipped);
    }
    Ok(objects)
}

fn parse_yaml_stream(
    content: &str,
    skipped: &mut Vec<SoftDecodeError>,
) -> Result<Vec<SchemaObject>, String> {
    let mut objects = Vec::new();
    let mut broken = 0usize;
    for (index, document) in split_yaml_documents(content).into_iter().enumerate() {
        match serde_yaml::from_str::<Value>(&document) {
            Ok(value) => push_document(index, value, &mut objects, skipped),
            Err(err) => {
                broken += 1;
                skipped.push(SoftDecodeError::YamlDocument {
                    index,
                    detail: err.to_string(),
                });
            }
        }
    }
    if objects.is_empty() && broken > 0 {
        return Err(format!("{broken} YAML document(s) failed to parse and none remain usable"));
    }
    Ok(objects)
}

/// Cut a YAML stream into per-document sources.
///
/// Each document is parsed on its own so a syntax error cannot reach past the
/// next `---` marker. Markers only count at column zero; block scalar content
/// is always indented. Documents holding nothing but blanks and comments are
/// dropped.
fn split_yaml_documents(content: &str) -> Vec<String> {
    let mut documents = Vec::new();
    let mut current = String::new();
    for line in content.lines() {
        if let Some(rest) = document_marker(line) {
            documents.push(std::mem::take(&mut current));
            current.push_str(rest);
            current.push('\n');
        } else if line.trim_end() == "..." {
            documents.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    documents.push(current);
    documents.retain(|document| {
        document
            .lines()
            .any(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
    });
    documents
}

/// Content following a `---` start marker, if `line` is one.
fn document_marker(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("---")?;
    if rest.is_empty() || rest.starts_with([' ', '\t']) {
        Some(rest.trim_start())
    } else {
        None
    }
}

fn push_document(
    index: usize,
    value: Value,
    objects: &mut Vec<SchemaObject>,
    skipped: &mut Vec<SoftDecodeError>,
) {
    // Empty documents show up around stray `---` separators.
    if value.is_null() {
        return;
    }
    match SchemaObject::from_value(index, value) {
        Ok(object) => objects.push(object),
        Err(err) => skipped.push(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::schema::SchemaKind;
    use std::fs;
    use tempfile::TempDir;

    const PRETTY_JSON: &str = r#"{
    "schema": "olm.package",
    "name": "etcd",
    "defaultChannel": "stable"
}
{
    "schema": "olm.channel",
    "name": "stable",
    "package": "etcd",
    "entries": [
        {
            "name": "etcd.v0.9.4"
        }
    ]
}
"#;

    fn kinds(objects: &[SchemaObject]) -> Vec<SchemaKind> {
        objects.iter().map(SchemaObject::kind).collect()
    }

    #[test]
    fn json_stream_splits_multiline_objects() {
        let mut skipped = Vec::new();
        let objects = parse_catalog_str(PRETTY_JSON, CatalogEncoding::Json, &mut skipped).unwrap();
        assert_eq!(kinds(&objects), vec![SchemaKind::Package, SchemaKind::Channel]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn json_stream_does_not_need_newlines_between_objects() {
        let content = r#"{"schema":"olm.channel","name":"a","entries":[]}{"schema":"olm.channel","name":"b","entries":[]}"#;
        let mut skipped = Vec::new();
        let objects = parse_catalog_str(content, CatalogEncoding::Json, &mut skipped).unwrap();
        let names: Vec<_> = objects
            .iter()
            .filter_map(SchemaObject::as_channel)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn json_stream_rejects_broken_boundaries() {
        let content = "{\"schema\":\"olm.package\",\"name\":\"etcd\"}\n{\"schema\": \"olm.channel\",";
        let mut skipped = Vec::new();
        let err = parse_catalog_str(content, CatalogEncoding::Json, &mut skipped).unwrap_err();
        assert!(err.contains("document #1"), "unexpected error: {err}");
    }

    #[test]
    fn json_stream_skips_documents_without_schema() {
        let content = r#"{"name":"no-schema"} {"schema":"olm.package","name":"etcd"}"#;
        let mut skipped = Vec::new();
        let objects = parse_catalog_str(content, CatalogEncoding::Json, &mut skipped).unwrap();
        assert_eq!(objects.len(), 1);
        assert!(matches!(skipped[0], SoftDecodeError::SchemaShape { index: 0, .. }));
    }

    #[test]
    fn yaml_stream_keeps_document_order() {
        let content = "---\nschema: olm.package\nname: etcd\n---\nschema: olm.channel\nname: alpha\nentries:\n  - name: etcd.v0.9.0\n---\nschema: olm.bundle\nname: etcd.v0.9.0\nproperties: []\n";
        let mut skipped = Vec::new();
        let objects = parse_catalog_str(content, CatalogEncoding::Yaml, &mut skipped).unwrap();
        assert_eq!(
            kinds(&objects),
            vec![SchemaKind::Package, SchemaKind::Channel, SchemaKind::Bundle]
        );
        assert!(skipped.is_empty());
    }

    #[test]
    fn yaml_stream_skips_mistyped_documents() {
        let content = "schema: olm.channel\nname: broken\nentries: 7\n---\nschema: olm.channel\nname: ok\nentries: []\n";
        let mut skipped = Vec::new();
        let objects = parse_catalog_str(content, CatalogEncoding::Yaml, &mut skipped).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].as_channel().map(|c| c.name.as_str()), Some("ok"));
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn yaml_syntax_error_is_contained_to_its_document() {
        let content = "schema: olm.channel\nname: stable\nentries:\n  - name: etcd.v0.9.4\n---\nschema: [unterminated\n---\nschema: olm.bundle\nname: etcd.v0.9.4\nproperties: []\n";
        let mut skipped = Vec::new();
        let objects = parse_catalog_str(content, CatalogEncoding::Yaml, &mut skipped).unwrap();
        assert_eq!(kinds(&objects), vec![SchemaKind::Channel, SchemaKind::Bundle]);
        assert_eq!(skipped.len(), 1);
        assert!(matches!(skipped[0], SoftDecodeError::YamlDocument { index: 1, .. }));
    }

    #[test]
    fn yaml_split_honors_markers_only_at_column_zero() {
        let content = "# header\n---\nschema: olm.package\ndescription: |\n  line one\n  ---\n  line two\n--- # trailing\n...\n---\nschema: olm.channel\nname: alpha\n";
        let documents = split_yaml_documents(content);
        assert_eq!(documents.len(), 2);
        assert!(documents[0].contains("  ---\n  line two"));
        assert!(documents[1].starts_with("schema: olm.channel"));
        assert!(document_marker("----").is_none());
        assert_eq!(document_marker("--- {a: 1}"), Some("{a: 1}"));
    }

    #[test]
    fn yaml_stream_with_nothing_usable_is_a_format_error() {
        let content = "schema: [unterminated\n";
        let mut skipped = Vec::new();
        let err = parse_catalog_str(content, CatalogEncoding::Yaml, &mut skipped).unwrap_err();
        assert!(err.contains("none remain usable"));
        assert!(matches!(skipped[0], SoftDecodeError::YamlDocument { .. }));
    }

    #[test]
    fn catalog_file_prefers_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("catalog.yaml"), "schema: olm.package\nname: x\n").unwrap();
        let (path, encoding) = catalog_file(dir.path()).unwrap();
        assert_eq!(encoding, CatalogEncoding::Yaml);
        assert!(path.ends_with("catalog.yaml"));

        fs::write(dir.path().join("catalog.json"), "{}").unwrap();
        let (path, encoding) = catalog_file(dir.path()).unwrap();
        assert_eq!(encoding, CatalogEncoding::Json);
        assert!(path.ends_with("catalog.json"));
    }

    #[test]
    fn catalog_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = catalog_file(dir.path()).unwrap_err();
        assert!(matches!(err, PackageError::Io { .. }));
    }
}
