use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Minimal ClusterServiceVersion with the given display name.
pub fn csv(display_name: &str) -> Value {
    json!({
        "apiVersion": "operators.coreos.com/v1alpha1",
        "kind": "ClusterServiceVersion",
        "metadata": {"name": display_name.to_lowercase(), "annotations": {}},
        "spec": {"displayName": display_name}
    })
}

/// `olm.bundle.object` property carrying `object` as base64 JSON.
pub fn object_property(object: &Value) -> Value {
    let data = STANDARD.encode(serde_json::to_vec(object).expect("serialize object"));
    json!({"type": "olm.bundle.object", "value": {"data": data}})
}

/// `olm.bundle.object` property with raw base64 text, valid or not.
pub fn raw_object_property(data: &str) -> Value {
    json!({"type": "olm.bundle.object", "value": {"data": data}})
}

pub fn package_doc(package: &str, default_channel: &str) -> Value {
    json!({"schema": "olm.package", "name": package, "defaultChannel": default_channel})
}

pub fn channel_doc(package: &str, name: &str, versions: &[&str]) -> Value {
    let entries: Vec<Value> = versions
        .iter()
        .map(|v| json!({"name": format!("{package}.v{v}")}))
        .collect();
    json!({"schema": "olm.channel", "name": name, "package": package, "entries": entries})
}

pub fn bundle_doc(package: &str, version: &str, properties: Vec<Value>) -> Value {
    json!({
        "schema": "olm.bundle",
        "name": format!("{package}.v{version}"),
        "package": package,
        "image": format!("quay.io/example/{package}-bundle:v{version}"),
        "properties": properties
    })
}

/// Write documents as a pretty-printed JSON stream (`catalog.json`).
pub fn write_json_catalog(index_dir: &Path, package: &str, documents: &[Value]) -> PathBuf {
    let dir = index_dir.join(package);
    fs::create_dir_all(&dir).expect("create package dir");
    let mut content = String::new();
    for doc in documents {
        content.push_str(&serde_json::to_string_pretty(doc).expect("serialize doc"));
        content.push('\n');
    }
    fs::write(dir.join("catalog.json"), content).expect("write catalog.json");
    dir
}

/// Write documents as a multi-document YAML stream (`catalog.yaml`).
pub fn write_yaml_catalog(index_dir: &Path, package: &str, documents: &[Value]) -> PathBuf {
    let dir = index_dir.join(package);
    fs::create_dir_all(&dir).expect("create package dir");
    let mut content = String::new();
    for doc in documents {
        content.push_str("---\n");
        content.push_str(&serde_yaml::to_string(doc).expect("serialize doc"));
    }
    fs::write(dir.join("catalog.yaml"), content).expect("write catalog.yaml");
    dir
}

/// Write arbitrary catalog text under `file_name`.
pub fn write_raw_catalog(index_dir: &Path, package: &str, file_name: &str, content: &str) -> PathBuf {
    let dir = index_dir.join(package);
    fs::create_dir_all(&dir).expect("create package dir");
    fs::write(dir.join(file_name), content).expect("write catalog");
    dir
}

/// A complete, valid package: one channel, one bundle, one CSV.
pub fn simple_package(index_dir: &Path, package: &str, version: &str, display_name: &str) -> PathBuf {
    write_json_catalog(
        index_dir,
        package,
        &[
            package_doc(package, "stable"),
            channel_doc(package, "stable", &[version]),
            bundle_doc(package, version, vec![object_property(&csv(display_name))]),
        ],
    )
}
