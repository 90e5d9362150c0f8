//! Field extraction from a ClusterServiceVersion.
//!
//! Only `spec.displayName` is required. Annotations and links degrade to
//! defaults when absent or mistyped.

use crate::error::PackageError;
use serde_json::Value;

pub const INFRASTRUCTURE_FEATURES_ANNOTATION: &str = "operators.openshift.io/infrastructure-features";
pub const REPOSITORY_ANNOTATION: &str = "repository";
pub const CAPABILITIES_ANNOTATION: &str = "capabilities";
pub const DOCUMENTATION_LINK: &str = "documentation";
pub const MISSING_DOCUMENTATION_URL: &str = "N/A";

/// Decoded ClusterServiceVersion object.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor(Value);

/// Values the package record takes from the descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptorFields {
    pub display_name: String,
    pub disconnected_supported: bool,
    pub fips_supported: bool,
    pub capabilities: Option<String>,
    pub repository: Option<String>,
    pub documentation_url: String,
}

impl Descriptor {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn display_name(&self) -> Option<&str> {
        self.0.pointer("/spec/displayName").and_then(Value::as_str)
    }

    /// String annotation under `metadata.annotations`.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.0
            .pointer("/metadata/annotations")
            .and_then(|annotations| annotations.get(key))
            .and_then(Value::as_str)
    }

    /// URL of the first `spec.links` entry named "documentation", any case.
    pub fn documentation_url(&self) -> Option<&str> {
        self.0
            .pointer("/spec/links")
            .and_then(Value::as_array)?
            .iter()
            .find(|link| {
                link.get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|name| name.eq_ignore_ascii_case(DOCUMENTATION_LINK))
            })
            .and_then(|link| link.get("url"))
            .and_then(Value::as_str)
    }
}

/// Feature flags scanned out of the infrastructure-features annotation.
///
/// Matching is a case-insensitive substring check, so the annotation's list
/// syntax (JSON array, commas, spaces) does not matter.
pub fn infrastructure_features(annotation: Option<&str>) -> (bool, bool) {
    let Some(raw) = annotation else {
        return (false, false);
    };
    let lowered = raw.to_lowercase();
    (lowered.contains("disconnected"), lowered.contains("fips"))
}

pub fn extract_fields(descriptor: &Descriptor) -> Result<DescriptorFields, PackageError> {
    let display_name = descriptor
        .display_name()
        .ok_or(PackageError::RequiredFieldMissing {
            field: "spec.displayName",
        })?
        .to_string();
    let (disconnected_supported, fips_supported) =
        infrastructure_features(descriptor.annotation(INFRASTRUCTURE_FEATURES_ANNOTATION));

    Ok(DescriptorFields {
        display_name,
        disconnected_supported,
        fips_supported,
        capabilities: descriptor.annotation(CAPABILITIES_ANNOTATION).map(str::to_string),
        repository: descriptor.annotation(REPOSITORY_ANNOTATION).map(str::to_string),
        documentation_url: descriptor
            .documentation_url()
            .unwrap_or(MISSING_DOCUMENTATION_URL)
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_descriptor_populates_every_field() {
        let descriptor = Descriptor::new(json!({
            "kind": "ClusterServiceVersion",
            "metadata": {
                "name": "etcdoperator.v0.9.4",
                "annotations": {
                    "operators.openshift.io/infrastructure-features": "Disconnected, FIPS",
                    "repository": "https://github.com/coreos/etcd-operator",
                    "capabilities": "Full Lifecycle"
                }
            },
            "spec": {
                "displayName": "etcd",
                "links": [
                    {"name": "Blog", "url": "https://coreos.com/etcd"},
                    {"name": "Documentation", "url": "https://coreos.com/operators/etcd/docs"},
                    {"name": "documentation", "url": "https://example.com/second"}
                ]
            }
        }));
        let fields = extract_fields(&descriptor).unwrap();
        assert_eq!(
            fields,
            DescriptorFields {
                display_name: "etcd".to_string(),
                disconnected_supported: true,
                fips_supported: true,
                capabilities: Some("Full Lifecycle".to_string()),
                repository: Some("https://github.com/coreos/etcd-operator".to_string()),
                documentation_url: "https://coreos.com/operators/etcd/docs".to_string(),
            }
        );
    }

    #[test]
    fn sparse_descriptor_uses_defaults() {
        let descriptor = Descriptor::new(json!({
            "kind": "ClusterServiceVersion",
            "metadata": {"name": "x"},
            "spec": {"displayName": "X"}
        }));
        let fields = extract_fields(&descriptor).unwrap();
        assert!(!fields.disconnected_supported);
        assert!(!fields.fips_supported);
        assert_eq!(fields.capabilities, None);
        assert_eq!(fields.repository, None);
        assert_eq!(fields.documentation_url, MISSING_DOCUMENTATION_URL);
    }

    #[test]
    fn feature_flags_match_substrings_in_any_case() {
        assert_eq!(infrastructure_features(Some("[\"disconnected\"]")), (true, false));
        assert_eq!(infrastructure_features(Some("fips")), (false, true));
        assert_eq!(infrastructure_features(Some("DisconnectedFIPS")), (true, true));
        assert_eq!(infrastructure_features(Some("proxy-aware")), (false, false));
        assert_eq!(infrastructure_features(None), (false, false));
    }

    #[test]
    fn links_without_documentation_entry_fall_back() {
        let descriptor = Descriptor::new(json!({
            "spec": {"displayName": "X", "links": [{"name": "Source", "url": "https://src"}]}
        }));
        assert_eq!(descriptor.documentation_url(), None);
        assert_eq!(
            extract_fields(&descriptor).unwrap().documentation_url,
            MISSING_DOCUMENTATION_URL
        );
    }

    #[test]
    fn missing_display_name_is_fatal() {
        let descriptor = Descriptor::new(json!({"metadata": {"annotations": {}}, "spec": {}}));
        assert!(matches!(
            extract_fields(&descriptor),
            Err(PackageError::RequiredFieldMissing {
                field: "spec.displayName"
            })
        ));
    }
}
