//! Locates the ClusterServiceVersion embedded in a bundle.
//!
//! Bundles carry their manifests inline as `olm.bundle.object` properties
//! whose `value.data` is base64-encoded JSON. Payloads that fail to decode
//! are reported and skipped; the scan moves on to the next property and then
//! the next bundle whose name matches.

use crate::catalog::descriptor::Descriptor;
use crate::catalog::schema::{Bundle, Property, SchemaObject};
use crate::error::{MissingDescriptor, PackageError, SoftDecodeError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

pub const BUNDLE_OBJECT_PROPERTY: &str = "olm.bundle.object";
pub const DESCRIPTOR_KIND: &str = "ClusterServiceVersion";

/// Find the descriptor for `version` among the package's bundles.
///
/// Bundles are matched by name suffix in document order. Within a bundle the
/// first `olm.bundle.object` payload of kind `ClusterServiceVersion` wins.
pub fn locate_descriptor(
    objects: &[SchemaObject],
    version: &str,
    skipped: &mut Vec<SoftDecodeError>,
) -> Result<Descriptor, PackageError> {
    let mut matched = false;
    for bundle in objects
        .iter()
        .filter_map(SchemaObject::as_bundle)
        .filter(|bundle| bundle.name.ends_with(version))
    {
        matched = true;
        if let Some(descriptor) = descriptor_in_bundle(bundle, skipped) {
            return Ok(descriptor);
        }
    }

    Err(PackageError::DescriptorNotFound {
        version: version.to_string(),
        reason: if matched {
            MissingDescriptor::NoClusterServiceVersion
        } else {
            MissingDescriptor::NoMatchingBundle
        },
    })
}

fn descriptor_in_bundle(bundle: &Bundle, skipped: &mut Vec<SoftDecodeError>) -> Option<Descriptor> {
    for (index, property) in bundle.properties.iter().enumerate() {
        if property.kind.as_deref() != Some(BUNDLE_OBJECT_PROPERTY) {
            continue;
        }
        match decode_bundle_object(&bundle.name, index, property) {
            Ok(object) if object.get("kind").and_then(Value::as_str) == Some(DESCRIPTOR_KIND) => {
                return Some(Descriptor::new(object));
            }
            Ok(_) => {}
            Err(err) => skipped.push(err),
        }
    }
    None
}

/// Decode one `olm.bundle.object` property into a JSON object.
pub fn decode_bundle_object(
    bundle: &str,
    index: usize,
    property: &Property,
) -> Result<Value, SoftDecodeError> {
    let data = property
        .value
        .get("data")
        .and_then(Value::as_str)
        .ok_or_else(|| SoftDecodeError::Base64 {
            bundle: bundle.to_string(),
            index,
            detail: "missing string field 'value.data'".to_string(),
        })?;

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|err| SoftDecodeError::Base64 {
            bundle: bundle.to_string(),
            index,
            detail: err.to_string(),
        })?;

    let payload_error = |detail: String| SoftDecodeError::PayloadJson {
        bundle: bundle.to_string(),
        index,
        detail,
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(payload_error("decoded payload is not an object".to_string())),
        Err(err) => Err(payload_error(err.to_string())),
    }
}
