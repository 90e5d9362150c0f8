//! Typed view of declarative-config schema objects.
//!
//! Every document in a package's catalog file carries a `schema`
//! discriminator. The three OLM kinds the interpreter cares about get typed
//! variants; anything else is kept as `Other` with its raw JSON so catalogs
//! that introduce new schemas still parse.

use crate::error::SoftDecodeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `schema` discriminator values. `Other` keeps unrecognized kinds by name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum SchemaKind {
    Package,
    Channel,
    Bundle,
    Other(String),
}

impl SchemaKind {
    pub fn as_str(&self) -> &str {
        match self {
            SchemaKind::Package => "olm.package",
            SchemaKind::Channel => "olm.channel",
            SchemaKind::Bundle => "olm.bundle",
            SchemaKind::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "olm.package" => SchemaKind::Package,
            "olm.channel" => SchemaKind::Channel,
            "olm.bundle" => SchemaKind::Bundle,
            other => SchemaKind::Other(other.to_string()),
        }
    }
}

/// One document from a package's catalog file.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaObject {
    Package(PackageDoc),
    Channel(Channel),
    Bundle(Bundle),
    Other { kind: SchemaKind, raw: Value },
}

/// `olm.package` document. Parsed for completeness; the interpreter ignores it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PackageDoc {
    pub name: String,
    #[serde(default, rename = "defaultChannel")]
    pub default_channel: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// `olm.channel` document: a named upgrade track.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Channel {
    pub name: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default, deserialize_with = "tolerant_items")]
    pub entries: Vec<ChannelEntry>,
}

/// Member of a channel. `name` is a bundle name that encodes its version.
///
/// Entries are read field by field, so a malformed entry has `name: None`
/// and is passed over by the resolver instead of rejecting its channel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelEntry {
    pub name: Option<String>,
    pub replaces: Option<String>,
    pub skips: Vec<String>,
    pub skip_range: Option<String>,
}

impl From<Value> for ChannelEntry {
    fn from(value: Value) -> Self {
        ChannelEntry {
            name: string_field(&value, "name"),
            replaces: string_field(&value, "replaces"),
            skips: value
                .get("skips")
                .and_then(Value::as_array)
                .map(|skips| {
                    skips
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            skip_range: string_field(&value, "skipRange"),
        }
    }
}

/// `olm.bundle` document: one concrete operator version.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Bundle {
    pub name: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "tolerant_items")]
    pub properties: Vec<Property>,
}

/// Typed property attached to a bundle; `value` stays untyped.
///
/// A property without a string `type` keeps `kind: None` and is ignored by
/// the bundle scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Property {
    pub kind: Option<String>,
    pub value: Value,
}

impl From<Value> for Property {
    fn from(value: Value) -> Self {
        Property {
            kind: string_field(&value, "type"),
            value: value.get("value").cloned().unwrap_or(Value::Null),
        }
    }
}

/// Deserialize a list whose items are converted one by one and never fail.
fn tolerant_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<Value>,
{
    let items = Vec::<Value>::deserialize(deserializer)?;
    Ok(items.into_iter().map(T::from).collect())
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

impl SchemaObject {
    /// Classify a decoded document by its `schema` field.
    ///
    /// `index` is the document's position in the file and only feeds the
    /// error message. A document without a string `schema` field, or a known
    /// kind whose shape does not match, is a soft error.
    pub fn from_value(index: usize, value: Value) -> Result<Self, SoftDecodeError> {
        let shape_error = |detail: String| SoftDecodeError::SchemaShape { index, detail };

        let kind = match value.get("schema").and_then(Value::as_str) {
            Some(raw) => SchemaKind::from_str(raw),
            None => return Err(shape_error("missing string field 'schema'".to_string())),
        };

        let typed = match kind {
            SchemaKind::Package => serde_json::from_value(value).map(SchemaObject::Package),
            SchemaKind::Channel => serde_json::from_value(value).map(SchemaObject::Channel),
            SchemaKind::Bundle => serde_json::from_value(value).map(SchemaObject::Bundle),
            other => return Ok(SchemaObject::Other { kind: other, raw: value }),
        };
        typed.map_err(|err| shape_error(err.to_string()))
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            SchemaObject::Package(_) => SchemaKind::Package,
            SchemaObject::Channel(_) => SchemaKind::Channel,
            SchemaObject::Bundle(_) => SchemaKind::Bundle,
            SchemaObject::Other { kind, .. } => kind.clone(),
        }
    }

    pub fn as_channel(&self) -> Option<&Channel> {
        match self {
            SchemaObject::Channel(channel) => Some(channel),
            _ => None,
        }
    }

    pub fn as_bundle(&self) -> Option<&Bundle> {
        match self {
            SchemaObject::Bundle(bundle) => Some(bundle),
            _ => None,
        }
    }
}
