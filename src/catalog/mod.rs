//! Declarative-config catalog model and interpreter stages.
//!
//! A package's catalog file is parsed into [`SchemaObject`]s, the channels
//! are scanned for the latest version, the matching bundle is searched for
//! its ClusterServiceVersion, and the record fields are read from it. Each
//! stage lives in its own module; `crate::assembler` strings them together.

pub mod bundle;
pub mod channel;
pub mod descriptor;
pub mod index;
pub mod parser;
pub mod schema;

pub use bundle::{BUNDLE_OBJECT_PROPERTY, DESCRIPTOR_KIND, decode_bundle_object, locate_descriptor};
pub use channel::{LatestVersion, entry_version, resolve_latest, version_text};
pub use descriptor::{Descriptor, DescriptorFields, extract_fields};
pub use index::{CatalogIndex, DEFAULT_REGISTRY, DEFAULT_TAG};
pub use parser::{CatalogEncoding, catalog_file, parse_catalog_file, parse_catalog_str};
pub use schema::{Bundle, Channel, ChannelEntry, PackageDoc, Property, SchemaKind, SchemaObject};
