//! Serializable output types.
//!
//! `PackageRecord` is the unit written per package; `CatalogListing` is the
//! document written per index. Optional annotations serialize as `null`
//! rather than being omitted so every record has the same key set.

use crate::catalog::{DescriptorFields, LatestVersion};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Normalized metadata for one operator package.
pub struct PackageRecord {
    pub package_name: String,
    pub display_name: String,
    pub latest_version: String,
    pub latest_channel: String,
    pub disconnected_supported: bool,
    pub fips_supported: bool,
    pub capabilities: Option<String>,
    pub repository: Option<String>,
    pub documentation_url: String,
}

impl PackageRecord {
    pub fn new(package_name: &str, latest: &LatestVersion, fields: DescriptorFields) -> Self {
        Self {
            package_name: package_name.to_string(),
            display_name: fields.display_name,
            latest_version: latest.version.to_string(),
            latest_channel: latest.channel.clone(),
            disconnected_supported: fields.disconnected_supported,
            fips_supported: fields.fips_supported,
            capabilities: fields.capabilities,
            repository: fields.repository,
            documentation_url: fields.documentation_url,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Rendered document for one index, in package discovery order.
pub struct CatalogListing {
    pub operators_list: Vec<PackageRecord>,
}
