//! Latest-version resolution across a package's channels.
//!
//! Every channel entry name encodes a bundle version. The resolver collects
//! the entries that parse as semantic versions and picks the highest one over
//! all channels, remembering which channel contributed it.

use crate::catalog::schema::SchemaObject;
use crate::error::PackageError;
use semver::Version;
use std::cmp::Ordering;

/// Highest version found in a package and the channel that listed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatestVersion {
    pub version: Version,
    pub channel: String,
}

/// Derive the version text from a channel entry name.
///
/// `<package>.v<semver>` yields the text after the first `.v` that is
/// followed by a digit, so package names such as `vault.vault-operator` do
/// not confuse the split. Otherwise everything after the first `.` is taken
/// (`<package>.<a>.<b>.<c>`). A name without any `.` yields `None`.
///
/// The catalog renderer this replaces split on the first `.v` regardless of
/// what followed, which dropped packages like `vault.vault-operator.v1.2.0`.
/// Such packages now resolve to `1.2.0` and appear in the output.
pub fn version_text(entry_name: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(offset) = entry_name[from..].find(".v") {
        let start = from + offset + 2;
        let rest = &entry_name[start..];
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return Some(rest);
        }
        from = start;
    }
    entry_name.split_once('.').map(|(_, rest)| rest)
}

/// Parse the version encoded in an entry name, if it is a valid semver.
pub fn entry_version(entry_name: &str) -> Option<Version> {
    version_text(entry_name).and_then(|text| Version::parse(text).ok())
}

/// Semantic-version precedence: build metadata does not participate.
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Find the maximal version over all `olm.channel` documents.
///
/// Channels and entries are scanned in document order and a candidate only
/// replaces the current best when it is strictly greater. Two channels that
/// list the same maximal version therefore resolve to whichever appears
/// first in the file. That tie-break is arbitrary but kept stable because
/// rendered output for real catalogs depends on it.
pub fn resolve_latest(objects: &[SchemaObject]) -> Result<LatestVersion, PackageError> {
    let mut best: Option<LatestVersion> = None;
    for channel in objects.iter().filter_map(SchemaObject::as_channel) {
        for entry in &channel.entries {
            let Some(version) = entry.name.as_deref().and_then(entry_version) else {
                continue;
            };
            let replace = match &best {
                Some(current) => cmp_precedence(&version, &current.version) == Ordering::Greater,
                None => true,
            };
            if replace {
                best = Some(LatestVersion {
                    version,
                    channel: channel.name.clone(),
                });
            }
        }
    }
    best.ok_or(PackageError::VersionResolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn channel(name: &str, entries: &[&str]) -> SchemaObject {
        let entries: Vec<_> = entries.iter().map(|e| json!({"name": e})).collect();
        SchemaObject::from_value(0, json!({"schema": "olm.channel", "name": name, "entries": entries}))
            .unwrap()
    }

    #[test]
    fn version_text_handles_both_name_forms() {
        assert_eq!(version_text("etcd.v0.9.4"), Some("0.9.4"));
        assert_eq!(version_text("etcd.v2.0.0-rc1"), Some("2.0.0-rc1"));
        assert_eq!(version_text("etcd.1.2.3"), Some("1.2.3"));
        assert_eq!(version_text("vault.vault-operator.v1.0.0"), Some("1.0.0"));
        assert_eq!(version_text("nodots"), None);
    }

    #[test]
    fn invalid_versions_are_not_candidates() {
        assert!(entry_version("etcd.v1.2").is_none());
        assert!(entry_version("etcd.latest").is_none());
        assert!(entry_version("etcd.v01.2.3").is_none());
        assert_eq!(entry_version("etcd.v1.2.3"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn maximum_spans_all_channels_with_prerelease_ordering() {
        let objects = vec![
            channel("stable", &["op.v1.0.0", "op.v1.2.0"]),
            channel("fast", &["op.v1.2.0", "op.v2.0.0-rc1"]),
        ];
        let latest = resolve_latest(&objects).unwrap();
        assert_eq!(latest.version.to_string(), "2.0.0-rc1");
        assert_eq!(latest.channel, "fast");
    }

    #[test]
    fn release_outranks_its_prerelease() {
        let objects = vec![
            channel("candidate", &["op.v2.0.0-rc1"]),
            channel("stable", &["op.v2.0.0"]),
        ];
        let latest = resolve_latest(&objects).unwrap();
        assert_eq!(latest.version, Version::new(2, 0, 0));
        assert_eq!(latest.channel, "stable");
    }

    #[test]
    fn nameless_entries_are_skipped_like_invalid_versions() {
        let objects = vec![SchemaObject::from_value(
            0,
            json!({
                "schema": "olm.channel",
                "name": "stable",
                "entries": [{"name": "op.v1.0.0"}, {"replaces": "op.v1.0.0"}, {"name": ["op.v9.0.0"]}]
            }),
        )
        .unwrap()];
        let latest = resolve_latest(&objects).unwrap();
        assert_eq!(latest.version, Version::new(1, 0, 0));
        assert_eq!(latest.channel, "stable");
    }

    #[test]
    fn ties_go_to_the_first_channel_scanned() {
        let objects = vec![
            channel("stable", &["op.v1.5.0"]),
            channel("fast", &["op.v1.5.0"]),
        ];
        assert_eq!(resolve_latest(&objects).unwrap().channel, "stable");
    }

    #[test]
    fn build_metadata_does_not_break_ties() {
        let objects = vec![
            channel("stable", &["op.v1.5.0+a"]),
            channel("fast", &["op.v1.5.0+b"]),
        ];
        let latest = resolve_latest(&objects).unwrap();
        assert_eq!(latest.channel, "stable");
        assert_eq!(latest.version.to_string(), "1.5.0+a");
    }

    #[test]
    fn no_valid_versions_is_a_resolution_error() {
        let objects = vec![channel("preview", &["op.latest", "op"])];
        assert!(matches!(
            resolve_latest(&objects),
            Err(PackageError::VersionResolution)
        ));
        assert!(matches!(resolve_latest(&[]), Err(PackageError::VersionResolution)));
    }
}
