//! Decoding of the mount sections of `docker inspect`.
//!
//! Engines since 1.8 report `.Mounts` as a list of objects; older engines only
//! have `.Volumes`, a map from container path to host path.

use crate::container::Volume;

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MountEntry {
    #[serde(default)]
    source: Option<String>,
    destination: String,
}

pub(super) fn parse_mounts(raw: &str) -> serde_json::Result<Vec<Volume>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries: Option<Vec<MountEntry>> = serde_json::from_str(raw)?;

    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|entry| Volume {
            source: entry.source.filter(|s| !s.is_empty()),
            destination: entry.destination,
        })
        .collect())
}

pub(super) fn parse_legacy_volumes(raw: &str) -> serde_json::Result<Vec<Volume>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let map: Option<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(raw)?;

    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(destination, source)| Volume {
            source: source.as_str().filter(|s| !s.is_empty()).map(str::to_owned),
            destination,
        })
        .collect())
}
