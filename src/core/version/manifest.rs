// ─── Version Manifest ───
// Handles fetching and parsing the version manifest v2.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::source::DownloadSource;

/// Top-level version manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionManifest {
    pub latest: LatestVersions,
    pub versions: Vec<VersionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub release_time: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub compliance_level: Option<u32>,
}

impl VersionManifest {
    /// Fetch the version manifest from the selected source.
    pub async fn fetch(client: &reqwest::Client, source: DownloadSource) -> LauncherResult<Self> {
        let url = source.manifest_url();
        info!("Fetching version manifest from {}", url);

        let response = client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url,
                status: status.as_u16(),
            });
        }

        let manifest: VersionManifest = response.json().await?;
        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.20.1").
    pub fn find_version(&self, id: &str) -> LauncherResult<&VersionInfo> {
        self.versions
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| LauncherError::VersionNotFound(id.to_string()))
    }

    pub fn latest_release(&self) -> LauncherResult<&VersionInfo> {
        self.find_version(&self.latest.release)
    }

    pub fn latest_snapshot(&self) -> LauncherResult<&VersionInfo> {
        self.find_version(&self.latest.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_manifest() -> VersionManifest {
        serde_json::from_value(serde_json::json!({
            "latest": { "release": "1.20.1", "snapshot": "23w31a" },
            "versions": [
                {
                    "id": "23w31a",
                    "type": "snapshot",
                    "url": "https://piston-meta.mojang.com/v1/packages/def/23w31a.json",
                    "time": "2023-08-01T12:00:00+00:00",
                    "releaseTime": "2023-08-01T12:00:00+00:00"
                },
                {
                    "id": "1.20.1",
                    "type": "release",
                    "url": "https://piston-meta.mojang.com/v1/packages/abc/1.20.1.json",
                    "sha1": "abc",
                    "releaseTime": "2023-06-12T13:25:51+00:00",
                    "complianceLevel": 1
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn finds_version_by_id() {
        let manifest = sample_manifest();
        let info = manifest.find_version("1.20.1").unwrap();
        assert_eq!(info.version_type, "release");
        assert_eq!(info.compliance_level, Some(1));
    }

    #[test]
    fn missing_version_is_an_error() {
        let manifest = sample_manifest();
        let err = manifest.find_version("0.0.1").unwrap_err();
        assert!(matches!(err, LauncherError::VersionNotFound(id) if id == "0.0.1"));
    }

    #[test]
    fn latest_ids_resolve() {
        let manifest = sample_manifest();
        assert_eq!(manifest.latest_release().unwrap().id, "1.20.1");
        assert_eq!(manifest.latest_snapshot().unwrap().id, "23w31a");
    }
}
