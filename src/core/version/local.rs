use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::descriptor::VersionDescriptor;
use crate::core::error::{LauncherError, LauncherResult};

/// A version installed under `versions/<name>/<name>.json`.
#[derive(Debug, Clone)]
pub struct LocalVersion {
    pub name: String,
    pub descriptor: VersionDescriptor,
}

/// Read and parse a JSON document from disk.
///
/// A missing or unreadable file and malformed JSON both surface as
/// `DescriptorRead` carrying the offending path.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> LauncherResult<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LauncherError::DescriptorRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    serde_json::from_str(&raw).map_err(|e| LauncherError::DescriptorRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Installed versions under `versions_dir`, sorted by name.
///
/// Directories without a `<name>.json` are skipped; a descriptor that does not
/// parse fails the listing. A missing `versions_dir` means nothing is installed.
pub async fn local_versions(versions_dir: &Path) -> LauncherResult<Vec<LocalVersion>> {
    let io_err = |e| LauncherError::Io {
        path: versions_dir.to_path_buf(),
        source: e,
    };

    let mut entries = match tokio::fs::read_dir(versions_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err(e)),
    };

    let mut versions = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        if !entry.file_type().await.map_err(io_err)?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!("Skipping non UTF-8 version directory {:?}", entry.path());
            continue;
        };

        let descriptor_path = entry.path().join(format!("{name}.json"));
        if !tokio::fs::try_exists(&descriptor_path).await.unwrap_or(false) {
            continue;
        }

        let descriptor = read_json(&descriptor_path).await?;
        versions.push(LocalVersion { name, descriptor });
    }

    versions.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(versions)
}
