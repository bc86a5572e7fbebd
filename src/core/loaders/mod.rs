pub mod catalog;
pub mod fabric;
pub mod quilt;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::source::DownloadSource;

pub use catalog::GameVersionEntry;

/// Loaders whose install is a single profile descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    Fabric,
    Quilt,
}

/// Loader → loader version requested on top of a vanilla version.
pub type LoaderOverlays = BTreeMap<LoaderKind, String>;

impl LoaderKind {
    pub fn profile_url(
        &self,
        source: DownloadSource,
        minecraft_version: &str,
        loader_version: &str,
    ) -> String {
        match self {
            LoaderKind::Fabric => fabric::profile_url(source, minecraft_version, loader_version),
            LoaderKind::Quilt => quilt::profile_url(source, minecraft_version, loader_version),
        }
    }

    pub fn game_versions_url(&self, source: DownloadSource) -> String {
        match self {
            LoaderKind::Fabric => fabric::game_versions_url(source),
            LoaderKind::Quilt => quilt::game_versions_url(source),
        }
    }

    pub fn loader_versions_url(&self, source: DownloadSource, minecraft_version: &str) -> String {
        match self {
            LoaderKind::Fabric => fabric::loader_versions_url(source, minecraft_version),
            LoaderKind::Quilt => quilt::loader_versions_url(source, minecraft_version),
        }
    }

    /// Game versions this loader publishes builds for.
    pub async fn supported_game_versions(
        &self,
        client: &reqwest::Client,
        source: DownloadSource,
    ) -> LauncherResult<Vec<GameVersionEntry>> {
        catalog::game_versions(client, &self.game_versions_url(source)).await
    }

    /// Loader versions usable with `minecraft_version`, as accepted by
    /// `profile_url`. Unsupported game versions are a `Loader` error.
    pub async fn loader_versions(
        &self,
        client: &reqwest::Client,
        source: DownloadSource,
        minecraft_version: &str,
    ) -> LauncherResult<Vec<String>> {
        catalog::loader_versions(
            client,
            *self,
            &self.game_versions_url(source),
            &self.loader_versions_url(source, minecraft_version),
            minecraft_version,
        )
        .await
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderKind::Fabric => write!(f, "fabric"),
            LoaderKind::Quilt => write!(f, "quilt"),
        }
    }
}

impl FromStr for LoaderKind {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fabric" => Ok(LoaderKind::Fabric),
            "quilt" => Ok(LoaderKind::Quilt),
            other => Err(LauncherError::Loader(format!("unsupported loader: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loader_names() {
        assert_eq!("Fabric".parse::<LoaderKind>().unwrap(), LoaderKind::Fabric);
        assert_eq!("quilt".parse::<LoaderKind>().unwrap(), LoaderKind::Quilt);
        assert!(matches!(
            "forge".parse::<LoaderKind>(),
            Err(LauncherError::Loader(_))
        ));
    }

    #[test]
    fn dispatches_profile_urls() {
        let url = LoaderKind::Fabric.profile_url(DownloadSource::Official, "1.20.1", "0.16.14");
        assert!(url.starts_with("https://meta.fabricmc.net/v2/"));
        let url = LoaderKind::Quilt.profile_url(DownloadSource::Official, "1.20.1", "0.20.0");
        assert!(url.starts_with("https://meta.quiltmc.org/v3/"));
    }

    #[test]
    fn dispatches_catalog_urls() {
        assert_eq!(
            LoaderKind::Fabric.game_versions_url(DownloadSource::Official),
            "https://meta.fabricmc.net/v2/versions/game"
        );
        assert_eq!(
            LoaderKind::Quilt.loader_versions_url(DownloadSource::Official, "1.20.1"),
            "https://meta.quiltmc.org/v3/versions/loader/1.20.1"
        );
    }
}
