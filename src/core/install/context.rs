use std::path::PathBuf;

use crate::core::error::LauncherResult;
use crate::core::platform::Platform;
use crate::core::source::DownloadSource;
use crate::core::state::LauncherConfig;
use crate::core::version::{local_versions, FeatureSet, LocalVersion};

/// Everything an install needs to know about where and for whom it installs.
/// Passed explicitly instead of reading shared launcher state.
#[derive(Debug, Clone)]
pub struct InstallContext {
    pub game_dir: PathBuf,
    pub source: DownloadSource,
    pub platform: Platform,
    pub features: Option<FeatureSet>,
    /// Re-transfer libraries that are already on disk.
    pub overwrite_existing: bool,
}

impl InstallContext {
    pub fn new(game_dir: impl Into<PathBuf>, source: DownloadSource, platform: Platform) -> Self {
        Self {
            game_dir: game_dir.into(),
            source,
            platform,
            features: None,
            overwrite_existing: false,
        }
    }

    /// Context for the running host from persisted settings.
    pub fn from_config(config: &LauncherConfig) -> LauncherResult<Self> {
        let mut ctx = Self::new(&config.game_path, config.download_source, Platform::current()?);
        if !config.features.is_empty() {
            ctx.features = Some(config.features.clone());
        }
        ctx.overwrite_existing = config.overwrite_existing;
        Ok(ctx)
    }

    pub fn with_features(mut self, features: FeatureSet) -> Self {
        self.features = Some(features);
        self
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.game_dir.join("versions")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.game_dir.join("libraries")
    }

    /// `versions/<name>/<name>.json`
    pub fn descriptor_path(&self, version_name: &str) -> PathBuf {
        self.versions_dir()
            .join(version_name)
            .join(format!("{version_name}.json"))
    }

    /// Versions already installed in this game directory.
    pub async fn local_versions(&self) -> LauncherResult<Vec<LocalVersion>> {
        local_versions(&self.versions_dir()).await
    }
}
