// ─── Loader catalog ───
// Which game versions a loader supports and which loader builds exist for one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::LoaderKind;
use crate::core::error::{LauncherError, LauncherResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVersionEntry {
    pub version: String,
    #[serde(default)]
    pub stable: bool,
}

#[derive(Deserialize)]
struct LoaderListing {
    loader: LoaderBuild,
}

#[derive(Deserialize)]
struct LoaderBuild {
    version: String,
}

async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> LauncherResult<T> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(LauncherError::LoaderApi(format!(
            "{} returned {}",
            url,
            resp.status()
        )));
    }
    Ok(resp.json::<T>().await?)
}

pub(super) async fn game_versions(
    client: &reqwest::Client,
    url: &str,
) -> LauncherResult<Vec<GameVersionEntry>> {
    get_json(client, url).await
}

/// Loader builds for `minecraft_version`, newest first as the meta API lists them.
/// A game version missing from `games_url` is rejected before listing builds.
pub(super) async fn loader_versions(
    client: &reqwest::Client,
    loader: LoaderKind,
    games_url: &str,
    builds_url: &str,
    minecraft_version: &str,
) -> LauncherResult<Vec<String>> {
    let supported = game_versions(client, games_url).await?;
    if !supported.iter().any(|v| v.version == minecraft_version) {
        return Err(LauncherError::Loader(format!(
            "{loader} does not support Minecraft {minecraft_version}"
        )));
    }

    let builds: Vec<LoaderListing> = get_json(client, builds_url).await?;
    debug!(
        "{} lists {} loader builds for {}",
        loader,
        builds.len(),
        minecraft_version
    );
    Ok(builds.into_iter().map(|b| b.loader.version).collect())
}
