use crate::core::source::DownloadSource;

const FABRIC_META_BASE: &str = "https://meta.fabricmc.net/v2";
const FABRIC_META_MIRROR: &str = "https://bmclapi2.bangbang93.com/fabric-meta/v2";
/// Official loader listing stays on v1; the mirror only serves v2.
const FABRIC_META_V1: &str = "https://meta.fabricmc.net/v1";

fn meta_base(source: DownloadSource) -> &'static str {
    match source {
        DownloadSource::Official => FABRIC_META_BASE,
        DownloadSource::BmclApi => FABRIC_META_MIRROR,
    }
}

/// Fabric Meta launcher profile for a game/loader version pair.
pub fn profile_url(source: DownloadSource, minecraft_version: &str, loader_version: &str) -> String {
    format!(
        "{}/versions/loader/{}/{}/profile/json",
        meta_base(source),
        minecraft_version,
        loader_version
    )
}

/// Game versions Fabric publishes loaders for.
pub fn game_versions_url(source: DownloadSource) -> String {
    format!("{}/versions/game", meta_base(source))
}

/// Loader builds available for one game version.
pub fn loader_versions_url(source: DownloadSource, minecraft_version: &str) -> String {
    let base = match source {
        DownloadSource::Official => FABRIC_META_V1,
        DownloadSource::BmclApi => FABRIC_META_MIRROR,
    };
    format!("{}/versions/loader/{}", base, minecraft_version)
}
