use crate::core::source::DownloadSource;

const QUILT_META_BASE: &str = "https://meta.quiltmc.org/v3";
const QUILT_META_MIRROR: &str = "https://bmclapi2.bangbang93.com/quilt-meta/v3";

fn meta_base(source: DownloadSource) -> &'static str {
    match source {
        DownloadSource::Official => QUILT_META_BASE,
        DownloadSource::BmclApi => QUILT_META_MIRROR,
    }
}

/// Quilt Meta launcher profile (same API shape as Fabric's).
pub fn profile_url(source: DownloadSource, minecraft_version: &str, loader_version: &str) -> String {
    format!(
        "{}/versions/loader/{}/{}/profile/json",
        meta_base(source),
        minecraft_version,
        loader_version
    )
}

/// Game versions Quilt publishes loaders for.
pub fn game_versions_url(source: DownloadSource) -> String {
    format!("{}/versions/game", meta_base(source))
}

/// Loader builds available for one game version.
pub fn loader_versions_url(source: DownloadSource, minecraft_version: &str) -> String {
    format!("{}/versions/loader/{}", meta_base(source), minecraft_version)
}
