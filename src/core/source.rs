// ─── Download Source ───
// Official hosts vs. the BMCLAPI mirror.

use serde::{Deserialize, Serialize};

use crate::core::maven::{FABRIC_MAVEN, MOJANG_LIBRARIES, QUILT_MAVEN};

const BMCLAPI_ROOT: &str = "https://bmclapi2.bangbang93.com";
const MOJANG_LAUNCHERMETA_ROOT: &str = "https://launchermeta.mojang.com";

/// Canonical host prefix → path under the mirror root.
///
/// Longer prefixes come first so `maven.quiltmc.org/repository/release`
/// is rewritten as a whole.
const MIRROR_REWRITES: &[(&str, &str)] = &[
    (QUILT_MAVEN, "/maven"),
    (MOJANG_LIBRARIES, "/maven"),
    (FABRIC_MAVEN, "/maven"),
    ("https://meta.fabricmc.net", "/fabric-meta"),
    ("https://meta.quiltmc.org", "/quilt-meta"),
    ("https://resources.download.minecraft.net", "/assets"),
    (MOJANG_LAUNCHERMETA_ROOT, ""),
    ("https://piston-meta.mojang.com", ""),
    ("https://piston-data.mojang.com", ""),
    ("https://launcher.mojang.com", ""),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadSource {
    #[default]
    Official,
    BmclApi,
}

impl DownloadSource {
    fn root(&self) -> &'static str {
        match self {
            DownloadSource::Official => MOJANG_LAUNCHERMETA_ROOT,
            DownloadSource::BmclApi => BMCLAPI_ROOT,
        }
    }

    /// URL of the version manifest on this source.
    pub fn manifest_url(&self) -> String {
        format!("{}/mc/game/version_manifest_v2.json", self.root())
    }

    /// Rewrite a canonical URL for this source. Unknown hosts pass through.
    pub fn rewrite(&self, url: &str) -> String {
        if *self == DownloadSource::Official {
            return url.to_string();
        }

        for (canonical, mirror_path) in MIRROR_REWRITES {
            if let Some(rest) = url.strip_prefix(canonical) {
                return format!("{}{}{}", BMCLAPI_ROOT, mirror_path, rest);
            }
        }

        url.to_string()
    }
}
