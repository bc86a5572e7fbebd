// ─── Version Descriptor ───
// Parses a client descriptor (vanilla version JSON or loader profile) and
// resolves per-library artifact / native sources.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::rules::{self, FeatureSet, Rule};
use crate::core::error::LauncherResult;
use crate::core::maven::Coordinate;
use crate::core::platform::Platform;

const ARCH_TOKEN: &str = "${arch}";

/// A parsed client descriptor.
///
/// `inheritsFrom` is kept for callers but never merged here: every descriptor
/// of a chain is supplied on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub inherits_from: Option<String>,
    #[serde(default)]
    pub main_class: Option<String>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
    #[serde(default)]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default)]
    pub assets: Option<String>,
    #[serde(default)]
    pub arguments: Option<Arguments>,
    /// Legacy `minecraftArguments` field (pre-1.13).
    #[serde(default)]
    pub minecraft_arguments: Option<String>,
    #[serde(default)]
    pub java_version: Option<JavaVersionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersionInfo {
    #[serde(default)]
    pub component: Option<String>,
    pub major_version: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionDownloads {
    #[serde(default)]
    pub client: Option<ArtifactFile>,
    #[serde(default)]
    pub server: Option<ArtifactFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub total_size: Option<u64>,
}

/// A downloadable file as described by a descriptor. Every field is optional
/// in the wild; sources are only used when both `url` and `path` are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactFile {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
}

impl ArtifactFile {
    fn source(&self, libraries_root: &Path) -> Option<(String, PathBuf)> {
        match (&self.url, &self.path) {
            (Some(url), Some(path)) => Some((url.clone(), libraries_root.join(path))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<Argument>,
    #[serde(default)]
    pub jvm: Vec<Argument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    Plain(String),
    Conditional {
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    One(String),
    Many(Vec<String>),
}

// ─── Library Entry ───

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryEntry {
    /// Coordinate string; entries without one are ignored.
    #[serde(default)]
    pub name: Option<String>,
    /// Repository base the coordinate resolves against (loader profiles).
    #[serde(default, rename = "url")]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub downloads: Option<LibraryDownloads>,
    /// OS name → classifier key template (may contain `${arch}`).
    #[serde(default)]
    pub natives: Option<HashMap<String, String>>,
    #[serde(default)]
    pub extract: Option<ExtractRule>,
    #[serde(default)]
    pub rules: Option<Vec<Rule>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default)]
    pub artifact: Option<ArtifactFile>,
    #[serde(default)]
    pub classifiers: Option<HashMap<String, ArtifactFile>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractRule {
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl LibraryEntry {
    pub fn is_allowed(&self, platform: &Platform, features: Option<&FeatureSet>) -> bool {
        match &self.rules {
            Some(rules) => rules::evaluate(rules, platform, features),
            None => true,
        }
    }

    /// Classifier key of the native for `platform`, with `${arch}` substituted.
    pub fn native_classifier(&self, platform: &Platform) -> Option<String> {
        let template = self.natives.as_ref()?.get(platform.os.as_str())?;
        Some(template.replace(ARCH_TOKEN, platform.arch.as_str()))
    }

    /// `(url, destination)` of the main artifact.
    ///
    /// An explicit `downloads.artifact` wins; otherwise a library carrying its
    /// own repository URL is resolved through its coordinate.
    pub fn artifact_source(&self, libraries_root: &Path) -> LauncherResult<Option<(String, PathBuf)>> {
        let explicit = self
            .downloads
            .as_ref()
            .and_then(|d| d.artifact.as_ref())
            .and_then(|a| a.source(libraries_root));
        if explicit.is_some() {
            return Ok(explicit);
        }

        match (&self.name, &self.repository_url) {
            (Some(name), Some(repo)) => {
                let coordinate = Coordinate::parse(name)?;
                Ok(Some((
                    coordinate.to_jar_url(repo),
                    libraries_root.join(coordinate.local_path()),
                )))
            }
            _ => Ok(None),
        }
    }

    /// `(url, destination)` of the native classifier for `platform`, if any.
    pub fn native_source(&self, libraries_root: &Path, platform: &Platform) -> Option<(String, PathBuf)> {
        let key = self.native_classifier(platform)?;
        self.downloads
            .as_ref()?
            .classifiers
            .as_ref()?
            .get(&key)?
            .source(libraries_root)
    }
}

impl VersionDescriptor {
    /// Game arguments that apply to `platform`.
    ///
    /// Falls back to the legacy space-separated `minecraftArguments`.
    pub fn game_arguments(&self, platform: &Platform, features: Option<&FeatureSet>) -> Vec<String> {
        match &self.arguments {
            Some(args) => flatten_arguments(&args.game, platform, features),
            None => match &self.minecraft_arguments {
                Some(s) => s.split_whitespace().map(|s| s.to_string()).collect(),
                None => vec![],
            },
        }
    }

    /// JVM arguments that apply to `platform`.
    pub fn jvm_arguments(&self, platform: &Platform, features: Option<&FeatureSet>) -> Vec<String> {
        match &self.arguments {
            Some(args) => flatten_arguments(&args.jvm, platform, features),
            None => vec![],
        }
    }
}

fn flatten_arguments(
    args: &[Argument],
    platform: &Platform,
    features: Option<&FeatureSet>,
) -> Vec<String> {
    args.iter()
        .flat_map(|arg| match arg {
            Argument::Plain(s) => vec![s.clone()],
            Argument::Conditional { rules, value } => {
                if !rules::evaluate(rules, platform, features) {
                    return vec![];
                }
                match value {
                    ArgumentValue::One(s) => vec![s.clone()],
                    ArgumentValue::Many(values) => values.clone(),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::{ArchBits, OsName};

    fn linux() -> Platform {
        Platform::new(OsName::Linux, ArchBits::X64)
    }

    fn lwjgl_with_natives() -> LibraryEntry {
        serde_json::from_value(serde_json::json!({
            "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.4",
            "downloads": {
                "classifiers": {
                    "natives-linux": {
                        "path": "org/lwjgl/lwjgl/lwjgl-platform/2.9.4/lwjgl-platform-2.9.4-natives-linux.jar",
                        "url": "https://libraries.minecraft.net/org/lwjgl/lwjgl/lwjgl-platform/2.9.4/lwjgl-platform-2.9.4-natives-linux.jar"
                    },
                    "natives-windows-64": {
                        "path": "org/lwjgl/lwjgl/lwjgl-platform/2.9.4/lwjgl-platform-2.9.4-natives-windows-64.jar",
                        "url": "https://libraries.minecraft.net/org/lwjgl/lwjgl/lwjgl-platform/2.9.4/lwjgl-platform-2.9.4-natives-windows-64.jar"
                    }
                }
            },
            "natives": { "linux": "natives-linux", "windows": "natives-windows-${arch}" },
            "extract": { "exclude": ["META-INF/"] }
        }))
        .unwrap()
    }

    #[test]
    fn native_classifier_substitutes_arch() {
        let lib = lwjgl_with_natives();
        let win = Platform::new(OsName::Windows, ArchBits::X64);
        assert_eq!(lib.native_classifier(&win).as_deref(), Some("natives-windows-64"));
        assert_eq!(lib.native_classifier(&linux()).as_deref(), Some("natives-linux"));
        let osx = Platform::new(OsName::Osx, ArchBits::X64);
        assert_eq!(lib.native_classifier(&osx), None);
    }

    #[test]
    fn native_source_requires_url_and_path() {
        let root = Path::new("libs");
        let lib = lwjgl_with_natives();
        let (url, dest) = lib.native_source(root, &linux()).unwrap();
        assert!(url.ends_with("natives-linux.jar"));
        assert_eq!(
            dest,
            root.join("org/lwjgl/lwjgl/lwjgl-platform/2.9.4/lwjgl-platform-2.9.4-natives-linux.jar")
        );

        let mut missing_url = lwjgl_with_natives();
        if let Some(classifiers) = missing_url
            .downloads
            .as_mut()
            .and_then(|d| d.classifiers.as_mut())
        {
            if let Some(file) = classifiers.get_mut("natives-linux") {
                file.url = None;
            }
        }
        assert!(missing_url.native_source(root, &linux()).is_none());
    }

    #[test]
    fn explicit_artifact_beats_repository_url() {
        let lib: LibraryEntry = serde_json::from_value(serde_json::json!({
            "name": "com.example:lib:1.0",
            "url": "https://maven.example.com",
            "downloads": { "artifact": { "path": "com/example/lib/1.0/lib-1.0.jar", "url": "https://cdn.example.com/lib.jar" } }
        }))
        .unwrap();
        let (url, dest) = lib.artifact_source(Path::new("libs")).unwrap().unwrap();
        assert_eq!(url, "https://cdn.example.com/lib.jar");
        assert_eq!(dest, Path::new("libs").join("com/example/lib/1.0/lib-1.0.jar"));
    }

    #[test]
    fn repository_url_resolves_through_coordinate() {
        let lib: LibraryEntry = serde_json::from_value(serde_json::json!({
            "name": "net.fabricmc:fabric-loader:0.16.14",
            "url": "https://maven.fabricmc.net/"
        }))
        .unwrap();
        let (url, dest) = lib.artifact_source(Path::new("libs")).unwrap().unwrap();
        assert_eq!(
            url,
            "https://maven.fabricmc.net/net/fabricmc/fabric-loader/0.16.14/fabric-loader-0.16.14.jar"
        );
        assert_eq!(
            dest,
            Path::new("libs").join("net/fabricmc/fabric-loader/0.16.14/fabric-loader-0.16.14.jar")
        );
    }

    #[test]
    fn library_without_sources_yields_nothing() {
        let lib: LibraryEntry =
            serde_json::from_value(serde_json::json!({ "name": "a:b:1.0" })).unwrap();
        assert!(lib.artifact_source(Path::new("libs")).unwrap().is_none());
        assert!(lib.native_source(Path::new("libs"), &linux()).is_none());
    }

    #[test]
    fn malformed_coordinate_with_repository_fails() {
        let lib: LibraryEntry = serde_json::from_value(serde_json::json!({
            "name": "broken:coord",
            "url": "https://maven.example.com"
        }))
        .unwrap();
        assert!(lib.artifact_source(Path::new("libs")).is_err());
    }

    #[test]
    fn argument_rules_apply_to_platform() {
        let parsed: VersionDescriptor = serde_json::from_value(serde_json::json!({
            "id": "test",
            "mainClass": "net.minecraft.client.main.Main",
            "arguments": {
                "game": [
                    "--username",
                    "${auth_player_name}",
                    {
                        "rules": [{"action": "allow", "os": {"name": "linux"}}],
                        "value": ["--demo"]
                    },
                    {
                        "rules": [{"action": "allow", "os": {"name": "windows"}}],
                        "value": "--should-not-appear"
                    }
                ],
                "jvm": [
                    {
                        "rules": [{"action": "allow", "features": {"has_custom_resolution": true}}],
                        "value": ["--width", "${resolution_width}"]
                    }
                ]
            }
        }))
        .unwrap();

        let game = parsed.game_arguments(&linux(), None);
        assert_eq!(game, vec!["--username", "${auth_player_name}", "--demo"]);

        let mut features = FeatureSet::new();
        features.insert("has_custom_resolution".into(), false);
        assert!(parsed.jvm_arguments(&linux(), Some(&features)).is_empty());
        features.insert("has_custom_resolution".into(), true);
        assert_eq!(parsed.jvm_arguments(&linux(), Some(&features)).len(), 2);
    }

    #[test]
    fn legacy_minecraft_arguments_are_split() {
        let parsed: VersionDescriptor = serde_json::from_value(serde_json::json!({
            "id": "1.12.2",
            "minecraftArguments": "--username ${auth_player_name}  --version ${version_name}"
        }))
        .unwrap();
        assert_eq!(parsed.game_arguments(&linux(), None).len(), 4);
        assert!(parsed.jvm_arguments(&linux(), None).is_empty());
    }

    #[test]
    fn inherits_from_is_preserved_not_merged() {
        let parsed: VersionDescriptor = serde_json::from_value(serde_json::json!({
            "id": "fabric-loader-0.16.14-1.20.1",
            "inheritsFrom": "1.20.1",
            "libraries": [{ "name": "net.fabricmc:fabric-loader:0.16.14", "url": "https://maven.fabricmc.net/" }]
        }))
        .unwrap();
        assert_eq!(parsed.inherits_from.as_deref(), Some("1.20.1"));
        assert_eq!(parsed.libraries.len(), 1);
        assert!(parsed.main_class.is_none());
    }
}
