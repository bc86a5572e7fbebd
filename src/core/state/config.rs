// ─── Launcher Config ───
// Persisted install settings with an explicit schema version.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::source::DownloadSource;
use crate::core::version::FeatureSet;

pub const CONFIG_SCHEMA_VERSION: u64 = 1;

const APP_DIR_NAME: &str = "InterfaceOficial";
const DEFAULT_CONCURRENCY: usize = 8;

/// Keys that used to live in the same document but belong to the UI layer.
const UI_ONLY_KEYS: &[&str] = &[
    "color_theme",
    "colorTheme",
    "port",
    "language",
    "close_after_launch",
    "closeAfterLaunch",
    "selected_account",
    "selectedAccount",
];

/// Legacy snake_case key → current camelCase key.
const RENAMED_KEYS: &[(&str, &str)] = &[
    ("game_path", "gamePath"),
    ("last_game_path", "lastGamePath"),
    ("download_source", "downloadSource"),
    ("overwrite_existing", "overwriteExisting"),
    ("enable_proxy", "enableProxy"),
];

/// Same, inside the `proxy` object.
const RENAMED_PROXY_KEYS: &[(&str, &str)] = &[("enable_auth", "enableAuth")];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherConfig {
    pub schema_version: u64,
    #[serde(default = "default_game_path")]
    pub game_path: PathBuf,
    #[serde(default)]
    pub download_source: DownloadSource,
    #[serde(default)]
    pub overwrite_existing: bool,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub features: FeatureSet,
    #[serde(default)]
    pub enable_proxy: bool,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// Proxy used for every request when `enableProxy` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    /// Proxy URL, e.g. `http://127.0.0.1:7890` or `socks5://host:1080`.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub enable_auth: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_game_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(".minecraft")
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            game_path: default_game_path(),
            download_source: DownloadSource::default(),
            overwrite_existing: false,
            concurrency: DEFAULT_CONCURRENCY,
            features: FeatureSet::new(),
            enable_proxy: false,
            proxy: ProxyConfig::default(),
        }
    }
}

impl LauncherConfig {
    /// Load from disk, migrating older schemas. A missing file yields defaults.
    pub fn load(path: &Path) -> LauncherResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(LauncherError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let value: Value = serde_json::from_str(&raw)?;
        Self::from_value(value)
    }

    pub fn save(&self, path: &Path) -> LauncherResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LauncherError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| LauncherError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Deserialize a config document of any known schema version.
    pub fn from_value(value: Value) -> LauncherResult<Self> {
        let migrated = migrate(value)?;
        serde_json::from_value(migrated).map_err(|e| LauncherError::Config(e.to_string()))
    }
}

fn migrate(mut value: Value) -> LauncherResult<Value> {
    let obj = value
        .as_object_mut()
        .ok_or_else(|| LauncherError::Config("config root must be an object".into()))?;

    let version = match obj.get("schemaVersion") {
        None => 0,
        Some(v) => v
            .as_u64()
            .ok_or_else(|| LauncherError::Config("schemaVersion must be an integer".into()))?,
    };

    match version {
        0 => {
            migrate_v0(obj);
            info!("Migrated config from schema 0 to {}", CONFIG_SCHEMA_VERSION);
        }
        CONFIG_SCHEMA_VERSION => {}
        other => {
            return Err(LauncherError::Config(format!(
                "unsupported config schema version {other}"
            )))
        }
    }

    Ok(value)
}

/// Schema 0: unversioned, snake_case keys, UI fields mixed in, and `gamePath`
/// as a map of named paths selected by `lastGamePath`.
fn migrate_v0(obj: &mut Map<String, Value>) {
    for key in UI_ONLY_KEYS {
        obj.remove(*key);
    }

    for (old, new) in RENAMED_KEYS {
        if let Some(v) = obj.remove(*old) {
            obj.entry(new.to_string()).or_insert(v);
        }
    }

    if let Some(Value::Object(proxy)) = obj.get_mut("proxy") {
        for (old, new) in RENAMED_PROXY_KEYS {
            if let Some(v) = proxy.remove(*old) {
                proxy.entry(new.to_string()).or_insert(v);
            }
        }
    }

    let selected = obj
        .remove("lastGamePath")
        .and_then(|v| v.as_str().map(str::to_string));

    if let Some(Value::Object(paths)) = obj.get("gamePath") {
        let chosen = selected
            .as_deref()
            .and_then(|name| paths.get(name))
            .or_else(|| paths.values().next())
            .cloned();
        match chosen {
            Some(path) => {
                obj.insert("gamePath".into(), path);
            }
            None => {
                warn!("Config had an empty gamePath map, falling back to default");
                obj.remove("gamePath");
            }
        }
    }

    obj.insert("schemaVersion".into(), Value::from(CONFIG_SCHEMA_VERSION));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn current_schema_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("launcher.json");

        let mut config = LauncherConfig {
            game_path: dir.path().join("game"),
            download_source: DownloadSource::BmclApi,
            ..Default::default()
        };
        config.features.insert("is_demo_user".into(), false);
        config.save(&path).unwrap();

        let loaded = LauncherConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = LauncherConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded.schema_version, CONFIG_SCHEMA_VERSION);
        assert_eq!(loaded.concurrency, 8);
        assert!(!loaded.overwrite_existing);
    }

    #[test]
    fn migrates_snake_case_v0_document() {
        let config = LauncherConfig::from_value(json!({
            "game_path": "/games/mc",
            "download_source": "bmclapi",
            "color_theme": "dark",
            "port": 25565
        }))
        .unwrap();

        assert_eq!(config.schema_version, CONFIG_SCHEMA_VERSION);
        assert_eq!(config.game_path, PathBuf::from("/games/mc"));
        assert_eq!(config.download_source, DownloadSource::BmclApi);
    }

    #[test]
    fn migrates_named_game_path_map() {
        let config = LauncherConfig::from_value(json!({
            "lastGamePath": "portable",
            "gamePath": { "default": "/home/u/.minecraft", "portable": "/mnt/usb/.minecraft" },
            "downloadSource": "official",
            "colorTheme": "follow_system"
        }))
        .unwrap();

        assert_eq!(config.game_path, PathBuf::from("/mnt/usb/.minecraft"));
        assert_eq!(config.download_source, DownloadSource::Official);
    }

    #[test]
    fn migrates_proxy_settings() {
        let config = LauncherConfig::from_value(json!({
            "game_path": "/games/mc",
            "enable_proxy": true,
            "proxy": {
                "host": "http://127.0.0.1:7890",
                "enable_auth": true,
                "username": "steve",
                "password": "hunter2"
            }
        }))
        .unwrap();

        assert!(config.enable_proxy);
        assert_eq!(
            config.proxy,
            ProxyConfig {
                host: Some("http://127.0.0.1:7890".into()),
                enable_auth: true,
                username: Some("steve".into()),
                password: Some("hunter2".into()),
            }
        );
    }

    #[test]
    fn proxy_settings_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launcher.json");
        let config = LauncherConfig {
            enable_proxy: true,
            proxy: ProxyConfig {
                host: Some("socks5://10.0.0.2:1080".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        config.save(&path).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["enableProxy"], true);
        assert_eq!(raw["proxy"]["enableAuth"], false);
        assert_eq!(LauncherConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn rejects_future_schema() {
        let err = LauncherConfig::from_value(json!({ "schemaVersion": 7 })).unwrap_err();
        assert!(matches!(err, LauncherError::Config(_)));
    }

    #[test]
    fn rejects_non_object_document() {
        assert!(LauncherConfig::from_value(json!([1, 2, 3])).is_err());
    }
}
