use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the installer core.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Coordinates ─────────────────────────────────────
    #[error("Malformed library coordinate: {0}")]
    MalformedCoordinate(String),

    // ── Versions / descriptors ──────────────────────────
    #[error("Version not found in manifest: {0}")]
    VersionNotFound(String),

    #[error("Failed to read descriptor {path:?}: {reason}")]
    DescriptorRead { path: PathBuf, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Transfer plan ───────────────────────────────────
    #[error("Transfer plan conflict at {destination:?}: {existing} vs {incoming}")]
    PlanConflict {
        destination: PathBuf,
        existing: String,
        incoming: String,
    },

    // ── Transfers ───────────────────────────────────────
    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Transfer canceled")]
    Canceled,

    // ── Loader ──────────────────────────────────────────
    #[error("Loader error: {0}")]
    Loader(String),

    #[error("Loader API unreachable: {0}")]
    LoaderApi(String),

    // ── Config / host ───────────────────────────────────
    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

// Host IPC layers require the error type to implement `Serialize`.
impl serde::Serialize for LauncherError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
