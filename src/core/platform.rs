// ─── Platform ───
// Host OS / architecture as seen by library rules and native classifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::{LauncherError, LauncherResult};

/// OS names as they appear in version descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsName {
    Windows,
    Linux,
    Osx,
}

impl OsName {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsName::Windows => "windows",
            OsName::Linux => "linux",
            OsName::Osx => "osx",
        }
    }
}

impl fmt::Display for OsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer width of the host, rendered as `32` / `64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchBits {
    #[serde(rename = "32")]
    X32,
    #[serde(rename = "64")]
    X64,
}

impl ArchBits {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchBits::X32 => "32",
            ArchBits::X64 => "64",
        }
    }
}

impl fmt::Display for ArchBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of the machine we install for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: OsName,
    pub arch: ArchBits,
}

impl Platform {
    pub fn new(os: OsName, arch: ArchBits) -> Self {
        Self { os, arch }
    }

    /// Platform of the running process.
    pub fn current() -> LauncherResult<Self> {
        let os = if cfg!(target_os = "windows") {
            OsName::Windows
        } else if cfg!(target_os = "macos") {
            OsName::Osx
        } else if cfg!(target_os = "linux") {
            OsName::Linux
        } else {
            return Err(LauncherError::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            ));
        };

        let arch = if cfg!(target_pointer_width = "64") {
            ArchBits::X64
        } else {
            ArchBits::X32
        };

        Ok(Self { os, arch })
    }
}
