use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::error::{LauncherError, LauncherResult};

/// A parsed library coordinate.
///
/// Supported formats:
///   `groupId:artifactId:version`
///   `groupId:artifactId:version:classifier`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
}

impl Coordinate {
    /// Parse a coordinate string. Exactly 3 or 4 non-empty segments are accepted.
    ///
    /// # Examples
    /// ```
    /// use interface_install::core::maven::Coordinate;
    /// let c = Coordinate::parse("net.fabricmc:fabric-loader:0.16.14").unwrap();
    /// assert_eq!(c.group_id, "net.fabricmc");
    /// ```
    pub fn parse(coord: &str) -> LauncherResult<Self> {
        let parts: Vec<&str> = coord.split(':').collect();

        if parts.iter().any(|p| p.is_empty()) {
            return Err(LauncherError::MalformedCoordinate(coord.to_string()));
        }

        match parts.as_slice() {
            [group, artifact, version] => Ok(Self {
                group_id: group.to_string(),
                artifact_id: artifact.to_string(),
                version: version.to_string(),
                classifier: None,
            }),
            [group, artifact, version, classifier] => Ok(Self {
                group_id: group.to_string(),
                artifact_id: artifact.to_string(),
                version: version.to_string(),
                classifier: Some(classifier.to_string()),
            }),
            _ => Err(LauncherError::MalformedCoordinate(coord.to_string())),
        }
    }

    /// `artifactId-version[-classifier].jar`
    pub fn jar_file_name(&self) -> String {
        match &self.classifier {
            Some(c) => format!("{}-{}-{}.jar", self.artifact_id, self.version, c),
            None => format!("{}-{}.jar", self.artifact_id, self.version),
        }
    }

    /// `[...group parts, artifactId, version, jarFileName]`
    pub fn to_repository_path_segments(&self) -> Vec<String> {
        let mut segments: Vec<String> = self.group_id.split('.').map(str::to_string).collect();
        segments.push(self.artifact_id.clone());
        segments.push(self.version.clone());
        segments.push(self.jar_file_name());
        segments
    }

    /// Construct the jar URL for this coordinate under the given repository base.
    ///
    /// Template:
    /// `<repo>/<group_path>/<artifact_id>/<version>/<jar_file_name>`
    pub fn to_jar_url(&self, repo_base: &str) -> String {
        let base = repo_base.trim_end_matches('/');
        format!(
            "{}/{}/{}/{}/{}",
            base,
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version,
            self.jar_file_name()
        )
    }

    /// Path of the jar relative to the libraries directory.
    pub fn local_path(&self) -> PathBuf {
        self.to_repository_path_segments().iter().collect()
    }
}

impl FromStr for Coordinate {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classifier {
            Some(c) => write!(
                f,
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.version, c
            ),
            None => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version),
        }
    }
}
