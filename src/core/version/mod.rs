pub mod descriptor;
pub mod local;
pub mod manifest;
pub mod rules;

pub use descriptor::{
    Argument, ArgumentValue, Arguments, ArtifactFile, AssetIndexInfo, ExtractRule,
    JavaVersionInfo, LibraryDownloads, LibraryEntry, VersionDescriptor, VersionDownloads,
};
pub use local::{local_versions, read_json, LocalVersion};
pub use manifest::{LatestVersions, VersionInfo, VersionManifest};
pub use rules::{evaluate, FeatureSet, OsRule, Rule, RuleAction};
