// ─── InterfaceOficial Install Core ───
// Version resolution and download orchestration for the launcher.
//
// Architecture:
//   core/
//     version/     Manifest, version descriptors, OS/feature rules
//     maven/       Coordinate parsing and repository layout
//     loaders/     Fabric and Quilt profile sources
//     downloader/  Transfer plans, HTTP transport, batch orchestrator
//     install/     Descriptor fetch + library collection pipeline
//     state/       Persisted launcher config

pub mod downloader;
pub mod error;
pub mod http;
pub mod install;
pub mod loaders;
pub mod maven;
pub mod platform;
pub mod source;
pub mod state;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;
