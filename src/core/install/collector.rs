// ─── Dependency Collector ───
// Flattens parsed descriptors into one deduplicated library transfer plan.

use std::path::Path;

use tracing::{debug, info};

use super::context::InstallContext;
use crate::core::downloader::TransferPlan;
use crate::core::error::LauncherResult;
use crate::core::platform::Platform;
use crate::core::version::{FeatureSet, VersionDescriptor};

/// Library artifacts and natives required by `descriptors` on `platform`.
///
/// Returns `None` when nothing needs transferring. The same library declared
/// by several descriptors collapses to a single entry; the same destination
/// reached from two different URLs is a `PlanConflict`.
pub fn collect(
    descriptors: &[VersionDescriptor],
    libraries_root: &Path,
    platform: &Platform,
    features: Option<&FeatureSet>,
) -> LauncherResult<Option<TransferPlan>> {
    let mut plan = TransferPlan::new();
    let mut considered = 0usize;

    for descriptor in descriptors {
        for lib in &descriptor.libraries {
            let Some(name) = lib.name.as_deref() else {
                continue;
            };
            considered += 1;

            if !lib.is_allowed(platform, features) {
                debug!("Skipping library (rules): {}", name);
                continue;
            }

            if let Some((url, dest)) = lib.artifact_source(libraries_root)? {
                plan.insert(url, dest)?;
            }

            if let Some((url, dest)) = lib.native_source(libraries_root, platform) {
                plan.insert(url, dest)?;
            }
        }
    }

    info!(
        "Collected {} library files from {} libraries across {} descriptors",
        plan.len(),
        considered,
        descriptors.len()
    );
    Ok(plan.non_empty())
}

/// `collect` under an install context, with URLs rewritten for its source.
pub fn collect_for(
    ctx: &InstallContext,
    descriptors: &[VersionDescriptor],
) -> LauncherResult<Option<TransferPlan>> {
    let plan = collect(
        descriptors,
        &ctx.libraries_dir(),
        &ctx.platform,
        ctx.features.as_ref(),
    )?;

    plan.map(|p| p.rewrite_sources(ctx.source)).transpose()
}
