// ─── Descriptor sources ───
// Which descriptor JSONs to fetch for a version (+ optional loader), and in
// which order they are parsed afterwards.

use std::path::PathBuf;

use tracing::debug;

use super::context::InstallContext;
use crate::core::downloader::{PathExists, TransferPlan};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::loaders::{LoaderKind, LoaderOverlays};
use crate::core::version::VersionManifest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorFetch {
    pub url: String,
    pub destination: PathBuf,
}

/// Plan the descriptor fetches for `requested_id` installed as `version_name`.
///
/// Without overlays this is the vanilla descriptor. With a loader overlay the
/// loader profile becomes the installed descriptor, and the vanilla one is
/// fetched to its own directory only if it is not on disk yet.
pub async fn plan_descriptor_sources<P: PathExists + ?Sized>(
    ctx: &InstallContext,
    requested_id: &str,
    version_name: &str,
    overlays: &LoaderOverlays,
    manifest: &VersionManifest,
    paths: &P,
) -> LauncherResult<Vec<DescriptorFetch>> {
    let vanilla = manifest.find_version(requested_id)?;
    let installed = ctx.descriptor_path(version_name);

    let Some((loader, loader_version)) = single_overlay(overlays, requested_id, version_name)? else {
        return Ok(vec![DescriptorFetch {
            url: ctx.source.rewrite(&vanilla.url),
            destination: installed,
        }]);
    };

    let mut fetches = vec![DescriptorFetch {
        url: loader.profile_url(ctx.source, requested_id, loader_version),
        destination: installed,
    }];

    let vanilla_path = ctx.descriptor_path(requested_id);
    if paths.exists(&vanilla_path).await {
        debug!("Vanilla descriptor {} already on disk", requested_id);
    } else {
        fetches.push(DescriptorFetch {
            url: ctx.source.rewrite(&vanilla.url),
            destination: vanilla_path,
        });
    }

    Ok(fetches)
}

/// Descriptor files to parse once fetched, installed descriptor first.
pub fn descriptor_chain(
    ctx: &InstallContext,
    requested_id: &str,
    version_name: &str,
    overlays: &LoaderOverlays,
) -> LauncherResult<Vec<PathBuf>> {
    let mut chain = vec![ctx.descriptor_path(version_name)];
    if single_overlay(overlays, requested_id, version_name)?.is_some() {
        chain.push(ctx.descriptor_path(requested_id));
    }
    Ok(chain)
}

/// Batch plan for a set of descriptor fetches.
pub fn fetch_plan(fetches: &[DescriptorFetch]) -> LauncherResult<TransferPlan> {
    let mut plan = TransferPlan::new();
    for fetch in fetches {
        plan.insert(fetch.url.clone(), fetch.destination.clone())?;
    }
    Ok(plan)
}

fn single_overlay<'a>(
    overlays: &'a LoaderOverlays,
    requested_id: &str,
    version_name: &str,
) -> LauncherResult<Option<(LoaderKind, &'a str)>> {
    let mut iter = overlays.iter();
    let Some((loader, loader_version)) = iter.next() else {
        return Ok(None);
    };

    if iter.next().is_some() {
        return Err(LauncherError::Loader(format!(
            "only one loader can be applied, got {}",
            overlays.len()
        )));
    }

    if version_name == requested_id {
        return Err(LauncherError::Loader(format!(
            "{loader} install of {requested_id} needs a version name distinct from the vanilla id"
        )));
    }

    Ok(Some((*loader, loader_version.as_str())))
}
