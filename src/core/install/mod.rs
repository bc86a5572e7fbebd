pub mod collector;
pub mod context;
pub mod descriptors;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::downloader::{
    DownloadOrchestrator, PathExists, SubmitOptions, SubmitOutcome, Transport,
};
use crate::core::error::LauncherResult;
use crate::core::loaders::{LoaderKind, LoaderOverlays};
use crate::core::version::{read_json, VersionDescriptor, VersionManifest};

pub use collector::{collect, collect_for};
pub use context::InstallContext;
pub use descriptors::{descriptor_chain, fetch_plan, plan_descriptor_sources, DescriptorFetch};

/// What to install: a vanilla id, the name it is installed under, and an
/// optional loader on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
    pub version_id: String,
    pub version_name: String,
    #[serde(default)]
    pub overlays: LoaderOverlays,
}

impl InstallRequest {
    pub fn vanilla(version_id: &str) -> Self {
        Self {
            version_id: version_id.to_string(),
            version_name: version_id.to_string(),
            overlays: LoaderOverlays::new(),
        }
    }

    /// Loader install named `<id>-<loader>-<loader version>` unless renamed.
    pub fn with_loader(mut self, loader: LoaderKind, loader_version: &str) -> Self {
        if self.version_name == self.version_id {
            self.version_name = format!("{}-{}-{}", self.version_id, loader, loader_version);
        }
        self.overlays.insert(loader, loader_version.to_string());
        self
    }

    pub fn named(mut self, version_name: &str) -> Self {
        self.version_name = version_name.to_string();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallReport {
    /// Descriptor files the install was resolved from, installed one first.
    pub descriptors: Vec<PathBuf>,
    pub descriptor_files_transferred: usize,
    pub library_files_transferred: usize,
}

/// Runs one install attempt: descriptors first, then libraries, as a single
/// download scope. No retries; a failed attempt is simply re-run.
pub struct Installer<T, P> {
    ctx: InstallContext,
    orchestrator: DownloadOrchestrator<T, P>,
}

impl<T: Transport, P: PathExists> Installer<T, P> {
    pub fn new(ctx: InstallContext, orchestrator: DownloadOrchestrator<T, P>) -> Self {
        Self { ctx, orchestrator }
    }

    pub fn context(&self) -> &InstallContext {
        &self.ctx
    }

    pub fn orchestrator(&self) -> &DownloadOrchestrator<T, P> {
        &self.orchestrator
    }

    /// Fetch the manifest from the context's source and install.
    pub async fn install(
        &mut self,
        client: &reqwest::Client,
        request: &InstallRequest,
    ) -> LauncherResult<InstallReport> {
        let manifest = VersionManifest::fetch(client, self.ctx.source).await?;
        self.install_with_manifest(&manifest, request).await
    }

    pub async fn install_with_manifest(
        &mut self,
        manifest: &VersionManifest,
        request: &InstallRequest,
    ) -> LauncherResult<InstallReport> {
        info!(
            "Installing {} as {} ({} loader overlays)",
            request.version_id,
            request.version_name,
            request.overlays.len()
        );

        let result = self.run(manifest, request).await;
        if let Err(e) = &result {
            warn!("Install of {} failed: {}", request.version_name, e);
            self.orchestrator.close_scope();
        }
        result
    }

    async fn run(
        &mut self,
        manifest: &VersionManifest,
        request: &InstallRequest,
    ) -> LauncherResult<InstallReport> {
        let fetches = plan_descriptor_sources(
            &self.ctx,
            &request.version_id,
            &request.version_name,
            &request.overlays,
            manifest,
            self.orchestrator.paths(),
        )
        .await?;

        // Descriptors are always re-fetched; the scope stays open for libraries.
        let outcome = self
            .orchestrator
            .submit(
                fetch_plan(&fetches)?,
                SubmitOptions {
                    overwrite_existing: true,
                    hold_open_for_next_batch: true,
                },
            )
            .await?;

        let chain = descriptor_chain(
            &self.ctx,
            &request.version_id,
            &request.version_name,
            &request.overlays,
        )?;

        let mut descriptors = Vec::with_capacity(chain.len());
        for path in &chain {
            descriptors.push(read_json::<VersionDescriptor>(path).await?);
        }

        let libraries = match collect_for(&self.ctx, &descriptors)? {
            Some(plan) => {
                self.orchestrator
                    .submit(
                        plan,
                        SubmitOptions {
                            overwrite_existing: self.ctx.overwrite_existing,
                            hold_open_for_next_batch: false,
                        },
                    )
                    .await?
            }
            None => {
                self.orchestrator.close_scope();
                SubmitOutcome::NothingToDo
            }
        };

        let report = InstallReport {
            descriptors: chain,
            descriptor_files_transferred: transferred(outcome),
            library_files_transferred: transferred(libraries),
        };
        info!(
            "Installed {}: {} descriptors, {} library files transferred",
            request.version_name,
            report.descriptor_files_transferred,
            report.library_files_transferred
        );
        Ok(report)
    }
}

fn transferred(outcome: SubmitOutcome) -> usize {
    match outcome {
        SubmitOutcome::NothingToDo => 0,
        SubmitOutcome::Completed { files } => files,
    }
}
