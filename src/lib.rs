pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::downloader::{
    DownloadOrchestrator, HttpTransport, LocalFs, SubmitOptions, SubmitOutcome, TransferJob,
    TransferPlan,
};
pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::http::{build_http_client, build_http_client_for};
pub use crate::core::install::{InstallContext, InstallReport, InstallRequest, Installer};
pub use crate::core::loaders::LoaderKind;
pub use crate::core::platform::Platform;
pub use crate::core::source::DownloadSource;
pub use crate::core::state::{LauncherConfig, ProxyConfig};
pub use crate::core::version::VersionManifest;

/// Install a global fmt subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,interface_install=debug")),
        )
        .try_init();
}

/// Installer over HTTP and the local filesystem, built from persisted settings.
///
/// `client` is normally `build_http_client_for(config)` so downloads use the
/// configured proxy.
pub fn http_installer(
    config: &LauncherConfig,
    client: reqwest::Client,
) -> LauncherResult<Installer<HttpTransport, LocalFs>> {
    let ctx = InstallContext::from_config(config)?;
    let transport = HttpTransport::new(client).with_concurrency(config.concurrency);
    Ok(Installer::new(ctx, DownloadOrchestrator::new(transport, LocalFs)))
}
