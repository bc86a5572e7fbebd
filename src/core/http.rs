use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::{Client, ClientBuilder, Proxy};
use tracing::{info, warn};

use crate::core::error::LauncherResult;
use crate::core::state::{LauncherConfig, ProxyConfig};

const APP_USER_AGENT: &str = "InterfaceOficial-Install/0.1.0";

fn base_builder() -> ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .redirect(reqwest::redirect::Policy::limited(10))
}

/// Shared client for manifest/profile lookups and the HTTP transport.
///
/// Identity encoding keeps `Content-Length` meaningful for progress reporting.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    base_builder().build()
}

/// Client honoring the proxy settings of `config`.
///
/// An enabled proxy with an empty or invalid host is logged and skipped, the
/// client then connects directly.
pub fn build_http_client_for(config: &LauncherConfig) -> LauncherResult<Client> {
    let mut builder = base_builder();
    if config.enable_proxy {
        if let Some(proxy) = proxy_from(&config.proxy) {
            builder = builder.proxy(proxy);
        }
    }
    Ok(builder.build()?)
}

fn proxy_from(settings: &ProxyConfig) -> Option<Proxy> {
    let Some(host) = settings.host.as_deref().map(str::trim).filter(|h| !h.is_empty()) else {
        warn!("Proxy enabled without a host, connecting directly");
        return None;
    };

    let proxy = match Proxy::all(host) {
        Ok(proxy) => proxy,
        Err(e) => {
            warn!("Ignoring invalid proxy {}: {}", host, e);
            return None;
        }
    };

    info!("Using proxy {} (auth: {})", host, settings.enable_auth);
    match (settings.enable_auth, &settings.username, &settings.password) {
        (true, Some(user), Some(pass)) => Some(proxy.basic_auth(user, pass)),
        _ => Some(proxy),
    }
}
