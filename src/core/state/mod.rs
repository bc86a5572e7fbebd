mod config;

pub use config::{LauncherConfig, ProxyConfig, CONFIG_SCHEMA_VERSION};
