use std::path::PathBuf;

/// Config file picked up from the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "watchdoc.toml";

/// Prefix for environment overrides (`WATCHDOC_PORT`, `WATCHDOC_CMD`, ...).
pub const ENV_PREFIX: &str = "WATCHDOC_";

pub fn default_port() -> u16 {
    8080
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_serve_dir() -> PathBuf {
    PathBuf::from(".")
}
