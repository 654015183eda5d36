//! Configuration for the development server with multi-source loading.
//!
//! Merges settings from CLI flags, environment variables and `watchdoc.toml`.
//! Priority: CLI > Environment > File > Defaults

mod defaults;

use crate::cli::Cli;
use crate::error::{ConfigError, Result, ResultExt};
use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

pub use defaults::*;

/// Settings for one `watchdoc` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchdocConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Directory that is served and watched for output changes
    #[serde(default = "default_serve_dir")]
    pub serve_dir: PathBuf,

    /// Comma-separated extra directories treated as sources
    #[serde(default)]
    pub watch_dirs: String,

    /// Shell command run when a source changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,

    /// Skip opening the browser on startup
    #[serde(default)]
    pub no_browser: bool,
}

impl Default for WatchdocConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            serve_dir: default_serve_dir(),
            watch_dirs: String::new(),
            cmd: None,
            no_browser: false,
        }
    }
}

/// The subset of flags the user actually passed.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serve_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    watch_dirs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cmd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_browser: Option<bool>,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            port: cli.port,
            host: cli.host.clone(),
            serve_dir: cli.serve_dir.clone(),
            watch_dirs: cli.watch_dirs.clone(),
            cmd: cli.cmd.clone(),
            no_browser: cli.no_browser.then_some(true),
        }
    }
}

impl WatchdocConfig {
    /// Load configuration from every source and validate it.
    ///
    /// An explicit `--config` file must exist; the implicit `watchdoc.toml`
    /// is optional.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        match &cli.config {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.clone()).into());
            }
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let default_path = Path::new(CONFIG_FILE);
                if default_path.is_file() {
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(CliOverrides::from(cli)));

        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that figment cannot.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port".to_string(),
                value: "0".to_string(),
                hint: "Use a port between 1 and 65535".to_string(),
            }
            .into());
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "host".to_string(),
                value: String::new(),
                hint: "Use an interface such as 127.0.0.1 or 0.0.0.0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// The rebuild command, if one is set and not blank.
    pub fn command(&self) -> Option<&str> {
        self.cmd.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// Resolve the served directory to a canonical absolute path.
    ///
    /// # Errors
    ///
    /// Fails if the directory does not exist or is not a directory.
    pub fn served_root(&self) -> Result<PathBuf> {
        let root = self
            .serve_dir
            .canonicalize()
            .with_path(&self.serve_dir)?;

        if !root.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "serve_dir".to_string(),
                value: self.serve_dir.display().to_string(),
                hint: "The served path must be a directory".to_string(),
            }
            .into());
        }

        Ok(root)
    }

    /// Socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr> {
        let invalid = || ConfigError::InvalidValue {
            field: "host".to_string(),
            value: self.host.clone(),
            hint: "Use an IP address or a resolvable host name".to_string(),
        };

        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| invalid())?
            .next()
            .ok_or_else(|| invalid().into())
    }

    /// URL a browser on this machine should open.
    pub fn server_url(&self) -> String {
        let host = match self.host.parse::<IpAddr>() {
            Ok(ip) if ip.is_unspecified() || ip.is_loopback() => "localhost".to_string(),
            Ok(IpAddr::V6(ip)) => format!("[{}]", ip),
            _ => self.host.clone(),
        };
        format!("http://{}:{}", host, self.port)
    }
}
