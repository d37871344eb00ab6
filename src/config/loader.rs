//! Launcher Config Loading
//!
//! Loads `devup.toml` from the project root (or an explicit path) and layers
//! command-line overrides on top.

use super::{Config, LaunchConfig, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Values supplied on the command line; `None` keeps the file/default value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub frontend_port: Option<u16>,
    pub backend_port: Option<u16>,
    pub tunnel_port: Option<u16>,
    pub health_timeout_secs: Option<f64>,
    pub no_tunnel: bool,
    pub restart: bool,
}

/// Launcher configuration loader
pub struct ConfigLoader {
    root: PathBuf,
    path: PathBuf,
}

impl ConfigLoader {
    /// Loader for `<root>/devup.toml`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let path = root.join(CONFIG_FILE_NAME);
        Self { root, path }
    }

    /// Use an explicit config file instead of the default location
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the config file, falling back to defaults when it is absent
    pub fn load_file(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!("no launcher config at {}, using defaults", self.path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| Error::ConfigParseFailed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let config = parse_config(&content).map_err(|reason| Error::ConfigParseFailed {
            path: self.path.clone(),
            reason,
        })?;

        info!("loaded launcher config from {}", self.path.display());
        Ok(config)
    }

    /// Load the file and apply command-line overrides
    pub fn resolve(&self, overrides: &CliOverrides) -> Result<LaunchConfig> {
        let mut settings = self.load_file()?;
        apply_overrides(&mut settings, overrides);

        Ok(LaunchConfig {
            root: self.root.clone(),
            settings,
            restart: overrides.restart,
            tunnel_enabled: !overrides.no_tunnel,
        })
    }
}

/// Parse TOML launcher settings
pub fn parse_config(content: &str) -> std::result::Result<Config, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

fn apply_overrides(settings: &mut Config, overrides: &CliOverrides) {
    if let Some(port) = overrides.frontend_port {
        settings.frontend.port = port;
    }
    if let Some(port) = overrides.backend_port {
        settings.backend.port = port;
    }
    if let Some(port) = overrides.tunnel_port {
        settings.tunnel.port = port;
    }
    if let Some(timeout) = overrides.health_timeout_secs {
        settings.health.timeout_secs = timeout;
    }
}
