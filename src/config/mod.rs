//! Configuration management for devup
//!
//! Three layers feed the launcher: built-in defaults, an optional
//! `devup.toml` in the project root, and command-line flags. The resolved
//! [`LaunchConfig`] is handed to the orchestrator together with the
//! [`Credentials`] read from the process environment.

pub mod credentials;
pub mod dotenv;
pub mod loader;

pub use credentials::{mask, Credentials};
pub use dotenv::{load_env_file, parse_env, EnvMap};
pub use loader::{CliOverrides, ConfigLoader};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default launcher config file name, relative to the project root
pub const CONFIG_FILE_NAME: &str = "devup.toml";

/// Launcher settings as written in `devup.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tools that must be on PATH before anything runs
    pub required_tools: Vec<String>,

    /// Key the backend env file must define
    pub database_key: String,

    pub backend: BackendConfig,
    pub frontend: FrontendConfig,
    pub install: InstallConfig,
    pub tunnel: TunnelConfig,
    pub health: HealthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            required_tools: vec!["node".to_string(), "npm".to_string()],
            database_key: "MONGODB_URI".to_string(),
            backend: BackendConfig::default(),
            frontend: FrontendConfig::default(),
            install: InstallConfig::default(),
            tunnel: TunnelConfig::default(),
            health: HealthConfig::default(),
        }
    }
}

/// Backend process settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Working directory, relative to the project root
    pub dir: PathBuf,
    pub command: String,
    pub port: u16,
    /// Env file, relative to the backend directory
    pub env_file: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("server"),
            command: "npm run dev".to_string(),
            port: 5000,
            env_file: PathBuf::from(".env"),
        }
    }
}

/// Frontend process settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub dir: PathBuf,
    /// Command template; `{port}` is replaced with the frontend port
    pub command: String,
    pub port: u16,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            command: "npm run dev -- --host 0.0.0.0 --port {port}".to_string(),
            port: 8080,
        }
    }
}

/// Dependency installation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub command: String,
    /// Directory whose absence triggers an install
    pub marker: PathBuf,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            command: "npm install".to_string(),
            marker: PathBuf::from("node_modules"),
        }
    }
}

/// Tunnel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelConfig {
    pub tool: String,
    /// Command template; `{port}` is replaced with the tunnelled port
    pub command: String,
    pub port: u16,
    /// Local status API listing the active tunnels
    pub api_url: String,
    /// Port of the local status API, cleared on restart
    pub api_port: u16,
    pub discovery_timeout_secs: f64,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            tool: "ngrok".to_string(),
            command: "ngrok http {port}".to_string(),
            port: 8080,
            api_url: "http://127.0.0.1:4040/api/tunnels".to_string(),
            api_port: 4040,
            discovery_timeout_secs: 20.0,
        }
    }
}

/// Backend health check settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub path: String,
    pub timeout_secs: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            path: "/api/health".to_string(),
            timeout_secs: 30.0,
        }
    }
}

/// Fully resolved configuration for one launcher run
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Project root every relative directory is resolved against
    pub root: PathBuf,
    pub settings: Config,
    /// Kill existing listeners before launching
    pub restart: bool,
    /// Start the tunnel when its tool is available
    pub tunnel_enabled: bool,
}

impl LaunchConfig {
    /// Defaults rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            settings: Config::default(),
            restart: false,
            tunnel_enabled: true,
        }
    }

    pub fn backend_dir(&self) -> PathBuf {
        resolve(&self.root, &self.settings.backend.dir)
    }

    pub fn frontend_dir(&self) -> PathBuf {
        resolve(&self.root, &self.settings.frontend.dir)
    }

    pub fn env_file_path(&self) -> PathBuf {
        resolve(&self.backend_dir(), &self.settings.backend.env_file)
    }

    pub fn backend_port(&self) -> u16 {
        self.settings.backend.port
    }

    pub fn frontend_port(&self) -> u16 {
        self.settings.frontend.port
    }

    pub fn backend_command(&self) -> String {
        fill_port(&self.settings.backend.command, self.backend_port())
    }

    pub fn frontend_command(&self) -> String {
        fill_port(&self.settings.frontend.command, self.frontend_port())
    }

    pub fn tunnel_command(&self) -> String {
        fill_port(&self.settings.tunnel.command, self.settings.tunnel.port)
    }

    /// Loopback base URL of the backend, forced to IPv4
    pub fn api_base(&self) -> String {
        format!("http://127.0.0.1:{}", self.backend_port())
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.api_base(), self.settings.health.path)
    }

    pub fn health_timeout(&self) -> Duration {
        secs(self.settings.health.timeout_secs)
    }

    pub fn tunnel_discovery_timeout(&self) -> Duration {
        secs(self.settings.tunnel.discovery_timeout_secs)
    }

    /// Ports cleared by a restart: backend, frontend and the tunnel API
    pub fn restart_ports(&self) -> Vec<u16> {
        vec![
            self.backend_port(),
            self.frontend_port(),
            self.settings.tunnel.api_port,
        ]
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn fill_port(template: &str, port: u16) -> String {
    template.replace("{port}", &port.to_string())
}

/// Seconds to a `Duration`: negative and NaN give zero, too large saturates
fn secs(value: f64) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
}
