//! devup - one-command local development launcher
//!
//! Starts a backend and a frontend as detached processes, optionally exposes
//! the frontend through an ngrok tunnel, waits for the backend health
//! endpoint, and optionally checks telephony provider credentials through
//! the backend. The result is a short console report with LAN links.
//!
//! ## Module Organization
//!
//! ### Core Functionality
//!
//! - [`orchestrator`] - Stage sequencing and the console report
//! - [`launcher`] - Dependency installs, idempotent launches, listener cleanup
//! - [`health`] - Backend health polling and database status
//! - [`tunnel`] - Tunnel public URL discovery
//! - [`provider`] - Credential verification and webhook configuration
//!
//! ### Infrastructure
//!
//! - [`config`] - Env file parsing, `devup.toml`, credentials
//! - [`net`] - LAN address discovery and port liveness
//! - [`http`] - JSON-over-HTTP helpers
//! - [`platform`] - Per-platform port mapping, process killing, spawning
//! - [`mod@error`] - Error types and Result aliases
//! - [`logging`] - tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use devup::{Capabilities, ConfigLoader, CliOverrides, Credentials, Orchestrator};
//!
//! # async fn launch() -> devup::Result<()> {
//! let config = ConfigLoader::new(".").resolve(&CliOverrides::default())?;
//! let mut orchestrator = Orchestrator::new(
//!     config,
//!     Credentials::from_env(),
//!     Capabilities::native(),
//!     std::io::stdout(),
//! );
//! let summary = orchestrator.run().await?;
//! println!("LAN address: {}", summary.lan_ip);
//! # Ok(())
//! # }
//! ```
//!
//! ## Runtime Model
//!
//! Everything runs on one task and every stage is awaited in order. The
//! launched processes are independent OS processes; the launcher only
//! observes them through their ports and never stops them.
//!
//! ## Platform Support
//!
//! - Windows: new console windows, netstat-based restart
//! - Linux: new sessions, /proc-based restart
//! - Other Unix: new sessions, restart is a no-op

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod launcher;
pub mod logging;
pub mod net;
pub mod orchestrator;
pub mod platform;
pub mod provider;
pub mod tunnel;

// Re-exports for core functionality
pub use config::{CliOverrides, Config, ConfigLoader, Credentials, LaunchConfig};
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, RunSummary};
pub use platform::{Capabilities, Platform};

/// The current version of devup from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");
