//! Platform-specific operation traits
//!
//! The orchestrator only talks to these traits, so it never branches on the
//! platform itself and tests can substitute counting or no-op versions.

use crate::error::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A detached process started by the launcher
///
/// The launcher never waits on or terminates it; it keeps running after the
/// launcher exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedProcess {
    pub name: String,
    pub pid: u32,
}

/// Mapping from listening TCP ports to owning processes
pub trait PortOps: Send + Sync {
    /// PIDs with a listening socket on `port`; empty when unknown
    fn listening_pids(&self, port: u16) -> BTreeSet<u32>;

    /// Whether this platform can map ports to processes at all
    fn supports_port_mapping(&self) -> bool;
}

/// Platform-specific process tree operations
pub trait ProcessTreeOps: Send + Sync {
    /// Get all child process IDs of a given parent PID
    fn get_child_pids(&self, parent_pid: u32) -> Result<Vec<u32>>;

    /// Forcefully kill a process and all its descendants
    fn kill_process_tree(&self, root_pid: u32) -> Result<()>;
}

/// Detached process spawning
pub trait ConsoleOps: Send + Sync {
    /// Run `command` through the platform shell in `cwd`, detached from our
    /// console with its standard streams discarded
    fn spawn_detached(&self, name: &str, command: &str, cwd: &Path) -> Result<LaunchedProcess>;
}

/// Platform-specific filesystem operations
pub trait FilesystemOps: Send + Sync {
    /// Check if a file is executable
    fn is_executable(&self, path: &Path) -> bool;

    /// Find a command in PATH
    fn find_command(&self, command: &str) -> Option<PathBuf>;
}
