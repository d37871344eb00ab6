//! Process launching
//!
//! Dependency installation, idempotent detached launches and listener
//! cleanup. A launch is skipped whenever its port already accepts
//! connections, so re-running the launcher never duplicates processes.

use crate::error::{Error, Result};
use crate::net;
use crate::platform::{ConsoleOps, FilesystemOps, LaunchedProcess, PortOps, ProcessTreeOps};
use std::collections::BTreeSet;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of a helper command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run a program to completion, capturing its output
///
/// A program that cannot be started yields an unsuccessful result with the
/// spawn error in `stderr`.
pub fn run_capture(program: &str, args: &[&str], cwd: Option<&Path>) -> CommandResult {
    let mut cmd = Command::new(program);
    cmd.args(args).stdin(Stdio::null());
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }

    match cmd.output() {
        Ok(output) => CommandResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(e) => CommandResult {
            success: false,
            stdout: String::new(),
            stderr: e.to_string(),
        },
    }
}

/// Fail unless every tool is on PATH
pub fn require_tools(filesystem: &dyn FilesystemOps, tools: &[String]) -> Result<()> {
    let missing: Vec<String> = tools
        .iter()
        .filter(|tool| filesystem.find_command(tool).is_none())
        .cloned()
        .collect();

    if missing.is_empty() {
        debug!(count = tools.len(), "required tools present");
        Ok(())
    } else {
        Err(Error::MissingTools { tools: missing })
    }
}

/// Run `install_command` in `dir` unless `dir/marker` already exists
///
/// Blocks until the installer finishes; its output goes straight to our
/// console. Returns whether an install ran.
pub async fn ensure_installed(dir: &Path, marker: &Path, install_command: &str) -> Result<bool> {
    if dir.join(marker).exists() {
        debug!("{} already present in {}", marker.display(), dir.display());
        return Ok(false);
    }

    info!("running '{}' in {}", install_command, dir.display());
    let status = shell_command(install_command)
        .current_dir(dir)
        .status()
        .await
        .map_err(|e| Error::SpawnFailed {
            name: install_command.to_string(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(Error::InstallFailed {
            dir: dir.to_path_buf(),
            command: install_command.to_string(),
            code: status.code(),
        });
    }
    Ok(true)
}

fn shell_command(command: &str) -> tokio::process::Command {
    #[cfg(windows)]
    {
        let mut cmd = tokio::process::Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }

    #[cfg(not(windows))]
    {
        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

/// Result of an idempotent launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Something already listens on the port; nothing was spawned
    AlreadyListening { port: u16 },
    Started(LaunchedProcess),
}

impl LaunchOutcome {
    pub fn process(&self) -> Option<&LaunchedProcess> {
        match self {
            LaunchOutcome::Started(process) => Some(process),
            LaunchOutcome::AlreadyListening { .. } => None,
        }
    }
}

/// Starts named processes unless their port is already live
pub struct ProcessLauncher<'a> {
    console: &'a dyn ConsoleOps,
}

impl<'a> ProcessLauncher<'a> {
    pub fn new(console: &'a dyn ConsoleOps) -> Self {
        Self { console }
    }

    /// Start `command` unless `port` already accepts connections
    pub async fn launch_if_idle(
        &self,
        name: &str,
        command: &str,
        cwd: &Path,
        port: u16,
    ) -> Result<LaunchOutcome> {
        if net::is_listening(port).await {
            info!("{} already listening on :{}", name, port);
            return Ok(LaunchOutcome::AlreadyListening { port });
        }
        self.launch(name, command, cwd).map(LaunchOutcome::Started)
    }

    /// Start `command` unconditionally
    pub fn launch(&self, name: &str, command: &str, cwd: &Path) -> Result<LaunchedProcess> {
        let process = self.console.spawn_detached(name, command, cwd)?;
        info!(pid = process.pid, "started {}", name);
        Ok(process)
    }
}

/// Forcefully kill every process listening on any of `ports`
///
/// Returns the PIDs that were targeted. Individual kill failures are logged
/// and skipped.
pub fn kill_port_listeners(
    ports_ops: &dyn PortOps,
    tree: &dyn ProcessTreeOps,
    ports: &[u16],
) -> BTreeSet<u32> {
    if !ports_ops.supports_port_mapping() {
        debug!("port mapping unsupported on this platform; nothing to kill");
        return BTreeSet::new();
    }

    let pids: BTreeSet<u32> = ports
        .iter()
        .flat_map(|port| ports_ops.listening_pids(*port))
        .collect();

    for pid in &pids {
        if *pid == std::process::id() {
            continue;
        }
        match tree.kill_process_tree(*pid) {
            Ok(()) => info!("killed process tree {}", pid),
            Err(e) => warn!("could not kill {}: {}", pid, e),
        }
    }

    pids
}
