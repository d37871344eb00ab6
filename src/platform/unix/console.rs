//! Unix detached spawning
//!
//! Each process runs under `sh -c` in its own session, so it has no
//! controlling terminal and survives the launcher.

use crate::error::{Error, Result};
use crate::platform::traits::{ConsoleOps, LaunchedProcess};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

pub struct SessionConsole;

impl SessionConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleOps for SessionConsole {
    fn spawn_detached(&self, name: &str, command: &str, cwd: &Path) -> Result<LaunchedProcess> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // SAFETY: setsid is async-signal-safe and touches no parent state.
        unsafe {
            cmd.pre_exec(|| {
                nix::unistd::setsid()
                    .map(|_| ())
                    .map_err(std::io::Error::from)
            });
        }

        let child = cmd.spawn().map_err(|e| Error::SpawnFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        debug!(pid = child.id(), "spawned {} in {}", name, cwd.display());
        Ok(LaunchedProcess {
            name: name.to_string(),
            pid: child.id(),
        })
    }
}
