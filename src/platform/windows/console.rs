//! Windows detached spawning
//!
//! Each process gets a brand new console window via `CREATE_NEW_CONSOLE`.

use crate::error::{Error, Result};
use crate::platform::traits::{ConsoleOps, LaunchedProcess};
use std::os::windows::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};
use windows_sys::Win32::System::Threading::CREATE_NEW_CONSOLE;

pub struct NewConsole;

impl NewConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleOps for NewConsole {
    fn spawn_detached(&self, name: &str, command: &str, cwd: &Path) -> Result<LaunchedProcess> {
        let child = Command::new("cmd")
            .arg("/C")
            .raw_arg(command)
            .current_dir(cwd)
            .creation_flags(CREATE_NEW_CONSOLE)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::SpawnFailed {
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
