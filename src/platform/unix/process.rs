//! Unix process tree operations

use crate::error::{Error, Result};
use crate::platform::traits::ProcessTreeOps;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::collections::HashSet;
#[cfg(target_os = "linux")]
use std::fs;

pub struct UnixProcessTree;

impl UnixProcessTree {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTreeOps for UnixProcessTree {
    fn get_child_pids(&self, parent_pid: u32) -> Result<Vec<u32>> {
        #[cfg(target_os = "linux")]
        {
            self.get_child_pids_linux(parent_pid)
        }

        #[cfg(not(target_os = "linux"))]
        {
            self.get_child_pids_ps(parent_pid)
        }
    }

    fn kill_process_tree(&self, root_pid: u32) -> Result<()> {
        let descendants = self.get_all_descendant_pids(root_pid);

        // Children before parents so nothing gets reparented mid-kill
        for pid in descendants.iter().rev() {
            if let Err(e) = kill(Pid::from_raw(*pid as i32), Signal::SIGKILL) {
                debug!("SIGKILL to descendant {} failed: {}", pid, e);
            }
        }

        match kill(Pid::from_raw(root_pid as i32), Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(Error::KillFailed {
                pid: root_pid,
                reason: e.to_string(),
            }),
        }
    }
}

impl UnixProcessTree {
    /// Get child PIDs on Linux using /proc filesystem
    #[cfg(target_os = "linux")]
    fn get_child_pids_linux(&self, parent_pid: u32) -> Result<Vec<u32>> {
        let mut children = Vec::new();

        for entry in fs::read_dir("/proc")?.flatten() {
            let Some(pid) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<u32>().ok())
            else {
                continue;
            };

            if let Ok(stat) = fs::read_to_string(format!("/proc/{}/stat", pid)) {
                if parse_ppid_from_stat(&stat) == Some(parent_pid) {
                    children.push(pid);
                }
            }
        }

        Ok(children)
    }

    /// Get child PIDs from `ps -eo pid,ppid`
    #[cfg(not(target_os = "linux"))]
    fn get_child_pids_ps(&self, parent_pid: u32) -> Result<Vec<u32>> {
        let result = crate::launcher::run_capture("ps", &["-eo", "pid,ppid"], None);
        if !result.success {
            return Err(Error::Other(format!("ps failed: {}", result.stderr.trim())));
        }

        let children = result
            .stdout
            .lines()
            .skip(1)
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                let pid = parts.next()?.parse::<u32>().ok()?;
                let ppid = parts.next()?.parse::<u32>().ok()?;
                (ppid == parent_pid).then_some(pid)
            })
            .collect();

        Ok(children)
    }

    /// Recursively get all descendant PIDs (children, grandchildren, etc.)
    fn get_all_descendant_pids(&self, parent_pid: u32) -> Vec<u32> {
        let mut all_descendants = Vec::new();
        let mut to_check = vec![parent_pid];
        let mut checked = HashSet::new();

        while let Some(pid) = to_check.pop() {
            if !checked.insert(pid) {
                continue;
            }

            if let Ok(children) = self.get_child_pids(pid) {
                for child in children {
                    all_descendants.push(child);
                    to_check.push(child);
                }
            }
        }

        all_descendants
    }
}

/// Parse parent PID from /proc/[pid]/stat content
///
/// Format is `pid (comm) state ppid ...`; comm may contain spaces and
/// parentheses, so parsing starts after the last `)`.
#[cfg(target_os = "linux")]
fn parse_ppid_from_stat(stat_content: &str) -> Option<u32> {
    let close_paren = stat_content.rfind(')')?;
    stat_content[close_paren + 1..]
        .split_whitespace()
        .nth(1)?
        .parse::<u32>()
        .ok()
}
