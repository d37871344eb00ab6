//! Windows process tree operations

use crate::error::{Error, Result};
use crate::platform::traits::ProcessTreeOps;
use std::collections::HashSet;

pub struct WindowsProcessTree;

impl WindowsProcessTree {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTreeOps for WindowsProcessTree {
    fn get_child_pids(&self, parent_pid: u32) -> Result<Vec<u32>> {
        use windows_sys::Win32::Foundation::{CloseHandle, GetLastError, INVALID_HANDLE_VALUE};
        use windows_sys::Win32::System::Diagnostics::ToolHelp::{
            CreateToolhelp32Snapshot, Process32First, Process32Next, PROCESSENTRY32,
            TH32CS_SNAPPROCESS,
        };

        let mut children = Vec::new();

        unsafe {
            let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0);
            if snapshot == INVALID_HANDLE_VALUE {
                return Err(Error::Other(format!(
                    "CreateToolhelp32Snapshot failed: {}",
                    GetLastError()
                )));
            }

            let mut entry: PROCESSENTRY32 = std::mem::zeroed();
            entry.dwSize = std::mem::size_of::<PROCESSENTRY32>() as u32;

            if Process32First(snapshot, &mut entry) != 0 {
                loop {
                    if entry.th32ParentProcessID == parent_pid {
                        children.push(entry.th32ProcessID);
                    }

                    if Process32Next(snapshot, &mut entry) == 0 {
                        break;
                    }
                }
            }

            CloseHandle(snapshot);
        }

        Ok(children)
    }

    fn kill_process_tree(&self, root_pid: u32) -> Result<()> {
        let descendants = self.get_all_descendant_pids(root_pid);

        // Children before parents
        for pid in descendants.iter().rev() {
            if let Err(e) = terminate(*pid) {
                debug!("terminating descendant {} failed: {}", pid, e);
            }
        }

        terminate(root_pid)
    }
}

impl WindowsProcessTree {
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

fn terminate(pid: u32) -> Result<()> {
    use windows_sys::Win32::Foundation::{CloseHandle, GetLastError};
    use windows_sys::Win32::System::Threading::{OpenProcess, TerminateProcess, PROCESS_TERMINATE};

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            return Err(Error::KillFailed {
                pid,
                reason: format!("OpenProcess failed: {}", GetLastError()),
            });
        }

        let result = TerminateProcess(handle, 1);
        CloseHandle(handle);

        if result == 0 {
            return Err(Error::KillFailed {
                pid,
                reason: format!("TerminateProcess failed: {}", GetLastError()),
            });
        }
    }

    Ok(())
}
