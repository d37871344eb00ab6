//! Windows filesystem operations

use crate::platform::traits::FilesystemOps;
use std::env;
use std::path::{Path, PathBuf};

const EXECUTABLE_EXTENSIONS: [&str; 6] = ["", ".exe", ".bat", ".cmd", ".ps1", ".com"];

pub struct WindowsFilesystem;

impl WindowsFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl FilesystemOps for WindowsFilesystem {
    fn is_executable(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                matches!(
                    ext.to_lowercase().as_str(),
                    "exe" | "bat" | "cmd" | "ps1" | "com"
                )
            })
            .unwrap_or(false)
    }

    fn find_command(&self, command: &str) -> Option<PathBuf> {
        let path_env = env::var_os("PATH")?;

        for dir in env::split_paths(&path_env) {
            for ext in EXECUTABLE_EXTENSIONS {
                let candidate = dir.join(format!("{}{}", command, ext));
                if self.is_executable(&candidate) {
                    return Some(candidate);
                }
            }
        }

        None
    }
}
