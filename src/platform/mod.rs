//! Platform abstraction layer
//!
//! Port-to-process mapping, process tree termination, detached spawning and
//! PATH lookup differ between Windows and Unix. Each gets a trait in
//! [`traits`] and an implementation per platform; platforms without port
//! mapping get a no-op that reports no listeners.

pub mod netstat;
mod traits;
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

pub use traits::*;

use std::collections::BTreeSet;

/// Platform implementation factory
pub struct Platform;

impl Platform {
    /// Get the platform-specific port mapping operations
    pub fn ports() -> Box<dyn PortOps> {
        #[cfg(windows)]
        {
            Box::new(windows::NetstatPorts::new())
        }

        #[cfg(target_os = "linux")]
        {
            Box::new(unix::ProcNetPorts::new())
        }

        #[cfg(not(any(windows, target_os = "linux")))]
        {
            Box::new(NoPortMapping)
        }
    }

    /// Get the platform-specific process tree operations
    pub fn process_tree() -> Box<dyn ProcessTreeOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixProcessTree::new())
        }

        #[cfg(windows)]
        {
            Box::new(windows::WindowsProcessTree::new())
        }

        #[cfg(not(any(unix, windows)))]
        {
            compile_error!("Unsupported platform");
        }
    }

    /// Get the platform-specific detached spawner
    pub fn console() -> Box<dyn ConsoleOps> {
        #[cfg(unix)]
        {
            Box::new(unix::SessionConsole::new())
        }

        #[cfg(windows)]
        {
            Box::new(windows::NewConsole::new())
        }

        #[cfg(not(any(unix, windows)))]
        {
            compile_error!("Unsupported platform");
        }
    }

    /// Get the platform-specific filesystem operations
    pub fn filesystem() -> Box<dyn FilesystemOps> {
        #[cfg(unix)]
        {
            Box::new(unix::UnixFilesystem::new())
        }

        #[cfg(windows)]
        {
            Box::new(windows::WindowsFilesystem::new())
        }

        #[cfg(not(any(unix, windows)))]
        {
            compile_error!("Unsupported platform");
        }
    }
}

/// All platform capabilities the orchestrator needs, bundled for injection
pub struct Capabilities {
    pub ports: Box<dyn PortOps>,
    pub process_tree: Box<dyn ProcessTreeOps>,
    pub console: Box<dyn ConsoleOps>,
    pub filesystem: Box<dyn FilesystemOps>,
}

impl Capabilities {
    /// Capabilities of the running platform
    pub fn native() -> Self {
        Self {
            ports: Platform::ports(),
            process_tree: Platform::process_tree(),
            console: Platform::console(),
            filesystem: Platform::filesystem(),
        }
    }
}

/// Port mapping for platforms that cannot do it
#[derive(Debug, Default)]
pub struct NoPortMapping;

impl PortOps for NoPortMapping {
    fn listening_pids(&self, _port: u16) -> BTreeSet<u32> {
        BTreeSet::new()
    }

    fn supports_port_mapping(&self) -> bool {
        false
    }
}
