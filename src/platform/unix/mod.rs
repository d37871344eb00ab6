//! Unix-specific platform implementations

mod console;
mod filesystem;
#[cfg(target_os = "linux")]
mod ports;
mod process;

pub use console::SessionConsole;
pub use filesystem::UnixFilesystem;
#[cfg(target_os = "linux")]
pub use ports::ProcNetPorts;
pub use process::UnixProcessTree;
