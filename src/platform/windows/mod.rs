//! Windows-specific platform implementations

mod console;
mod filesystem;
mod ports;
mod process;

pub use console::NewConsole;
pub use filesystem::WindowsFilesystem;
pub use ports::NetstatPorts;
pub use process::WindowsProcessTree;
