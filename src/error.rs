//! Error types and Result aliases for devup

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::http::HttpError;

/// Result type alias for devup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code used when a required configuration value is missing
pub const EXIT_MISSING_CONFIG: i32 = 2;

/// Exit code used for every other fatal error
pub const EXIT_FAILURE: i32 = 1;

/// Main error type for devup
#[derive(Debug)]
pub enum Error {
    // === Prerequisite errors ===
    /// One or more required tools are not on PATH
    MissingTools {
        tools: Vec<String>,
    },

    // === Configuration errors ===
    /// The backend env file does not define a required key
    MissingConfigKey {
        path: PathBuf,
        key: String,
    },

    /// Failed to read or parse the launcher configuration file
    ConfigParseFailed {
        path: PathBuf,
        reason: String,
    },

    // === Process errors ===
    /// A blocking dependency installation exited unsuccessfully
    InstallFailed {
        dir: PathBuf,
        command: String,
        code: Option<i32>,
    },

    /// Failed to spawn a detached process
    SpawnFailed {
        name: String,
        reason: String,
    },

    /// Failed to terminate a process
    KillFailed {
        pid: u32,
        reason: String,
    },

    // === Health errors ===
    /// The backend never answered its health endpoint before the deadline
    HealthTimeout {
        timeout: Duration,
        last_error: Option<String>,
    },

    // === I/O and transport errors ===
    /// HTTP transport, status, or decode errors
    Http(HttpError),

    /// I/O errors
    Io(std::io::Error),

    /// Generic errors
    Other(String),
}

impl Error {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingConfigKey { .. } => EXIT_MISSING_CONFIG,
            Error::InstallFailed { code, .. } => match code {
                Some(code) if *code != 0 => *code,
                _ => EXIT_FAILURE,
            },
            _ => EXIT_FAILURE,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingTools { tools } => {
                write!(f, "Missing required tools in PATH: {}", tools.join(", "))
            }

            Error::MissingConfigKey { path, key } => {
                write!(f, "{} is missing {}", path.display(), key)
            }
            Error::ConfigParseFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }

            Error::InstallFailed { dir, command, code } => match code {
                Some(code) => write!(
                    f,
                    "'{}' in {} exited with code {}",
                    command,
                    dir.display(),
                    code
                ),
                None => write!(
                    f,
                    "'{}' in {} was terminated by a signal",
                    command,
                    dir.display()
                ),
            },
            Error::SpawnFailed { name, reason } => {
                write!(f, "Failed to start {}: {}", name, reason)
            }
            Error::KillFailed { pid, reason } => {
                write!(f, "Failed to terminate process {}: {}", pid, reason)
            }

            Error::HealthTimeout { last_error, .. } => match last_error {
                Some(err) => write!(
                    f,
                    "Backend did not become healthy in time. Last error: {}",
                    err
                ),
                None => write!(f, "Backend did not become healthy in time"),
            },

            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<HttpError> for Error {
    fn from(err: HttpError) -> Self {
        Error::Http(err)
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
