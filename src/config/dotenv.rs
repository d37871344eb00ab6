//! Env File Loading
//!
//! Reads `KEY=VALUE` files such as `server/.env` into a map. Values are
//! never logged; only key names and counts are.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Parsed env file contents
pub type EnvMap = HashMap<String, String>;

/// Load an env file, returning an empty map if it does not exist
pub fn load_env_file(path: &Path) -> Result<EnvMap> {
    if !path.exists() {
        debug!("env file {} not found", path.display());
        return Ok(EnvMap::new());
    }

    let bytes = fs::read(path)?;
    let env = parse_env(&String::from_utf8_lossy(&bytes));
    debug!(keys = env.len(), "loaded env file {}", path.display());
    Ok(env)
}

/// Parse env file content
///
/// Blank lines and `#` comments are ignored, as are lines without `=` or
/// with an empty key. Only the first `=` splits key from value.
pub fn parse_env(content: &str) -> EnvMap {
    let mut env = EnvMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        env.insert(key.to_string(), strip_quotes(value.trim()).to_string());
    }

    env
}

/// Strip exactly one layer of matching single or double quotes
pub fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
