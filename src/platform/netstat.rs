//! `netstat -ano` output parsing
//!
//! A listening row looks like:
//!
//! ```text
//!   TCP    0.0.0.0:5000           0.0.0.0:0              LISTENING       9664
//! ```

use regex::Regex;
use std::collections::BTreeSet;

/// Minimum number of columns in a usable row
const MIN_COLUMNS: usize = 5;

/// PIDs of rows in `LISTENING` state bound to `port`
pub fn parse_listening_pids(output: &str, port: u16) -> BTreeSet<u32> {
    let mut pids = BTreeSet::new();

    let port_pattern = match Regex::new(&format!(r":{}\s", port)) {
        Ok(re) => re,
        Err(e) => {
            warn!("invalid port pattern for {}: {}", port, e);
            return pids;
        }
    };

    for line in output.lines() {
        if !line.contains("LISTENING") || !port_pattern.is_match(line) {
            continue;
        }

        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < MIN_COLUMNS {
            continue;
        }

        if let Some(pid) = columns.last().and_then(|pid| pid.parse::<u32>().ok()) {
            pids.insert(pid);
        }
    }

    pids
}
