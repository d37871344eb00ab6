//! Linux port-to-process mapping via /proc
//!
//! Listening sockets come from `/proc/net/tcp{,6}`; their inodes are then
//! matched against the `socket:[inode]` links under `/proc/<pid>/fd`.

use crate::platform::traits::PortOps;
use std::collections::{BTreeSet, HashSet};
use std::fs;

/// Socket state code for LISTEN
const TCP_LISTEN: &str = "0A";

const PROC_NET_TABLES: [&str; 2] = ["/proc/net/tcp", "/proc/net/tcp6"];

pub struct ProcNetPorts;

impl ProcNetPorts {
    pub fn new() -> Self {
        Self
    }
}

impl PortOps for ProcNetPorts {
    fn listening_pids(&self, port: u16) -> BTreeSet<u32> {
        let mut inodes = HashSet::new();
        for table in PROC_NET_TABLES {
            match fs::read_to_string(table) {
                Ok(content) => inodes.extend(parse_listening_inodes(&content, port)),
                Err(e) => debug!("cannot read {}: {}", table, e),
            }
        }

        if inodes.is_empty() {
            return BTreeSet::new();
        }
        pids_owning_inodes(&inodes)
    }

    fn supports_port_mapping(&self) -> bool {
        true
    }
}

/// Inodes of LISTEN sockets bound to `port` in a `/proc/net/tcp` table
pub(crate) fn parse_listening_inodes(content: &str, port: u16) -> HashSet<u64> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < 10 || columns[3] != TCP_LISTEN {
                return None;
            }

            let (_, port_hex) = columns[1].rsplit_once(':')?;
            let local_port = u16::from_str_radix(port_hex, 16).ok()?;
            if local_port != port {
                return None;
            }

            columns[9].parse::<u64>().ok().filter(|inode| *inode != 0)
        })
        .collect()
}

fn pids_owning_inodes(inodes: &HashSet<u64>) -> BTreeSet<u32> {
    let mut pids = BTreeSet::new();
    let Ok(proc_dir) = fs::read_dir("/proc") else {
        return pids;
    };

    for entry in proc_dir.flatten() {
        let Some(pid) = entry
            .file_name()
            .to_str()
            .and_then(|name| name.parse::<u32>().ok())
        else {
            continue;
        };

        // Other users' processes are unreadable without privileges
        let Ok(fds) = fs::read_dir(entry.path().join("fd")) else {
            continue;
        };

        let owns = fds.flatten().any(|fd| {
            fs::read_link(fd.path())
                .ok()
                .and_then(|target| socket_inode(&target.to_string_lossy()))
                .is_some_and(|inode| inodes.contains(&inode))
        });

        if owns {
            pids.insert(pid);
        }
    }

    pids
}

fn socket_inode(link: &str) -> Option<u64> {
    link.strip_prefix("socket:[")?.strip_suffix(']')?.parse().ok()
}
