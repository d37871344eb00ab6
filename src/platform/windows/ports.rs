//! Windows port-to-process mapping via netstat

use crate::launcher::run_capture;
use crate::platform::netstat::parse_listening_pids;
use crate::platform::traits::PortOps;
use std::collections::BTreeSet;

pub struct NetstatPorts;

impl NetstatPorts {
    pub fn new() -> Self {
        Self
    }
}

impl PortOps for NetstatPorts {
    fn listening_pids(&self, port: u16) -> BTreeSet<u32> {
        let result = run_capture("netstat", &["-ano", "-p", "TCP"], None);
        if !result.success {
            debug!("netstat failed: {}", result.stderr.trim());
            return BTreeSet::new();
        }
        parse_listening_pids(&result.stdout, port)
    }

    fn supports_port_mapping(&self) -> bool {
        true
    }
}
