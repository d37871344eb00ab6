//! Network probing
//!
//! LAN address discovery for the printed links and TCP liveness checks used
//! to keep launches idempotent.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Timeout for a single liveness probe
pub const LIVENESS_TIMEOUT: Duration = Duration::from_millis(300);

/// Address used only to let the OS pick the outbound interface
const ROUTE_PROBE_ADDR: &str = "8.8.8.8:80";

/// One way of discovering the machine's LAN address
pub trait AddressStrategy {
    fn name(&self) -> &'static str;

    /// Best-effort discovery; `None` on any failure
    fn discover(&self) -> Option<IpAddr>;
}

/// Connect a UDP socket and read back the local address the OS chose
///
/// No packet is sent; UDP `connect` only selects a route.
pub struct UdpRouteStrategy;

impl AddressStrategy for UdpRouteStrategy {
    fn name(&self) -> &'static str {
        "udp-route"
    }

    fn discover(&self) -> Option<IpAddr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
        socket.connect(ROUTE_PROBE_ADDR).ok()?;
        socket.local_addr().ok().map(|addr| addr.ip())
    }
}

/// Resolve the local hostname
pub struct HostnameStrategy;

impl AddressStrategy for HostnameStrategy {
    fn name(&self) -> &'static str {
        "hostname"
    }

    fn discover(&self) -> Option<IpAddr> {
        let name = hostname::get().ok()?.into_string().ok()?;
        (name.as_str(), 0)
            .to_socket_addrs()
            .ok()?
            .map(|addr| addr.ip())
            .find(IpAddr::is_ipv4)
    }
}

/// Try each strategy in order; first non-loopback answer wins
pub fn resolve_lan_address(strategies: &[&dyn AddressStrategy]) -> IpAddr {
    for strategy in strategies {
        match strategy.discover() {
            Some(ip) if !ip.is_loopback() && !ip.is_unspecified() => {
                debug!(strategy = strategy.name(), %ip, "resolved LAN address");
                return ip;
            }
            Some(ip) => {
                debug!(strategy = strategy.name(), %ip, "ignoring loopback address");
            }
            None => {
                debug!(strategy = strategy.name(), "no address");
            }
        }
    }
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

/// LAN address using the default strategies
pub fn find_lan_ip() -> IpAddr {
    resolve_lan_address(&[&UdpRouteStrategy, &HostnameStrategy])
}

/// Whether something accepts TCP connections on `127.0.0.1:port`
pub async fn is_listening(port: u16) -> bool {
    is_listening_on(SocketAddr::from((Ipv4Addr::LOCALHOST, port)), LIVENESS_TIMEOUT).await
}

/// Whether `addr` accepts a TCP connection within `limit`
///
/// Every connect error counts as "not listening".
pub async fn is_listening_on(addr: SocketAddr, limit: Duration) -> bool {
    match timeout(limit, TcpStream::connect(addr)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            trace!("{} not listening: {}", addr, e);
            false
        }
        Err(_) => {
            trace!("{} probe timed out", addr);
            false
        }
    }
}
