//! Tunnel public URL discovery
//!
//! The tunnel agent exposes a local status API listing its tunnels. The
//! launcher polls it briefly after starting the agent; no URL is not an
//! error, the link is just left out of the report.

use crate::health::deadline_after;
use crate::http::HttpClient;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Timeout for one status API request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Pause between polls
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Default, Deserialize)]
struct TunnelList {
    #[serde(default)]
    tunnels: Vec<Tunnel>,
}

#[derive(Debug, Deserialize)]
struct Tunnel {
    #[serde(default)]
    public_url: Option<serde_json::Value>,
}

/// First HTTP(S) public URL in a status API body
pub fn first_public_url(body: &serde_json::Value) -> Option<String> {
    let list: TunnelList = serde_json::from_value(body.clone()).ok()?;
    list.tunnels.into_iter().find_map(|tunnel| match tunnel.public_url {
        Some(serde_json::Value::String(url)) if url.starts_with("http") => Some(url),
        _ => None,
    })
}

/// Poll the status API until a public URL appears or `timeout` elapses
pub async fn discover_public_url(client: &HttpClient, api_url: &str, timeout: Duration) -> Option<String> {
    let deadline = deadline_after(timeout);

    while Instant::now() < deadline {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match client
            .get_json::<serde_json::Value>(api_url, remaining.min(REQUEST_TIMEOUT))
            .await
        {
            Ok(body) => {
                if let Some(url) = first_public_url(&body) {
                    info!("tunnel public URL {}", url);
                    return Some(url);
                }
                trace!("tunnel API has no public URL yet");
            }
            Err(e) => trace!("tunnel API not ready: {}", e),
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        sleep(remaining.min(POLL_INTERVAL)).await;
    }

    warn!("no tunnel public URL within {:?}", timeout);
    None
}
