//! Backend health polling

use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Upper bound on a single health request
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(3);

/// Pause between failed attempts
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Stand-in deadline for timeouts too large to add to `Instant::now()`
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Body of the backend health endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Option<Value>,
    /// `Some(Value::Null)` for an explicit `null`, `None` when absent
    #[serde(default, deserialize_with = "present")]
    pub mongodb: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Database connectivity as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseStatus {
    Connected,
    /// Anything other than `"connected"`, rendered verbatim
    Degraded(String),
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl From<Value> for HealthReport {
    /// Any JSON body counts; only an object carries fields
    fn from(body: Value) -> Self {
        match body {
            Value::Object(_) => serde_json::from_value(body).unwrap_or_default(),
            _ => HealthReport::default(),
        }
    }
}

impl HealthReport {
    pub fn database_status(&self) -> DatabaseStatus {
        match &self.mongodb {
            Some(Value::String(s)) if s == "connected" => DatabaseStatus::Connected,
            Some(Value::String(s)) => DatabaseStatus::Degraded(s.clone()),
            Some(other) => DatabaseStatus::Degraded(other.to_string()),
            None => DatabaseStatus::Degraded("missing".to_string()),
        }
    }
}

impl fmt::Display for DatabaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseStatus::Connected => write!(f, "connected"),
            DatabaseStatus::Degraded(value) => write!(f, "{}", value),
        }
    }
}

/// `now + timeout`, saturating instead of overflowing
pub(crate) fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

/// Poll `url` until it returns JSON or `timeout` elapses
///
/// Neither a single request nor the pause between requests may run past the
/// deadline. On expiry the last transport or decode error is attached.
pub async fn wait_for_health(client: &HttpClient, url: &str, timeout: Duration) -> Result<HealthReport> {
    let deadline = deadline_after(timeout);
    let mut last_error: Option<String> = None;
    let mut attempts = 0u32;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        attempts += 1;
        match client.get_json::<Value>(url, remaining.min(ATTEMPT_TIMEOUT)).await {
            Ok(body) => {
                info!(attempts, "backend healthy");
                return Ok(HealthReport::from(body));
            }
            Err(e) => {
                debug!(attempts, "health check failed: {}", e);
                last_error = Some(e.to_string());
            }
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        sleep(remaining.min(POLL_INTERVAL)).await;
    }

    warn!(attempts, "backend did not become healthy within {:?}", timeout);
    Err(Error::HealthTimeout { timeout, last_error })
}
