//! HTTP client helpers
//!
//! Thin wrappers over `reqwest` used for health checks, tunnel discovery and
//! provider calls. Every call takes its own timeout and none of them retry.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Client identifier sent with every request
pub const USER_AGENT: &str = concat!("devup/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16, body: String },

    #[error("failed to encode request body for {url}: {source}")]
    Encode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HttpError {
    /// Status code for non-2xx responses
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Shared HTTP client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                warn!("failed to build configured HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });
        Self { client }
    }

    /// GET a URL and decode its JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<T, HttpError> {
        let request = self.client.get(url).timeout(timeout);
        let body = self.send(url, request).await?;
        decode(url, &body)
    }

    /// GET a URL and return only its status code
    pub async fn get_status(&self, url: &str, timeout: Duration) -> Result<u16, HttpError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| transport(url, source))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(status.as_u16())
    }

    /// POST a JSON payload and decode the JSON reply
    pub async fn post_json<P, T>(&self, url: &str, payload: &P, timeout: Duration) -> Result<T, HttpError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_vec(payload).map_err(|source| HttpError::Encode {
            url: url.to_string(),
            source,
        })?;

        let request = self
            .client
            .post(url)
            .timeout(timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        let body = self.send(url, request).await?;
        decode(url, &body)
    }

    async fn send(&self, url: &str, request: reqwest::RequestBuilder) -> Result<String, HttpError> {
        let response = request.send().await.map_err(|source| transport(url, source))?;
        let status = response.status();
        let body = response.text().await.map_err(|source| transport(url, source))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "non-success response from {}", url);
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn transport(url: &str, source: reqwest::Error) -> HttpError {
    HttpError::Transport {
        url: url.to_string(),
        source,
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, HttpError> {
    serde_json::from_str(body).map_err(|source| HttpError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Truncate a response body for display, on a character boundary
pub fn truncate_body(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
