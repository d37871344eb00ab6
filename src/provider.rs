//! Telephony provider checks through the backend
//!
//! The launcher never talks to the provider directly. It hands the
//! credentials to two backend routes: one verifies them, the other points
//! the phone number's webhooks at the tunnel URL. Neither outcome is fatal.

use crate::config::Credentials;
use crate::http::{truncate_body, HttpClient, HttpError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider segment of the backend routes
pub const PROVIDER: &str = "twilio";

pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);
pub const CONFIGURE_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest response body echoed back on HTTP errors
pub const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    account_sid: &'a str,
    auth_token: &'a str,
    phone_number: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigureRequest<'a> {
    account_sid: &'a str,
    auth_token: &'a str,
    phone_number: &'a str,
    base_url: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderReply {
    #[serde(default)]
    success: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

/// Result of one provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// Backend answered `success: true`
    Accepted,
    /// Backend answered without `success: true`
    Rejected { message: Option<String> },
    /// Backend answered with a non-2xx status
    HttpStatus { status: u16, body: String },
    /// Transport or decode failure
    Failed { error: String },
}

impl ProviderOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ProviderOutcome::Accepted)
    }

    fn from_reply(result: Result<ProviderReply, HttpError>) -> Self {
        match result {
            Ok(reply) if reply.success == Some(serde_json::Value::Bool(true)) => {
                ProviderOutcome::Accepted
            }
            Ok(reply) => ProviderOutcome::Rejected {
                message: reply.message.map(|m| match m {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                }),
            },
            Err(HttpError::Status { status, body, .. }) => ProviderOutcome::HttpStatus {
                status,
                body: truncate_body(&body, MAX_ERROR_BODY).to_string(),
            },
            Err(e) => ProviderOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

/// Verify credentials; `None` when SID or token is missing
pub async fn verify_credentials(
    client: &HttpClient,
    api_base: &str,
    credentials: &Credentials,
) -> Option<ProviderOutcome> {
    let (Some(account_sid), Some(auth_token)) = (
        credentials.account_sid.as_deref(),
        credentials.auth_token.as_deref(),
    ) else {
        return None;
    };

    let url = format!("{}/api/{}/verify-credentials", api_base, PROVIDER);
    let payload = VerifyRequest {
        account_sid,
        auth_token: auth_token.as_str(),
        phone_number: credentials.phone_number.as_deref(),
    };

    let outcome = ProviderOutcome::from_reply(client.post_json(&url, &payload, VERIFY_TIMEOUT).await);
    debug!(accepted = outcome.is_accepted(), "credential verification finished");
    Some(outcome)
}

/// Point the number's webhooks at `base_url`; `None` unless all three
/// credential fields are present
pub async fn configure_webhooks(
    client: &HttpClient,
    api_base: &str,
    credentials: &Credentials,
    base_url: &str,
) -> Option<ProviderOutcome> {
    let (Some(account_sid), Some(auth_token), Some(phone_number)) = (
        credentials.account_sid.as_deref(),
        credentials.auth_token.as_deref(),
        credentials.phone_number.as_deref(),
    ) else {
        return None;
    };

    let url = format!("{}/api/{}/configure-webhooks", api_base, PROVIDER);
    let payload = ConfigureRequest {
        account_sid,
        auth_token: auth_token.as_str(),
        phone_number,
        base_url,
    };

    let outcome =
        ProviderOutcome::from_reply(client.post_json(&url, &payload, CONFIGURE_TIMEOUT).await);
    debug!(accepted = outcome.is_accepted(), "webhook configuration finished");
    Some(outcome)
}
