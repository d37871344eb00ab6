//! Telephony provider credentials
//!
//! Credentials come from the launcher's own process environment, never from
//! the backend env file. They are read once and passed into the
//! orchestrator explicitly.

use std::env;
use std::fmt;
use zeroize::Zeroizing;

/// Environment variable holding the account identifier
pub const ACCOUNT_SID_VAR: &str = "TWILIO_ACCOUNT_SID";
/// Environment variable holding the auth token
pub const AUTH_TOKEN_VAR: &str = "TWILIO_AUTH_TOKEN";
/// Environment variable holding the phone number
pub const PHONE_NUMBER_VAR: &str = "TWILIO_PHONE_NUMBER";

/// Account identifier, secret and phone number for the provider
#[derive(Clone, Default)]
pub struct Credentials {
    pub account_sid: Option<String>,
    pub auth_token: Option<Zeroizing<String>>,
    pub phone_number: Option<String>,
}

impl Credentials {
    /// Read credentials from the current process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build credentials from an arbitrary variable lookup
    ///
    /// Empty values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            account_sid: get(ACCOUNT_SID_VAR),
            auth_token: get(AUTH_TOKEN_VAR).map(Zeroizing::new),
            phone_number: get(PHONE_NUMBER_VAR),
        }
    }

    /// Account SID and token are both present; phone number is optional
    pub fn can_verify(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some()
    }

    /// All three fields are present
    pub fn can_configure_webhooks(&self) -> bool {
        self.can_verify() && self.phone_number.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_sid", &self.account_sid.as_deref().map(mask))
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("phone_number", &self.phone_number.as_deref().map(mask))
            .finish()
    }
}

/// Mask a secret for display: first 3 and last 3 characters
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 6 {
        return "***".to_string();
    }

    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{}…{}", head, tail)
}
