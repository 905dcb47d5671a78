//! Relay credential handling.
//!
//! The API key is wrapped in a `SecretString` as soon as it is read, so it
//! never shows up in Debug output or logs.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::MailError;

pub struct RelayCredential {
    value: SecretString,
    env_var: String,
}

impl RelayCredential {
    pub fn new(value: impl Into<String>, env_var: impl Into<String>) -> Self {
        Self {
            value: SecretString::from(value.into()),
            env_var: env_var.into(),
        }
    }

    /// Read the key from an environment variable.
    pub fn from_env(env_var: &str) -> Result<Self, MailError> {
        match std::env::var(env_var) {
            Ok(v) if !v.trim().is_empty() => Ok(Self::new(v, env_var)),
            _ => Err(MailError::NotConfigured(format!(
                "relay API key not set in {}",
                env_var
            ))),
        }
    }

    /// Explicit exposure, for building the relay request.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }
}

impl fmt::Debug for RelayCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayCredential")
            .field("value", &"[REDACTED]")
            .field("env_var", &self.env_var)
            .finish()
    }
}
