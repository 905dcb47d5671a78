//! Report mailer.
//!
//! Sending a report is a request with a receipt or an error. Transient
//! failures can be retried with [`RetryingMailer`]; everything else surfaces
//! to the caller as a typed [`MailError`].

mod credentials;
mod retry;
mod simulated;

pub use credentials::RelayCredential;
pub use retry::RetryingMailer;
pub use simulated::{FailureMode, SimulatedMailer};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use margin_core::Role;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

lazy_static! {
    /// Email address pattern (RFC 5322 simplified), anchored
    pub static ref EMAIL_PATTERN: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ).unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("No recipients given")]
    NoRecipients,

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Invalid sender address: {0}")]
    InvalidSender(String),

    #[error("Mailer not configured: {0}")]
    NotConfigured(String),

    #[error("Temporary delivery failure: {0}")]
    Transient(String),

    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

impl MailError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, MailError::Transient(_))
    }
}

/// A rendered report addressed to one or more recipients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailReport {
    pub role: Role,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,

    /// Markdown body
    pub body: String,
}

impl EmailReport {
    pub fn new(
        role: Role,
        from: impl Into<String>,
        to: Vec<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            role,
            from: from.into(),
            to,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Reject a malformed sender or recipient list before any send attempt.
    pub fn validate(&self) -> Result<(), MailError> {
        if !EMAIL_PATTERN.is_match(&self.from) {
            return Err(MailError::InvalidSender(self.from.clone()));
        }
        if self.to.is_empty() {
            return Err(MailError::NoRecipients);
        }
        if let Some(bad) = self.to.iter().find(|addr| !EMAIL_PATTERN.is_match(addr)) {
            return Err(MailError::InvalidRecipient(bad.clone()));
        }
        Ok(())
    }
}

/// Proof of delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub message_id: String,
    pub from: String,
    pub recipients: usize,
    pub sent_at: DateTime<Utc>,

    /// Send attempts it took, including the successful one
    pub attempts: u32,
}

#[async_trait]
pub trait ReportMailer: Send + Sync {
    async fn send(&self, report: &EmailReport) -> Result<DeliveryReceipt, MailError>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(to: &[&str]) -> EmailReport {
        EmailReport::new(
            Role::Owner,
            "reports@bistro.com",
            to.iter().map(|s| s.to_string()).collect(),
            "Owner P&L Briefing",
            "# body",
        )
    }

    #[test]
    fn test_validate_recipients() {
        assert!(report(&["owner@bistro.com"]).validate().is_ok());
        assert_eq!(report(&[]).validate(), Err(MailError::NoRecipients));
        assert_eq!(
            report(&["owner@bistro.com", "not-an-address"]).validate(),
            Err(MailError::InvalidRecipient("not-an-address".to_string()))
        );
    }

    #[test]
    fn test_validate_sender() {
        let mut bad = report(&["owner@bistro.com"]);
        bad.from = "reports".to_string();
        assert_eq!(bad.validate(), Err(MailError::InvalidSender("reports".to_string())));
    }

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(MailError::Transient("timeout".into()).is_transient());
        assert!(!MailError::Rejected("spam".into()).is_transient());
        assert!(!MailError::NoRecipients.is_transient());
    }
}
