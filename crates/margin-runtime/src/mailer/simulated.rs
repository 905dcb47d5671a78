//! Mailer that simulates delivery latency instead of talking to a relay.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use super::{DeliveryReceipt, EmailReport, MailError, RelayCredential, ReportMailer};
use crate::config::MailerConfig;

/// Scripted failure behavior, for exercising error paths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    Never,

    /// The first `n` sends fail transiently, then sends succeed
    TransientFirst(u32),

    /// Every send is rejected
    Reject(String),
}

pub struct SimulatedMailer {
    delay: Duration,
    failure: FailureMode,
    credential: Option<RelayCredential>,
    calls: AtomicU32,
    sent: AtomicU64,
}

impl SimulatedMailer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: FailureMode::Never,
            credential: None,
            calls: AtomicU32::new(0),
            sent: AtomicU64::new(0),
        }
    }

    /// Build from config. A configured `api_key_env` must resolve.
    pub fn from_config(config: &MailerConfig) -> Result<Self, MailError> {
        let mut mailer = Self::new(config.delay);
        if let Some(env_var) = &config.api_key_env {
            mailer.credential = Some(RelayCredential::from_env(env_var)?);
        }
        Ok(mailer)
    }

    pub fn with_failure(mut self, failure: FailureMode) -> Self {
        self.failure = failure;
        self
    }

    pub fn with_credential(mut self, credential: RelayCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Send attempts seen, successful or not.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Reports actually delivered.
    pub fn delivered(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportMailer for SimulatedMailer {
    async fn send(&self, report: &EmailReport) -> Result<DeliveryReceipt, MailError> {
        report.validate()?;

        if let Some(credential) = &self.credential {
            if credential.expose().is_empty() {
                return Err(MailError::NotConfigured(format!(
                    "relay API key in {} is empty",
                    credential.env_var()
                )));
            }
        }

        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;

        match &self.failure {
            FailureMode::TransientFirst(n) if call <= *n => {
                return Err(MailError::Transient(format!("relay timeout on attempt {}", call)));
            }
            FailureMode::Reject(reason) => return Err(MailError::Rejected(reason.clone())),
            _ => {}
        }

        let seq = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            role = %report.role,
            from = %report.from,
            recipients = report.to.len(),
            subject = %report.subject,
            "Report delivered"
        );

        Ok(DeliveryReceipt {
            message_id: format!("sim-{:06}", seq),
            from: report.from.clone(),
            recipients: report.to.len(),
            sent_at: Utc::now(),
            attempts: 1,
        })
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
