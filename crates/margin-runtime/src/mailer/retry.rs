//! Retry wrapper for any [`ReportMailer`].
//!
//! Only transient failures are retried. Validation errors and rejections
//! return on the first attempt.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::sync::atomic::{AtomicU32, Ordering};

use super::{DeliveryReceipt, EmailReport, MailError, ReportMailer};
use crate::config::RetryConfig;

pub struct RetryingMailer<M> {
    inner: M,
    config: RetryConfig,
}

impl<M: ReportMailer> RetryingMailer<M> {
    pub fn new(inner: M, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.config.min_delay)
            .with_max_delay(self.config.max_delay)
            .with_max_times(self.config.max_retries)
    }
}

#[async_trait]
impl<M: ReportMailer> ReportMailer for RetryingMailer<M> {
    async fn send(&self, report: &EmailReport) -> Result<DeliveryReceipt, MailError> {
        report.validate()?;

        let counter = AtomicU32::new(0);
        let attempts = &counter;
        let inner = &self.inner;

        let mut receipt = (|| async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            inner.send(report).await
        })
        .retry(self.backoff())
        .sleep(tokio::time::sleep)
        .when(MailError::is_transient)
        .notify(|err, delay| {
            tracing::warn!(
                mailer = inner.name(),
                error = %err,
                retry_in = ?delay,
                "Report delivery failed, retrying"
            );
        })
        .await?;

        receipt.attempts = counter.load(Ordering::SeqCst);
        Ok(receipt)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::{FailureMode, SimulatedMailer};
    use margin_core::Role;
    use std::time::Duration;

    fn report() -> EmailReport {
        EmailReport::new(Role::Gm, "reports@bistro.com", vec!["gm@bistro.com".to_string()], "GM", "body")
    }

    fn config(max_retries: usize) -> RetryConfig {
        RetryConfig {
            max_retries,
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_failures() {
        let sim = SimulatedMailer::new(Duration::ZERO).with_failure(FailureMode::TransientFirst(2));
        let mailer = RetryingMailer::new(sim, config(3));

        let receipt = mailer.send(&report()).await.unwrap();
        assert_eq!(receipt.attempts, 3);
        assert_eq!(mailer.inner().calls(), 3);
        assert_eq!(mailer.inner().delivered(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let sim = SimulatedMailer::new(Duration::ZERO).with_failure(FailureMode::TransientFirst(10));
        let mailer = RetryingMailer::new(sim, config(2));

        let result = mailer.send(&report()).await;
        assert!(matches!(result, Err(MailError::Transient(_))));
        assert_eq!(mailer.inner().calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_not_retried() {
        let sim = SimulatedMailer::new(Duration::ZERO).with_failure(FailureMode::Reject("spam".into()));
        let mailer = RetryingMailer::new(sim, config(3));

        assert_eq!(mailer.send(&report()).await, Err(MailError::Rejected("spam".to_string())));
        assert_eq!(mailer.inner().calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_report_never_reaches_inner() {
        let mailer = RetryingMailer::new(SimulatedMailer::new(Duration::ZERO), config(3));
        let empty = EmailReport::new(Role::Gm, "reports@bistro.com", vec![], "GM", "body");

        assert_eq!(mailer.send(&empty).await, Err(MailError::NoRecipients));
        assert_eq!(mailer.inner().calls(), 0);
    }
}
