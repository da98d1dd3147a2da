//! Test utilities shared by unit and integration tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::contact::{Mailer, OutboundMail};
use crate::error::{Result, StudioError};

/// Mailer that records every delivery attempt instead of sending it
///
/// Can be switched to fail all deliveries, or only those addressed to a
/// given recipient.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    attempts: Mutex<Vec<OutboundMail>>,
    fail_all: AtomicBool,
    fail_recipient: Option<String>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mailer whose every delivery fails
    pub fn failing() -> Self {
        Self {
            fail_all: AtomicBool::new(true),
            ..Self::default()
        }
    }

    /// Mailer that fails only deliveries to `recipient`
    pub fn failing_for(recipient: impl Into<String>) -> Self {
        Self {
            fail_recipient: Some(recipient.into()),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_all.store(failing, Ordering::SeqCst);
    }

    /// Every delivery attempt, successful or not, in order
    pub async fn attempts(&self) -> Vec<OutboundMail> {
        self.attempts.lock().await.clone()
    }

    pub async fn attempt_count(&self) -> usize {
        self.attempts.lock().await.len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn deliver(&self, mail: &OutboundMail) -> Result<()> {
        self.attempts.lock().await.push(mail.clone());

        let rejected = self.fail_all.load(Ordering::SeqCst)
            || self.fail_recipient.as_deref() == Some(mail.to.as_str());
        if rejected {
            return Err(StudioError::Delivery(format!(
                "Mock delivery to {} failed",
                mail.to
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mail_to(to: &str) -> OutboundMail {
        OutboundMail {
            from_name: "Ana".to_string(),
            reply_to: "ana@example.com".to_string(),
            to: to.to_string(),
            subject: "s".to_string(),
            text: "t".to_string(),
            html: "h".to_string(),
        }
    }

    #[tokio::test]
    async fn recording_mailer_records_attempts() {
        let mailer = RecordingMailer::new();
        mailer.deliver(&mail_to("a@b.c")).await.unwrap();
        assert_eq!(mailer.attempt_count().await, 1);
        assert_eq!(mailer.attempts().await[0].to, "a@b.c");
    }

    #[tokio::test]
    async fn recording_mailer_fails_for_recipient() {
        let mailer = RecordingMailer::failing_for("x@y.z");
        assert!(mailer.deliver(&mail_to("a@b.c")).await.is_ok());
        assert!(mailer.deliver(&mail_to("x@y.z")).await.is_err());
        assert_eq!(mailer.attempt_count().await, 2);
    }

    #[tokio::test]
    async fn recording_mailer_toggle_failing() {
        let mailer = RecordingMailer::new();
        mailer.set_failing(true);
        assert!(mailer.deliver(&mail_to("a@b.c")).await.is_err());
        mailer.set_failing(false);
        assert!(mailer.deliver(&mail_to("a@b.c")).await.is_ok());
    }
}
