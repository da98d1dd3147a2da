//! Contact-form orchestration

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::contact::assist::AssistClient;
use crate::contact::mailer::Mailer;
use crate::contact::render;
use crate::contact::types::ContactSubmission;
use crate::error::Result;

/// Delivers contact submissions and serves the review feature
pub struct ContactService {
    assist: AssistClient,
    mailer: Arc<dyn Mailer>,
    mail: MailConfig,
    studio_name: String,
}

impl ContactService {
    pub fn new(
        assist: AssistClient,
        mailer: Arc<dyn Mailer>,
        mail: MailConfig,
        studio_name: impl Into<String>,
    ) -> Self {
        Self {
            assist,
            mailer,
            mail,
            studio_name: studio_name.into(),
        }
    }

    /// Deliver a submission to the studio inbox
    ///
    /// Only the studio copy decides the outcome. The acknowledgement goes out
    /// after it succeeds and its failure is logged, not returned.
    pub async fn submit(&self, submission: &ContactSubmission) -> Result<()> {
        let subject = self
            .assist
            .generate_subject(&submission.name, &submission.message)
            .await;

        let notification =
            render::studio_notification(submission, &subject, Utc::now(), &self.mail);
        self.mailer.deliver(&notification).await?;
        info!(
            mailer = self.mailer.name(),
            subject = %subject,
            "Delivered contact submission to studio"
        );

        if self.mail.send_acknowledgement {
            let ack = render::acknowledgement(submission, &self.studio_name, &self.mail);
            if let Err(e) = self.mailer.deliver(&ack).await {
                warn!(
                    error_type = e.category(),
                    error_message = %e,
                    "Acknowledgement delivery failed, continuing"
                );
            }
        }

        Ok(())
    }

    /// Advisory feedback on a message; always returns text
    pub async fn review(&self, submission: &ContactSubmission) -> String {
        self.assist
            .review_message(&submission.name, &submission.email, &submission.message)
            .await
    }
}
