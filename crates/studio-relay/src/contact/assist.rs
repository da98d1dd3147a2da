//! Advisory completion calls for the contact form
//!
//! Both calls are best-effort: any failure is logged and replaced with a
//! deterministic fallback, so the contact flow never fails because of them.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::chat::UpstreamClient;
use crate::contact::prompts::{
    REVIEW_SYSTEM_PROMPT, SUBJECT_SYSTEM_PROMPT, review_prompt, subject_prompt,
};

/// Feedback returned when the review call fails
pub const FALLBACK_REVIEW: &str = "Your message looks good to go!";

/// Subject used when generation fails
pub fn fallback_subject(name: &str) -> String {
    format!("New inquiry from {name}")
}

/// Subject-line and review client
#[derive(Debug, Clone)]
pub struct AssistClient {
    upstream: Arc<UpstreamClient>,
    subject_max_tokens: u32,
    review_max_tokens: u32,
}

impl AssistClient {
    pub fn new(upstream: Arc<UpstreamClient>) -> Self {
        let config = upstream.config();
        Self {
            subject_max_tokens: config.subject_max_tokens,
            review_max_tokens: config.review_max_tokens,
            upstream,
        }
    }

    /// Generate a subject line, falling back to `New inquiry from {name}`
    pub async fn generate_subject(&self, name: &str, message: &str) -> String {
        let result = self
            .upstream
            .complete(
                SUBJECT_SYSTEM_PROMPT,
                &subject_prompt(name, message),
                self.subject_max_tokens,
            )
            .await;

        match result {
            Ok(raw) => match clean_subject(&raw) {
                Some(subject) => {
                    debug!("Generated subject: {subject}");
                    subject
                }
                None => {
                    warn!(error_type = "upstream", "Generated subject was blank, using fallback");
                    fallback_subject(name)
                }
            },
            Err(e) => {
                warn!(
                    error_type = e.category(),
                    error_message = %e,
                    "Subject generation failed, using fallback"
                );
                fallback_subject(name)
            }
        }
    }

    /// Review a message before sending; never signals rejection
    pub async fn review_message(&self, name: &str, email: &str, message: &str) -> String {
        let result = self
            .upstream
            .complete(
                REVIEW_SYSTEM_PROMPT,
                &review_prompt(name, email, message),
                self.review_max_tokens,
            )
            .await;

        match result {
            Ok(feedback) => feedback,
            Err(e) => {
                warn!(
                    error_type = e.category(),
                    error_message = %e,
                    "Message review failed, using fallback"
                );
                FALLBACK_REVIEW.to_string()
            }
        }
    }
}

/// First non-blank line, without wrapping quotes or a `Subject:` prefix
fn clean_subject(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|line| !line.is_empty())?;
    let line = line
        .strip_prefix("Subject:")
        .or_else(|| line.strip_prefix("subject:"))
        .unwrap_or(line);
    let subject = line.trim().trim_matches(|c| c == '"' || c == '\'').trim();

    (!subject.is_empty()).then(|| subject.to_string())
}
