//! Outbound mail transport
//!
//! `Mailer` is the seam between the contact flow and whatever delivers the
//! mail. `HttpMailer` speaks the JSON API used by Resend-style providers.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::MailConfig;
use crate::error::{Result, StudioError};

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    /// Display name shown on the sending address
    pub from_name: String,
    pub reply_to: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Trait for mail transports
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message; failures are `StudioError::Delivery`
    async fn deliver(&self, mail: &OutboundMail) -> Result<()>;

    /// Transport name for logging
    fn name(&self) -> &'static str;
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: [&'a str; 1],
    reply_to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Mail transport posting to `<api_url>/emails` with a bearer credential
#[derive(Debug)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    from_address: String,
    api_key: Option<String>,
}

impl HttpMailer {
    /// Create a mailer, reading the credential from `config.api_key_env`
    ///
    /// A missing credential is not fatal; deliveries fail until it is set.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &MailConfig, api_key: Option<String>) -> Result<Self> {
        if api_key.is_none() {
            warn!(
                "{} not set, contact-form deliveries will fail",
                config.api_key_env
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StudioError::Config(format!("Failed to create mail client: {e}")))?;

        let endpoint = format!("{}/emails", config.api_url.trim_end_matches('/'));
        info!("Mail transport initialized, endpoint: {endpoint}");

        Ok(Self {
            client,
            endpoint,
            from_address: config.from_address.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn deliver(&self, mail: &OutboundMail) -> Result<()> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| StudioError::Delivery("Mail API key not configured".to_string()))?;

        let request = SendEmailRequest {
            from: format!("{} <{}>", display_name(&mail.from_name), self.from_address),
            to: [mail.to.as_str()],
            reply_to: &mail.reply_to,
            subject: &mail.subject,
            text: &mail.text,
            html: &mail.html,
        };

        debug!("Delivering mail to {} via {}", mail.to, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| StudioError::Delivery(format!("Mail request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StudioError::Delivery(format!(
                "Mail API returned {status}: {body}"
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Strip characters that would break an RFC 5322 display name
fn display_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\r' | '\n'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "Contact form".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_mail() -> OutboundMail {
        OutboundMail {
            from_name: "Ana".to_string(),
            reply_to: "ana@example.com".to_string(),
            to: "hello@studio.test".to_string(),
            subject: "Hello".to_string(),
            text: "plain".to_string(),
            html: "<p>plain</p>".to_string(),
        }
    }

    fn config_for(server: &MockServer) -> MailConfig {
        MailConfig {
            api_url: server.uri(),
            from_address: "noreply@studio.test".to_string(),
            ..MailConfig::default()
        }
    }

    #[test]
    fn test_display_name_sanitized() {
        assert_eq!(display_name("Ana \"The Dev\" <x>"), "Ana The Dev x");
        assert_eq!(display_name("Evil\r\nBcc: a@b.c"), "EvilBcc: a@b.c");
        assert_eq!(display_name("<>"), "Contact form");
    }

    #[tokio::test]
    async fn test_deliver_posts_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("Authorization", "Bearer mail-key"))
            .and(body_json(serde_json::json!({
                "from": "Ana <noreply@studio.test>",
                "to": ["hello@studio.test"],
                "reply_to": "ana@example.com",
                "subject": "Hello",
                "text": "plain",
                "html": "<p>plain</p>"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "1"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mailer =
            HttpMailer::with_api_key(&config_for(&mock_server), Some("mail-key".into())).unwrap();
        mailer.deliver(&sample_mail()).await.unwrap();
    }

    #[tokio::test]
    async fn test_deliver_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid from"))
            .mount(&mock_server)
            .await;

        let mailer =
            HttpMailer::with_api_key(&config_for(&mock_server), Some("mail-key".into())).unwrap();
        let err = mailer.deliver(&sample_mail()).await.unwrap_err();

        assert!(matches!(err, StudioError::Delivery(_)));
        assert!(err.to_string().contains("invalid from"));
    }

    #[tokio::test]
    async fn test_deliver_without_key_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mailer = HttpMailer::with_api_key(&config_for(&mock_server), None).unwrap();
        let err = mailer.deliver(&sample_mail()).await.unwrap_err();
        assert!(matches!(err, StudioError::Delivery(_)));
    }
}
