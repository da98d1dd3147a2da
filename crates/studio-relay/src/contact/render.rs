//! Plaintext and HTML bodies for contact-form mail

use chrono::{DateTime, Utc};

use crate::config::MailConfig;
use crate::contact::mailer::OutboundMail;
use crate::contact::types::ContactSubmission;

/// Notification sent to the studio inbox
pub fn studio_notification(
    submission: &ContactSubmission,
    subject: &str,
    received_at: DateTime<Utc>,
    mail: &MailConfig,
) -> OutboundMail {
    let received = received_at.format("%Y-%m-%d %H:%M UTC").to_string();

    let text = format!(
        "New contact form submission\n\nName: {}\nEmail: {}\nReceived: {}\n\nMessage:\n{}\n",
        submission.name, submission.email, received, submission.message
    );

    let html = format!(
        concat!(
            "<h2>New contact form submission</h2>",
            "<p><strong>Name:</strong> {name}<br>",
            "<strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a><br>",
            "<strong>Received:</strong> {received}</p>",
            "<p><strong>Message:</strong></p>",
            "<p style=\"white-space: pre-wrap\">{message}</p>"
        ),
        name = escape_html(&submission.name),
        email = escape_html(&submission.email),
        received = received,
        message = escape_html(&submission.message),
    );

    OutboundMail {
        from_name: submission.name.clone(),
        reply_to: submission.email.clone(),
        to: mail.studio_address.clone(),
        subject: subject.to_string(),
        text,
        html,
    }
}

/// Confirmation sent back to the submitter
pub fn acknowledgement(
    submission: &ContactSubmission,
    studio_name: &str,
    mail: &MailConfig,
) -> OutboundMail {
    let text = format!(
        "Hi {},\n\nThanks for reaching out! We received your message and will get back to you soon.\n\nYour message:\n{}\n\n{}\n",
        submission.name, submission.message, studio_name
    );

    let html = format!(
        concat!(
            "<p>Hi {name},</p>",
            "<p>Thanks for reaching out! We received your message and will get back to you soon.</p>",
            "<p><strong>Your message:</strong></p>",
            "<blockquote style=\"white-space: pre-wrap\">{message}</blockquote>",
            "<p>{studio}</p>"
        ),
        name = escape_html(&submission.name),
        message = escape_html(&submission.message),
        studio = escape_html(studio_name),
    );

    OutboundMail {
        from_name: studio_name.to_string(),
        reply_to: mail.studio_address.clone(),
        to: submission.email.clone(),
        subject: format!("Thanks for contacting {studio_name}"),
        text,
        html,
    }
}

/// Escape text for HTML element and attribute content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
