//! Contact form: validation, advisory completions and mail delivery

pub mod assist;
pub mod mailer;
mod prompts;
pub mod render;
mod service;
pub mod types;

pub use assist::{AssistClient, FALLBACK_REVIEW, fallback_subject};
pub use mailer::{HttpMailer, Mailer, OutboundMail};
pub use service::ContactService;
pub use types::{ContactRequest, ContactSubmission};
