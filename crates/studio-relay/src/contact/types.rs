//! Contact-form request and validated submission

use serde::Deserialize;

use crate::error::{Result, StudioError};

const MISSING_FIELDS: &str = "Name, email, and message are required.";
const INVALID_EMAIL: &str = "A valid email address is required.";

/// Raw contact-form body; every field optional until validated
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated contact submission
///
/// Never stored; consumed by subject generation and mail delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactRequest {
    /// Validate required fields, trimming surrounding whitespace
    pub fn validate(self) -> Result<ContactSubmission> {
        let name = required(self.name)?;
        let email = required(self.email)?;
        let message = required(self.message)?;

        if !looks_like_email(&email) {
            return Err(StudioError::Validation(INVALID_EMAIL.to_string()));
        }

        Ok(ContactSubmission {
            name,
            email,
            message,
        })
    }
}

fn required(field: Option<String>) -> Result<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| StudioError::Validation(MISSING_FIELDS.to_string()))
}

// Only guards the reply-to header; the mail provider does real validation.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !email.chars().any(|c| c.is_whitespace() || c == '<' || c == '>')
        }
        None => false,
    }
}
