//! Prompts for the contact-form assist calls

/// System prompt for subject-line generation
pub const SUBJECT_SYSTEM_PROMPT: &str = "You write short, clear email subject lines for messages sent through a game studio's contact form. Respond with the subject line only: no quotes, no prefix, at most 10 words.";

/// System prompt for message review
pub const REVIEW_SYSTEM_PROMPT: &str = "You help visitors polish messages before they send them to a game studio. Give one or two sentences of friendly, encouraging feedback. Suggest an improvement only if something important is missing, such as what they want or how to reach them. Never refuse, never criticise harshly, and never tell them not to send it.";

/// User prompt for subject-line generation
pub fn subject_prompt(name: &str, message: &str) -> String {
    format!("Write a subject line for this contact-form message from {name}:\n\n{message}")
}

/// User prompt for message review
pub fn review_prompt(name: &str, email: &str, message: &str) -> String {
    format!(
        "Name: {name}\nEmail: {email}\n\nMessage:\n{message}\n\nHow does this message look before it is sent?"
    )
}
