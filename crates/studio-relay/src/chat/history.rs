//! Chat message types and context-window capping

use serde::{Deserialize, Serialize};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message as exchanged with the browser and the upstream API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Build the message list forwarded upstream
///
/// Keeps only the `limit` most recent caller messages, in their original
/// order, behind exactly one synthesized system message.
pub fn build_upstream_messages(
    system_prompt: &str,
    history: &[ChatMessage],
    limit: usize,
) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(limit);
    let tail = &history[start..];

    let mut messages = Vec::with_capacity(tail.len() + 1);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend_from_slice(tail);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_history(count: usize) -> Vec<ChatMessage> {
        (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::user(format!("message {i}"))
                } else {
                    ChatMessage::assistant(format!("message {i}"))
                }
            })
            .collect()
    }

    #[test]
    fn test_short_history_forwarded_whole() {
        let history = numbered_history(3);
        let messages = build_upstream_messages("prompt", &history, 20);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], ChatMessage::system("prompt"));
        assert_eq!(&messages[1..], &history[..]);
    }

    #[test]
    fn test_long_history_keeps_most_recent_tail() {
        let history = numbered_history(35);
        let messages = build_upstream_messages("prompt", &history, 20);

        assert_eq!(messages.len(), 21);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(&messages[1..], &history[15..]);
        assert_eq!(messages[1].content, "message 15");
        assert_eq!(messages[20].content, "message 34");
    }

    #[test]
    fn test_exactly_limit_is_not_trimmed() {
        let history = numbered_history(20);
        let messages = build_upstream_messages("prompt", &history, 20);

        assert_eq!(messages.len(), 21);
        assert_eq!(messages[1].content, "message 0");
    }

    #[test]
    fn test_empty_history_is_system_only() {
        let messages = build_upstream_messages("prompt", &[], 20);
        assert_eq!(messages, vec![ChatMessage::system("prompt")]);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_value(ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hi"}));

        let parsed: ChatMessage =
            serde_json::from_str(r#"{"role":"user","content":"hello"}"#).unwrap();
        assert_eq!(parsed, ChatMessage::user("hello"));

        assert!(serde_json::from_str::<ChatMessage>(r#"{"role":"tool","content":"x"}"#).is_err());
    }
}
