//! Streaming relay with in-flight redaction

mod decoder;
mod redaction;
mod stream;

pub use decoder::Utf8StreamDecoder;
pub use redaction::{RedactionRule, RedactionSet};
pub use stream::{RedactingStream, SENTINEL, relay};
