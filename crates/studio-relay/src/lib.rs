//! Studio relay - chat streaming and contact-form backend for a studio website
//!
//! Streams LLM chat completions to the browser as server-sent events,
//! rewriting configured terms in flight, and delivers contact-form
//! submissions by mail with LLM-assisted subject lines and reviews.

pub mod chat;
pub mod config;
pub mod contact;
pub mod error;
pub mod prompt;
pub mod relay;
pub mod server;
pub mod testing;

pub use error::StudioError;
