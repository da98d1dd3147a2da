//! Chat history handling and the completion API client

pub mod history;
mod upstream;

pub use history::{ChatMessage, Role, build_upstream_messages};
pub use upstream::{ChunkStream, UpstreamClient};
