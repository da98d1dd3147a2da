//! Redacting SSE relay
//!
//! Wraps the upstream chunk stream so it can be handed straight to the
//! response body: each upstream piece is decoded, rewritten and yielded
//! before the next one is polled, and a terminal `[DONE]` record follows the
//! last piece. Dropping the stream (client disconnect) drops the upstream
//! body with it.

use bytes::Bytes;
use futures::stream::{FusedStream, Stream};
use std::fmt::Display;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::{debug, warn};
use uuid::Uuid;

use super::decoder::Utf8StreamDecoder;
use super::redaction::RedactionSet;

/// Terminal record written after the upstream body is exhausted
pub const SENTINEL: &[u8] = b"data: [DONE]\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelayState {
    Streaming,
    Sentinel,
    Closed,
}

/// Stream adapter that decodes, redacts and forwards upstream pieces
///
/// Rules are applied to each decoded piece on its own. A match split across
/// two upstream pieces is forwarded unchanged.
pub struct RedactingStream<S> {
    inner: S,
    decoder: Utf8StreamDecoder,
    rules: Arc<RedactionSet>,
    state: RelayState,
    request_id: Uuid,
    forwarded_bytes: usize,
}

/// Relay an upstream chunk stream through the redaction rules
pub fn relay<S>(upstream: S, rules: Arc<RedactionSet>) -> RedactingStream<S> {
    RedactingStream {
        inner: upstream,
        decoder: Utf8StreamDecoder::new(),
        rules,
        state: RelayState::Streaming,
        request_id: Uuid::nil(),
        forwarded_bytes: 0,
    }
}

impl<S> RedactingStream<S> {
    /// Tag log lines from this relay with a request id
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Total bytes handed to the client so far, sentinel excluded
    pub fn forwarded_bytes(&self) -> usize {
        self.forwarded_bytes
    }

    fn emit(&mut self, text: &str) -> Bytes {
        let rewritten = self.rules.apply(text).into_owned();
        self.forwarded_bytes += rewritten.len();
        Bytes::from(rewritten)
    }
}

impl<S, E> Stream for RedactingStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    type Item = Result<Bytes, std::io::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            match this.state {
                RelayState::Closed => return Poll::Ready(None),
                RelayState::Sentinel => {
                    this.state = RelayState::Closed;
                    debug!(
                        request_id = %this.request_id,
                        forwarded_bytes = this.forwarded_bytes,
                        "Upstream complete, sending terminal record"
                    );
                    return Poll::Ready(Some(Ok(Bytes::from_static(SENTINEL))));
                }
                RelayState::Streaming => match Pin::new(&mut this.inner).poll_next(cx) {
                    Poll::Ready(Some(Ok(bytes))) => {
                        let text = this.decoder.decode(&bytes);
                        if text.is_empty() {
                            continue;
                        }
                        return Poll::Ready(Some(Ok(this.emit(&text))));
                    }
                    Poll::Ready(Some(Err(e))) => {
                        warn!(
                            error_type = "relay",
                            request_id = %this.request_id,
                            forwarded_bytes = this.forwarded_bytes,
                            error_message = %e,
                            "Upstream stream failed mid-relay, closing without terminal record"
                        );
                        this.state = RelayState::Closed;
                        return Poll::Ready(None);
                    }
                    Poll::Ready(None) => {
                        this.state = RelayState::Sentinel;
                        let tail = this.decoder.finish();
                        if !tail.is_empty() {
                            return Poll::Ready(Some(Ok(this.emit(&tail))));
                        }
                    }
                    Poll::Pending => return Poll::Pending,
                },
            }
        }
    }
}

impl<S, E> FusedStream for RedactingStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    fn is_terminated(&self) -> bool {
        self.state == RelayState::Closed
    }
}
