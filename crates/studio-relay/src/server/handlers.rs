use axum::{
    Json,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::AppState;
use crate::chat::ChatMessage;
use crate::contact::ContactRequest;
use crate::error::StudioError;
use crate::relay::relay;

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, oldest first
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Optional game-name to stats mapping rendered into the system prompt
    #[serde(default, rename = "liveStats")]
    pub live_stats: Option<Value>,
}

fn rejected(rejection: JsonRejection) -> Response {
    debug!("Rejected request body: {}", rejection.body_text());
    StudioError::Validation(format!("Invalid request body: {}", rejection.body_text()))
        .into_response()
}

pub(super) async fn health() -> Json<Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Stream a redacted completion back as `text/event-stream`
///
/// Upstream failures before the first byte become a JSON 502. Once the
/// stream has started, failures end it without the terminal record.
pub(super) async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };

    let request_id = Uuid::new_v4();
    let system_prompt = state.prompts.build(request.live_stats.as_ref());
    info!(
        request_id = %request_id,
        messages = request.messages.len(),
        live_stats = request.live_stats.is_some(),
        "Chat request"
    );

    let upstream = match state
        .upstream
        .stream_completion(&system_prompt, &request.messages)
        .await
    {
        Ok(upstream) => upstream,
        Err(e) => {
            error!(
                request_id = %request_id,
                error_type = e.category(),
                error_message = %e,
                "Chat completion failed before streaming"
            );
            return e.into_response();
        }
    };

    let stream = relay(upstream, state.redactions.clone()).with_request_id(request_id);

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Deliver a contact submission; `{ "ok": true }` once the studio copy is sent
pub(super) async fn contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };

    let submission = match request.validate() {
        Ok(submission) => submission,
        Err(e) => {
            debug!("Contact submission rejected: {e}");
            return e.into_response();
        }
    };

    match state.contact.submit(&submission).await {
        Ok(()) => Json(serde_json::json!({"ok": true})).into_response(),
        Err(e) => {
            error!(
                error_type = e.category(),
                error_message = %e,
                "Contact delivery failed"
            );
            e.into_response()
        }
    }
}

/// Advisory feedback; always 200 once the fields validate
pub(super) async fn review(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejected(rejection),
    };

    let submission = match request.validate() {
        Ok(submission) => submission,
        Err(e) => return e.into_response(),
    };

    let feedback = state.contact.review(&submission).await;
    Json(serde_json::json!({ "feedback": feedback })).into_response()
}
