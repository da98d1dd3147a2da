//! HTTP server
//!
//! Routes:
//! - `GET /health`
//! - `POST /api/chat` streams a redacted completion as SSE
//! - `POST /api/contact` delivers a contact submission
//! - `POST /api/contact/review` returns advisory feedback

mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::chat::UpstreamClient;
use crate::config::Config;
use crate::contact::{AssistClient, ContactService, Mailer};
use crate::error::{Result, StudioError};
use crate::prompt::PromptBuilder;
use crate::relay::RedactionSet;

pub use handlers::ChatRequest;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Completion API client
    pub upstream: Arc<UpstreamClient>,
    /// System prompt builder
    pub prompts: Arc<PromptBuilder>,
    /// Rules applied to the outbound chat stream
    pub redactions: Arc<RedactionSet>,
    /// Contact-form delivery
    pub contact: Arc<ContactService>,
}

impl AppState {
    /// Wire every component from configuration
    ///
    /// `api_key` is the already-resolved completion credential.
    pub fn from_config(config: &Config, api_key: &str, mailer: Arc<dyn Mailer>) -> Result<Self> {
        let upstream = Arc::new(UpstreamClient::new(&config.upstream, api_key)?);
        let prompts = Arc::new(PromptBuilder::from_config(&config.studio)?);
        let redactions = Arc::new(RedactionSet::from_config(&config.redaction.rules)?);
        let contact = Arc::new(ContactService::new(
            AssistClient::new(upstream.clone()),
            mailer,
            config.mail.clone(),
            config.studio.name.clone(),
        ));

        Ok(Self {
            upstream,
            prompts,
            redactions,
            contact,
        })
    }
}

/// The relay server
pub struct RelayServer {
    listen_addr: String,
    state: Arc<AppState>,
}

impl RelayServer {
    pub fn new(config: &Config, state: AppState) -> Self {
        Self {
            listen_addr: config.server.listen_addr(),
            state: Arc::new(state),
        }
    }

    /// Bind the listener and serve until Ctrl+C or SIGTERM
    pub async fn serve(&self) -> Result<()> {
        let addr: SocketAddr = self
            .listen_addr
            .parse()
            .map_err(|e| StudioError::Config(format!("Invalid listen address: {e}")))?;

        tracing::info!("Starting relay server on {addr}");
        if self.state.redactions.is_empty() {
            tracing::info!("Stream redaction: no rules configured");
        } else {
            tracing::info!(
                "Stream redaction: {} rules configured",
                self.state.redactions.len()
            );
        }

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            StudioError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to bind to {addr}: {e}"),
            ))
        })?;

        let app = create_router(self.state.clone());
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Relay server shut down gracefully");
        Ok(())
    }
}

/// Create the router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/chat", post(handlers::chat))
        .route("/api/contact", post(handlers::contact))
        .route("/api/contact/review", post(handlers::review))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves on Ctrl+C or SIGTERM
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedactionRuleConfig;
    use crate::testing::RecordingMailer;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_state_rejects_empty_redaction_pattern() {
        let mut config = Config::default();
        config.redaction.rules.push(RedactionRuleConfig {
            pattern: String::new(),
            replacement: "x".to_string(),
        });

        let result = AppState::from_config(&config, "key", Arc::new(RecordingMailer::new()));
        assert!(matches!(result, Err(StudioError::Config(_))));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let state = AppState::from_config(&Config::default(), "key", Arc::new(RecordingMailer::new()))
            .unwrap();
        let app = create_router(Arc::new(state));

        let response = app
            .oneshot(Request::builder().uri("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_requires_post() {
        let state = AppState::from_config(&Config::default(), "key", Arc::new(RecordingMailer::new()))
            .unwrap();
        let app = create_router(Arc::new(state));

        let response = app
            .oneshot(Request::builder().uri("/api/chat").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
