// API request handlers

use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::Instrument;

use super::error::ProxyError;
use super::openrouter::{ChatRequest, OpenRouterClient, UpstreamRequest};
use super::AppState;

// Root endpoint
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Learning Path Mentor chat proxy",
        "endpoints": [
            "POST /api/openrouter",
            "POST /chat",
            "GET /status"
        ]
    }))
}

pub async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.config.openrouter.model,
        "credential_configured": state.config.openrouter.api_key.is_some(),
    }))
}

/// Relay a chat request to OpenRouter.
///
/// The body is parsed by hand so that unreadable input lands in the same
/// generic 500 as every other unexpected failure.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("chat", %request_id);

    match forward_chat(&state, &body).instrument(span.clone()).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            // Upstream failures are logged by the client with the outbound body
            span.in_scope(|| match &e {
                ProxyError::MissingApiKey => {
                    tracing::error!("OPENROUTER_API_KEY not configured");
                }
                ProxyError::Internal(detail) => {
                    tracing::error!("Error calling OpenRouter: {}", detail);
                }
                ProxyError::Upstream { .. } => {}
            });
            e.into_response()
        }
    }
}

async fn forward_chat(state: &AppState, body: &[u8]) -> Result<Value, ProxyError> {
    let request: ChatRequest = serde_json::from_slice(body)?;

    let config = &state.config.openrouter;
    let client = OpenRouterClient::from_config(config, state.http_client.clone())?;

    let upstream = UpstreamRequest::from_chat(request, config.model.clone());
    client.chat_completions(&upstream).await
}
