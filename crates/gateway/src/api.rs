//! Request handlers for the chat API.
//!
//! Error bodies follow one rule: invalid input echoes the reason with a
//! 400, everything else answers 500 with a fixed generic message. The
//! details stay in the server log, never in the response.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use tracing::{error, info};

use switchboard_core::{ChatError, ChatRequest, ChatResponse, CompletionError};

use crate::SharedState;

/// Stable error envelope the frontend can render.
#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}

const GENERIC_ERROR: &str = "An error occurred while processing your request";

fn generic_error() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: GENERIC_ERROR.to_string(),
        }),
    )
}

/// Run one chat turn against the currently resolved profile.
pub(crate) async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(history_len = payload.history.len(), "Chat turn requested");

    let cancel = state.shutdown.child_token();

    match state.chat.respond(payload, cancel).await {
        Ok(response) => Ok(Json(response)),
        Err(ChatError::InvalidInput(reason)) => {
            Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: reason })))
        }
        Err(ChatError::Upstream(CompletionError::Cancelled)) => {
            info!("Chat turn cancelled by shutdown");
            Err(generic_error())
        }
        Err(e) => {
            error!(error = %e, "Chat turn failed");
            Err(generic_error())
        }
    }
}

/// Plain-text id of the model the current settings resolve to.
pub(crate) async fn model_handler(
    State(state): State<SharedState>,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    match state.chat.active_model() {
        Ok(model) => Ok(model),
        Err(e) => {
            error!(error = %e, "Active model lookup failed");
            Err(generic_error())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
