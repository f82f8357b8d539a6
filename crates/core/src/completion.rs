//! The completion client abstraction.
//!
//! `CompletionClient` is the seam between the chat service and whatever
//! hosted model sits behind it. The service builds a `CompletionRequest`
//! from the active profile and the assembled transcript; the client owns
//! the wire format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::CompletionError;
use crate::message::Role;

/// A single message in the upstream payload.
///
/// Unlike `ChatMessage`, the role here is strict: by the time a turn
/// reaches the client it has already been normalized by the assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: Role,
    pub content: String,
}

impl CompletionMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Everything the client needs for one upstream call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    pub messages: Vec<CompletionMessage>,
}

/// The model's reply plus whatever accounting the API reported.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub usage: Option<Usage>,
}

/// Token accounting from the upstream API.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A client for a hosted completion API.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Short name for logging ("openai-compat", "scripted", ...).
    fn name(&self) -> &str;

    /// Run one completion call.
    ///
    /// `cancel` is tied to the inbound request: when it trips, the client
    /// abandons the call and returns `CompletionError::Cancelled`.
    async fn complete(
        &self,
        request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<Completion, CompletionError>;
}
