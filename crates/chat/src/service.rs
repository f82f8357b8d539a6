//! The chat service: validate, resolve, assemble, complete, append.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use switchboard_config::ResolutionStrategy;
use switchboard_core::{
    ChatError, ChatMessage, ChatRequest, ChatResponse, CompletionClient, CompletionRequest,
    ResolveError,
};
use switchboard_store::SnapshotHandle;

/// Answers chat requests with whatever the settings snapshot says right
/// now.
///
/// The service itself is stateless across requests. Each call reads one
/// snapshot and sticks with it, so a refresh landing mid-request never
/// mixes two configurations.
pub struct ChatService {
    snapshots: SnapshotHandle,
    strategy: ResolutionStrategy,
    client: Arc<dyn CompletionClient>,
}

impl ChatService {
    pub fn new(
        snapshots: SnapshotHandle,
        strategy: ResolutionStrategy,
        client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            snapshots,
            strategy,
            client,
        }
    }

    /// Handle one chat turn.
    ///
    /// On success the returned history is the request's history plus the
    /// new user turn and the assistant's reply, in that order. On failure
    /// nothing is appended; the caller resends what they had.
    pub async fn respond(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> Result<ChatResponse, ChatError> {
        if request.message.is_empty() {
            return Err(ChatError::InvalidInput("Message cannot be empty".into()));
        }

        let snapshot = self.snapshots.current();
        let profile = self.strategy.resolve(&snapshot)?;

        let messages = crate::assemble::assemble(profile, &request.history, &request.message);

        debug!(
            model = %profile.model,
            messages = messages.len(),
            client = %self.client.name(),
            "Dispatching completion"
        );

        let completion = self
            .client
            .complete(
                CompletionRequest {
                    model: profile.model.clone(),
                    temperature: profile.temperature,
                    max_tokens: profile.max_tokens,
                    top_p: profile.top_p,
                    messages,
                },
                cancel,
            )
            .await?;

        if let Some(usage) = &completion.usage {
            debug!(total_tokens = usage.total_tokens, "Token usage reported");
        }
        info!(model = %completion.model, "Completion received");

        let mut history = request.history;
        history.push(ChatMessage::user(request.message));
        history.push(ChatMessage::assistant(completion.text.clone()));

        Ok(ChatResponse {
            message: completion.text,
            history,
        })
    }

    /// The model id the current snapshot resolves to.
    pub fn active_model(&self) -> Result<String, ResolveError> {
        let snapshot = self.snapshots.current();
        let profile = self.strategy.resolve(&snapshot)?;
        Ok(profile.model.clone())
    }
}
