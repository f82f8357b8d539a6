//! Integration tests for the chat service flow.
//!
//! These exercise the full request path: validation, profile resolution,
//! transcript assembly, the upstream call, and history bookkeeping.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use switchboard_chat::ChatService;
use switchboard_config::{
    CompletionProfile, ConfigDocument, ConfigSnapshot, FeatureFlag, FlagVariant, PromptMessage,
    ResolutionStrategy,
};
use switchboard_core::{
    ChatError, ChatMessage, ChatRequest, Completion, CompletionClient, CompletionError,
    CompletionRequest, Role,
};
use switchboard_store::SnapshotHandle;

// ── Scripted completion clients ──────────────────────────────────────────

/// Returns a fixed reply and records every request it sees.
struct ScriptedClient {
    reply: String,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
        _cancel: CancellationToken,
    ) -> Result<Completion, CompletionError> {
        self.calls.lock().unwrap().push(request);
        Ok(Completion {
            text: self.reply.clone(),
            model: "mock".into(),
            usage: None,
        })
    }
}

/// Fails every call.
struct FailingClient;

#[async_trait::async_trait]
impl CompletionClient for FailingClient {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
        _cancel: CancellationToken,
    ) -> Result<Completion, CompletionError> {
        Err(CompletionError::ApiError {
            status_code: 503,
            message: "overloaded".into(),
        })
    }
}

/// Answers only when cancelled, like an upstream that never returns.
struct HangingClient;

#[async_trait::async_trait]
impl CompletionClient for HangingClient {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<Completion, CompletionError> {
        cancel.cancelled().await;
        Err(CompletionError::Cancelled)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────

fn snapshot() -> ConfigSnapshot {
    let mut doc = ConfigDocument::default();
    doc.profiles.insert(
        "helpful".into(),
        CompletionProfile {
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: Some(256),
            top_p: None,
            messages: vec![PromptMessage {
                role: "system".into(),
                content: "You are helpful.".into(),
            }],
        },
    );
    doc.flags.insert(
        "completion-profile".into(),
        FeatureFlag::Variant {
            variants: vec![FlagVariant {
                name: "default".into(),
                profile: "helpful".into(),
            }],
            default_variant: "default".into(),
        },
    );
    ConfigSnapshot::from_document(doc)
}

fn snapshot_without_flags() -> ConfigSnapshot {
    let mut snap = snapshot();
    snap.flags.clear();
    snap
}

fn service_with(client: Arc<dyn CompletionClient>) -> ChatService {
    ChatService::new(
        SnapshotHandle::pinned(snapshot()),
        ResolutionStrategy::default(),
        client,
    )
}

fn request(message: &str, history: Vec<ChatMessage>) -> ChatRequest {
    ChatRequest {
        message: message.into(),
        history,
    }
}

// ── The happy path ───────────────────────────────────────────────────────

#[tokio::test]
async fn hello_round_trip() {
    let client = ScriptedClient::new("Hi there!");
    let service = service_with(client.clone());

    let response = service
        .respond(request("Hello", vec![]), CancellationToken::new())
        .await
        .expect("chat should succeed");

    assert_eq!(response.message, "Hi there!");
    assert_eq!(response.history.len(), 2);
    assert_eq!(response.history[0].role, "user");
    assert_eq!(response.history[0].content, "Hello");
    assert_eq!(response.history[1].role, "assistant");
    assert_eq!(response.history[1].content, "Hi there!");

    // The upstream payload was primed by the profile and carries its
    // sampling parameters
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "gpt-4o-mini");
    assert_eq!(calls[0].temperature, 0.7);
    assert_eq!(calls[0].max_tokens, Some(256));
    assert_eq!(calls[0].messages[0].role, Role::System);
    assert_eq!(calls[0].messages[0].content, "You are helpful.");
    assert_eq!(calls[0].messages[1].role, Role::User);
    assert_eq!(calls[0].messages[1].content, "Hello");
}

#[tokio::test]
async fn responds_and_appends_user_then_assistant() {
    let client = ScriptedClient::new("Fine, thanks.");
    let service = service_with(client.clone());

    let history = vec![ChatMessage::user("Hello"), ChatMessage::assistant("Hi!")];
    let response = service
        .respond(request("How are you?", history), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(response.history.len(), 4);
    assert_eq!(response.history[2].role, "user");
    assert_eq!(response.history[2].content, "How are you?");
    assert_eq!(response.history[3].role, "assistant");
    assert_eq!(response.history[3].content, "Fine, thanks.");
    assert!(response.history[2].timestamp <= response.history[3].timestamp);

    // Prior turns went upstream in order, after the system message
    let sent = &client.calls()[0].messages;
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[1].content, "Hello");
    assert_eq!(sent[2].content, "Hi!");
    assert_eq!(sent[3].content, "How are you?");
}

// ── Validation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_message_rejected_before_upstream() {
    let client = ScriptedClient::new("unused");
    let service = service_with(client.clone());

    let err = service
        .respond(request("", vec![]), CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::InvalidInput(_)));
    assert!(client.calls().is_empty(), "no upstream call for bad input");
}

#[tokio::test]
async fn unknown_roles_kept_in_history_but_not_sent() {
    let client = ScriptedClient::new("noted");
    let service = service_with(client.clone());

    let history = vec![
        ChatMessage {
            role: "moderator".into(),
            content: "keep it short".into(),
            timestamp: chrono::Utc::now(),
        },
        ChatMessage::user("Hello"),
    ];
    let response = service
        .respond(request("ok", history), CancellationToken::new())
        .await
        .unwrap();

    // Still present in the returned history, untouched
    assert_eq!(response.history[0].role, "moderator");
    assert_eq!(response.history[0].content, "keep it short");

    // But never forwarded upstream
    let sent = &client.calls()[0].messages;
    assert!(sent.iter().all(|m| m.content != "keep it short"));
}

// ── Failure paths ────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_flag_is_a_configuration_error() {
    let client = ScriptedClient::new("unused");
    let service = ChatService::new(
        SnapshotHandle::pinned(snapshot_without_flags()),
        ResolutionStrategy::default(),
        client.clone(),
    );

    let err = service
        .respond(request("Hello", vec![]), CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Configuration(_)));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn upstream_failure_is_reported_as_upstream() {
    let service = service_with(Arc::new(FailingClient));

    let err = service
        .respond(request("Hello", vec![]), CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ChatError::Upstream(CompletionError::ApiError {
            status_code: 503,
            ..
        })
    ));
}

#[tokio::test]
async fn cancellation_aborts_upstream_call() {
    let service = Arc::new(ChatService::new(
        SnapshotHandle::pinned(snapshot()),
        ResolutionStrategy::default(),
        Arc::new(HangingClient),
    ));

    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let service = service.clone();
        let cancel = cancel.clone();
        async move { service.respond(request("Hello", vec![]), cancel).await }
    });

    tokio::task::yield_now().await;
    cancel.cancel();

    let result = handle.await.expect("task should not panic");
    assert!(matches!(
        result,
        Err(ChatError::Upstream(CompletionError::Cancelled))
    ));
}

// ── Model reporting ──────────────────────────────────────────────────────

#[test]
fn active_model_reports_resolved_profile() {
    let service = service_with(ScriptedClient::new("unused"));
    assert_eq!(service.active_model().unwrap(), "gpt-4o-mini");
}

#[test]
fn active_model_fails_without_configuration() {
    let service = ChatService::new(
        SnapshotHandle::pinned(snapshot_without_flags()),
        ResolutionStrategy::default(),
        ScriptedClient::new("unused"),
    );
    assert!(service.active_model().is_err());
}
