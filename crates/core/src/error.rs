//! Error types shared across switchboard crates.
//!
//! Each bounded context gets its own enum so callers can match on the
//! failures that matter to them. `ChatError` is the service-level rollup
//! the HTTP layer maps onto status codes.

use thiserror::Error;

/// Failure while handling a chat request.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The caller sent something we refuse to forward upstream.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The active configuration cannot be resolved to a usable profile.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ResolveError),

    /// The upstream completion call failed.
    #[error("Upstream completion failed: {0}")]
    Upstream(#[from] CompletionError),
}

/// Failure while resolving the active completion profile from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("feature flag '{0}' not found in settings")]
    FlagNotFound(String),

    #[error("feature flag '{flag}' is not a {expected} flag")]
    FlagKindMismatch { flag: String, expected: &'static str },

    #[error("flag '{flag}' selected variant '{variant}' but no such profile exists")]
    VariantNotFound { flag: String, variant: String },

    #[error("completion profile '{0}' not found in settings")]
    ProfileNotFound(String),
}

/// Failure while calling the upstream completion API.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    /// The caller went away before the upstream call finished.
    #[error("Request cancelled")]
    Cancelled,
}

/// Failure while fetching or decoding a settings document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Settings endpoint returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse settings document: {0}")]
    Parse(String),

    #[error("Invalid settings document: {0}")]
    Invalid(String),
}
