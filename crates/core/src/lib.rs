//! # Switchboard Core
//!
//! Domain types, traits, and error definitions for the Switchboard chat
//! backend. This crate has **zero framework dependencies**: it defines the
//! domain model that all other crates implement against.
//!
//! Every other crate depends inward on core: `config` models the live
//! configuration the resolver reads, `store` keeps it fresh, `providers`
//! implements the completion-client boundary, `chat` orchestrates a request,
//! and `gateway` exposes the HTTP surface.

pub mod completion;
pub mod error;
pub mod message;

// Re-export key types at crate root for ergonomics
pub use completion::{Completion, CompletionClient, CompletionMessage, CompletionRequest, Usage};
pub use error::{ChatError, CompletionError, ResolveError, StoreError};
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role};
