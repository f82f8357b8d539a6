//! Chat orchestration: turning an inbound request into an upstream
//! completion call and back.
//!
//! [`assemble`] builds the upstream transcript from the active profile and
//! the caller's history. [`ChatService`] wires it together: validate the
//! request, resolve the profile from the current snapshot, call the
//! completion client, append the new turns.

pub mod assemble;
pub mod service;

pub use assemble::assemble;
pub use service::ChatService;
