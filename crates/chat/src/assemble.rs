//! Transcript assembly.
//!
//! The upstream payload is rebuilt from scratch for every request: the
//! active profile's system messages, then the usable history, then the new
//! user message. Nothing here trims for token budgets; callers with long
//! histories pay for them in full.

use switchboard_config::CompletionProfile;
use switchboard_core::{ChatMessage, CompletionMessage, Role};

/// Build the ordered upstream message list.
///
/// System messages always precede history, and the new user message is
/// always last. History keeps its order; entries whose role is not
/// user/assistant (compared case-insensitively) are left out of the
/// payload. They stay in the caller's history, they just never reach the
/// model.
pub fn assemble(
    profile: &CompletionProfile,
    history: &[ChatMessage],
    new_message: &str,
) -> Vec<CompletionMessage> {
    let mut messages: Vec<CompletionMessage> = profile
        .system_messages()
        .map(|m| CompletionMessage::new(Role::System, m.content.clone()))
        .collect();

    for turn in history {
        if turn.role.eq_ignore_ascii_case("user") {
            messages.push(CompletionMessage::new(Role::User, turn.content.clone()));
        } else if turn.role.eq_ignore_ascii_case("assistant") {
            messages.push(CompletionMessage::new(
                Role::Assistant,
                turn.content.clone(),
            ));
        }
    }

    messages.push(CompletionMessage::new(Role::User, new_message));
    messages
}
