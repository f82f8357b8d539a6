//! The settings document model.
//!
//! This is the JSON the settings store serves: upstream connection details,
//! named completion profiles, and the feature flags that select between
//! them. The store fetches a [`ConfigDocument`] and publishes it as an
//! immutable [`ConfigSnapshot`]; request handlers only ever see snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Connection details for the upstream completion API.
///
/// Read once at startup. Changing it in the store does not take effect
/// until the process restarts.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Base URL of the OpenAI-compatible API
    pub endpoint: String,

    /// Bearer credential. Absent means the environment is consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ConnectionInfo {
    /// Resolve the credential: the explicit key wins, otherwise the
    /// environment is checked (`SWITCHBOARD_API_KEY`, then
    /// `OPENAI_API_KEY`). `None` means the upstream call goes out
    /// unauthenticated.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("SWITCHBOARD_API_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

/// A prompt message carried inside a completion profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

/// A named model/prompt configuration.
///
/// Several of these coexist in a snapshot; the resolver picks one per
/// request. Request logic never mutates a profile, refresh replaces the
/// whole snapshot instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionProfile {
    /// Model identifier passed through to the upstream API
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Response token cap. Some APIs spell this `max_completion_tokens`.
    #[serde(
        default,
        alias = "max_completion_tokens",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_tokens: Option<u32>,

    /// Nucleus sampling cutoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Prompt messages bundled with the profile
    #[serde(default)]
    pub messages: Vec<PromptMessage>,
}

fn default_temperature() -> f32 {
    0.7
}

impl CompletionProfile {
    /// The profile's priming context: entries whose role is exactly
    /// `"system"`. Other roles in the bundle are ignored.
    pub fn system_messages(&self) -> impl Iterator<Item = &PromptMessage> {
        self.messages.iter().filter(|m| m.role == "system")
    }
}

/// A feature flag as stored in the settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureFlag {
    /// A plain on/off switch
    Boolean {
        #[serde(default)]
        enabled: bool,
    },

    /// A multi-way switch whose default variant names a profile
    Variant {
        variants: Vec<FlagVariant>,
        default_variant: String,
    },
}

/// One arm of a variant flag. The payload names a completion profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagVariant {
    pub name: String,
    pub profile: String,
}

/// The settings document as served by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Upstream connection details. Required at startup, ignored by refresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionInfo>,

    /// Named completion profiles
    #[serde(default)]
    pub profiles: HashMap<String, CompletionProfile>,

    /// Feature flags keyed by name
    #[serde(default)]
    pub flags: HashMap<String, FeatureFlag>,
}

/// An immutable point-in-time view of the settings document.
///
/// Readers always observe a whole snapshot. Refresh never edits one in
/// place, it publishes a replacement.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub profiles: HashMap<String, CompletionProfile>,
    pub flags: HashMap<String, FeatureFlag>,

    /// When this snapshot was fetched from the source
    pub fetched_at: DateTime<Utc>,
}

impl ConfigSnapshot {
    /// Freeze a fetched document into a snapshot stamped with the current
    /// time. Connection info is deliberately left behind, it is fixed at
    /// startup.
    pub fn from_document(doc: ConfigDocument) -> Self {
        Self {
            profiles: doc.profiles,
            flags: doc.flags,
            fetched_at: Utc::now(),
        }
    }

    /// Whether `doc` carries the same profiles and flags as this snapshot.
    /// Fetch time is ignored.
    pub fn same_content(&self, doc: &ConfigDocument) -> bool {
        self.profiles == doc.profiles && self.flags == doc.flags
    }

    pub fn profile(&self, name: &str) -> Option<&CompletionProfile> {
        self.profiles.get(name)
    }

    pub fn flag(&self, name: &str) -> Option<&FeatureFlag> {
        self.flags.get(name)
    }
}
