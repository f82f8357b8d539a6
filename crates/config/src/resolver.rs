//! Resolution of the active completion profile from a snapshot.
//!
//! Which profile serves a request is policy, and the policy lives in
//! bootstrap configuration as data. Swapping from a fixed profile to a
//! flag-driven one is a config edit, not a code change.

use serde::{Deserialize, Serialize};
use switchboard_core::ResolveError;

use crate::model::{CompletionProfile, ConfigSnapshot, FeatureFlag};

/// How the active completion profile is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Always use the named profile.
    Fixed { profile: String },

    /// A boolean flag picks between two profiles. A missing flag reads as
    /// disabled.
    BooleanFlag {
        flag: String,
        enabled_profile: String,
        disabled_profile: String,
    },

    /// A variant flag's default variant names the profile to use.
    VariantFlag { flag: String },
}

impl Default for ResolutionStrategy {
    fn default() -> Self {
        Self::VariantFlag {
            flag: "completion-profile".into(),
        }
    }
}

impl ResolutionStrategy {
    /// Resolve the active profile from `snapshot`.
    ///
    /// Deterministic: the same strategy and snapshot always yield the same
    /// profile. Errors mean the configuration is unusable for this request;
    /// there is no fallback profile.
    pub fn resolve<'a>(
        &self,
        snapshot: &'a ConfigSnapshot,
    ) -> Result<&'a CompletionProfile, ResolveError> {
        let profile_name = match self {
            Self::Fixed { profile } => profile.clone(),

            Self::BooleanFlag {
                flag,
                enabled_profile,
                disabled_profile,
            } => match snapshot.flag(flag) {
                Some(FeatureFlag::Boolean { enabled: true }) => enabled_profile.clone(),
                Some(FeatureFlag::Boolean { enabled: false }) | None => disabled_profile.clone(),
                Some(FeatureFlag::Variant { .. }) => {
                    return Err(ResolveError::FlagKindMismatch {
                        flag: flag.clone(),
                        expected: "boolean",
                    });
                }
            },

            Self::VariantFlag { flag } => {
                let state = snapshot
                    .flag(flag)
                    .ok_or_else(|| ResolveError::FlagNotFound(flag.clone()))?;
                match state {
                    FeatureFlag::Variant {
                        variants,
                        default_variant,
                    } => variants
                        .iter()
                        .find(|v| v.name == *default_variant)
                        .ok_or_else(|| ResolveError::VariantNotFound {
                            flag: flag.clone(),
                            variant: default_variant.clone(),
                        })?
                        .profile
                        .clone(),
                    FeatureFlag::Boolean { .. } => {
                        return Err(ResolveError::FlagKindMismatch {
                            flag: flag.clone(),
                            expected: "variant",
                        });
                    }
                }
            }
        };

        snapshot
            .profile(&profile_name)
            .ok_or(ResolveError::ProfileNotFound(profile_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConfigDocument, FlagVariant, PromptMessage};

    fn snapshot() -> ConfigSnapshot {
        let mut doc = ConfigDocument::default();
        doc.profiles.insert(
            "budget".into(),
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
        doc.profiles.insert(
            "premium".into(),
            CompletionProfile {
                model: "gpt-4o".into(),
                temperature: 0.2,
                max_tokens: Some(1024),
                top_p: Some(0.9),
                messages: vec![],
            },
        );
        doc.flags.insert(
            "premium-rollout".into(),
            FeatureFlag::Boolean { enabled: true },
        );
        doc.flags.insert(
            "completion-profile".into(),
            FeatureFlag::Variant {
                variants: vec![
                    FlagVariant {
                        name: "cheap".into(),
                        profile: "budget".into(),
                    },
                    FlagVariant {
                        name: "smart".into(),
                        profile: "premium".into(),
                    },
                ],
                default_variant: "cheap".into(),
            },
        );
        ConfigSnapshot::from_document(doc)
    }

    #[test]
    fn fixed_uses_named_profile() {
        let strategy = ResolutionStrategy::Fixed {
            profile: "premium".into(),
        };
        let snap = snapshot();
        let profile = strategy.resolve(&snap).unwrap();
        assert_eq!(profile.model, "gpt-4o");
    }

    #[test]
    fn fixed_missing_profile_errors() {
        let strategy = ResolutionStrategy::Fixed {
            profile: "deluxe".into(),
        };
        assert_eq!(
            strategy.resolve(&snapshot()).unwrap_err(),
            ResolveError::ProfileNotFound("deluxe".into())
        );
    }

    #[test]
    fn boolean_flag_enabled_picks_enabled_profile() {
        let strategy = ResolutionStrategy::BooleanFlag {
            flag: "premium-rollout".into(),
            enabled_profile: "premium".into(),
            disabled_profile: "budget".into(),
        };
        let snap = snapshot();
        let profile = strategy.resolve(&snap).unwrap();
        assert_eq!(profile.model, "gpt-4o");
    }

    #[test]
    fn boolean_flag_missing_reads_as_disabled() {
        let strategy = ResolutionStrategy::BooleanFlag {
            flag: "no-such-flag".into(),
            enabled_profile: "premium".into(),
            disabled_profile: "budget".into(),
        };
        let snap = snapshot();
        let profile = strategy.resolve(&snap).unwrap();
        assert_eq!(profile.model, "gpt-4o-mini");
    }

    #[test]
    fn boolean_flag_rejects_variant_state() {
        let strategy = ResolutionStrategy::BooleanFlag {
            flag: "completion-profile".into(),
            enabled_profile: "premium".into(),
            disabled_profile: "budget".into(),
        };
        assert_eq!(
            strategy.resolve(&snapshot()).unwrap_err(),
            ResolveError::FlagKindMismatch {
                flag: "completion-profile".into(),
                expected: "boolean",
            }
        );
    }

    #[test]
    fn variant_flag_follows_default_variant() {
        let strategy = ResolutionStrategy::default();
        let snap = snapshot();
        let profile = strategy.resolve(&snap).unwrap();
        assert_eq!(profile.model, "gpt-4o-mini");
    }

    #[test]
    fn variant_flag_missing_errors() {
        let strategy = ResolutionStrategy::VariantFlag {
            flag: "no-such-flag".into(),
        };
        assert_eq!(
            strategy.resolve(&snapshot()).unwrap_err(),
            ResolveError::FlagNotFound("no-such-flag".into())
        );
    }

    #[test]
    fn variant_flag_rejects_boolean_state() {
        let strategy = ResolutionStrategy::VariantFlag {
            flag: "premium-rollout".into(),
        };
        assert_eq!(
            strategy.resolve(&snapshot()).unwrap_err(),
            ResolveError::FlagKindMismatch {
                flag: "premium-rollout".into(),
                expected: "variant",
            }
        );
    }

    #[test]
    fn unlisted_default_variant_errors() {
        let mut snap = snapshot();
        snap.flags.insert(
            "completion-profile".into(),
            FeatureFlag::Variant {
                variants: vec![FlagVariant {
                    name: "cheap".into(),
                    profile: "budget".into(),
                }],
                default_variant: "smart".into(),
            },
        );
        let strategy = ResolutionStrategy::default();
        assert_eq!(
            strategy.resolve(&snap).unwrap_err(),
            ResolveError::VariantNotFound {
                flag: "completion-profile".into(),
                variant: "smart".into(),
            }
        );
    }

    #[test]
    fn variant_payload_must_name_a_real_profile() {
        let mut snap = snapshot();
        snap.flags.insert(
            "completion-profile".into(),
            FeatureFlag::Variant {
                variants: vec![FlagVariant {
                    name: "cheap".into(),
                    profile: "missing".into(),
                }],
                default_variant: "cheap".into(),
            },
        );
        let strategy = ResolutionStrategy::default();
        assert_eq!(
            strategy.resolve(&snap).unwrap_err(),
            ResolveError::ProfileNotFound("missing".into())
        );
    }

    #[test]
    fn resolution_is_deterministic_for_a_snapshot() {
        let snap = snapshot();
        let strategy = ResolutionStrategy::default();
        let first = strategy.resolve(&snap).unwrap();
        let second = strategy.resolve(&snap).unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
