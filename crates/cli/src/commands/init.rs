//! `switchboard init`: write starter configuration files.

use std::path::Path;

use switchboard_config::{
    AppConfig, CompletionProfile, ConfigDocument, ConnectionInfo, FeatureFlag, FlagVariant,
    PromptMessage,
};

pub async fn run(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🦀 Switchboard Setup");
    println!("====================\n");

    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        println!("✅ Created directory: {}", dir.display());
    }

    let config_path = dir.join("switchboard.toml");
    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created {}", config_path.display());
    }

    let settings_path = dir.join("settings.json");
    if settings_path.exists() {
        println!("⚠️  Settings already exist at: {}", settings_path.display());
    } else {
        let sample = serde_json::to_string_pretty(&sample_document())?;
        std::fs::write(&settings_path, sample)?;
        println!("✅ Created {}", settings_path.display());
    }

    println!("\n📝 Next steps:");
    println!("   1. Put your API key in settings.json (or set OPENAI_API_KEY)");
    println!("   2. Run `switchboard check` to verify the setup");
    println!("   3. Run `switchboard serve` to start the gateway");

    Ok(())
}

/// Two profiles and both flag kinds, enough to demo a live switch.
fn sample_document() -> ConfigDocument {
    let mut doc = ConfigDocument::default();

    doc.connection = Some(ConnectionInfo {
        endpoint: "https://api.openai.com/v1".into(),
        api_key: None,
    });

    doc.profiles.insert(
        "default".into(),
        CompletionProfile {
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: Some(1024),
            top_p: None,
            messages: vec![PromptMessage {
                role: "system".into(),
                content: "You are a helpful assistant.".into(),
            }],
        },
    );
    doc.profiles.insert(
        "creative".into(),
        CompletionProfile {
            model: "gpt-4o".into(),
            temperature: 1.2,
            max_tokens: Some(2048),
            top_p: Some(0.95),
            messages: vec![PromptMessage {
                role: "system".into(),
                content: "You are an imaginative writing partner.".into(),
            }],
        },
    );

    doc.flags.insert(
        "completion-profile".into(),
        FeatureFlag::Variant {
            variants: vec![
                FlagVariant {
                    name: "default".into(),
                    profile: "default".into(),
                },
                FlagVariant {
                    name: "creative".into(),
                    profile: "creative".into(),
                },
            ],
            default_variant: "default".into(),
        },
    );
    doc.flags
        .insert("verbose-prompts".into(), FeatureFlag::Boolean { enabled: false });

    doc
}
