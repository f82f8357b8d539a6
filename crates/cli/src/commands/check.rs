//! `switchboard check`: diagnose configuration and settings-store health.

use switchboard_config::{AppConfig, ConfigSnapshot};
use switchboard_store::source_from_config;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Switchboard Check");
    println!("====================\n");

    let mut issues = 0;

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Bootstrap config loaded");
            Some(config)
        }
        Err(e) => {
            println!("  ❌ Bootstrap config failed to load: {e}");
            issues += 1;
            None
        }
    };

    if let Some(config) = config {
        let source = source_from_config(&config.store.source);
        match source.fetch().await {
            Ok(document) => {
                println!("  ✅ Settings document fetched from {}", source.describe());

                match &document.connection {
                    Some(connection) => {
                        println!("  ✅ Connection endpoint: {}", connection.endpoint);
                        if connection.resolve_api_key().is_some() {
                            println!("  ✅ API credential resolvable");
                        } else {
                            println!(
                                "  ⚠️  No API key in settings or environment (SWITCHBOARD_API_KEY, OPENAI_API_KEY)"
                            );
                            issues += 1;
                        }
                    }
                    None => {
                        println!("  ❌ Settings document has no connection section");
                        issues += 1;
                    }
                }

                let snapshot = ConfigSnapshot::from_document(document);
                println!(
                    "  ✅ {} profile(s), {} flag(s)",
                    snapshot.profiles.len(),
                    snapshot.flags.len()
                );

                match config.resolution.resolve(&snapshot) {
                    Ok(profile) => println!("  ✅ Resolution picks model: {}", profile.model),
                    Err(e) => {
                        println!("  ❌ Resolution failed: {e}");
                        issues += 1;
                    }
                }
            }
            Err(e) => {
                println!("  ❌ Settings fetch failed: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
