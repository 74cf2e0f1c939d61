//! `postflow check` - show resolved configuration and publish readiness

use crate::loader::load_config;
use anyhow::{Context, Result};

/// Run the check command
pub fn run() -> Result<()> {
    let config = load_config()?;
    let core = config.orchestrator_config();
    core.validate().context("Invalid orchestrator configuration")?;

    println!("\n🔧 Postflow configuration\n");
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    for line in rendered.lines() {
        println!("  {}", line);
    }

    println!();
    print!("Audit database... ");
    println!("{}", config.audit.resolved_db_path().display());

    print!("Publishing... ");
    if !config.publish.enabled {
        println!("⏸️  disabled in configuration");
    } else if core.publish_enabled {
        println!("✅ ready");
    } else {
        println!("⚠️  unavailable, missing credentials:");
        for name in config.publish.missing_credentials() {
            println!("    - {}", name);
        }
    }

    Ok(())
}
