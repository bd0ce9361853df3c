//! Config file commands.

use crate::config::{self, Config, ConfigError};

/// Print the effective configuration, API key masked
pub fn cmd_config_show() -> anyhow::Result<()> {
    let config = masked(config::load());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Print the config file location
pub fn cmd_config_path() -> anyhow::Result<()> {
    let path = config::config_path().ok_or(ConfigError::NoConfigDir)?;
    println!("{}", path.display());
    Ok(())
}

/// Write a default config file
pub fn cmd_config_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path().ok_or(ConfigError::NoConfigDir)?;
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        println!("Use --force to overwrite it.");
        return Ok(());
    }

    let path = config::save(&Config::default())?;
    println!("Wrote default config to {}", path.display());
    println!("Set credentials.plant_id_api_key and identification.endpoint before scanning.");
    Ok(())
}

fn masked(mut config: Config) -> Config {
    if let Some(key) = config.credentials.plant_id_api_key.as_mut() {
        *key = mask_key(key);
    }
    config
}

/// Keep the last four characters so users can tell keys apart.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
