use std::fs;
use once_cell::sync::OnceCell;
use crate::config::BrickbotConfig;

static GLOBAL_CONFIG: OnceCell<BrickbotConfig> = OnceCell::new();

pub mod config;

/// Load the configuration file and freeze it as the process-wide config.
/// A missing file is not an error (the bot can run from environment
/// variables alone); a file that fails to parse is.
/// `DISCORD_TOKEN` always overrides the token from the file.
pub fn load_config(path: &str) -> &'static BrickbotConfig {
    let mut config: BrickbotConfig = match fs::read_to_string(path) {
        Ok(cfg_str) => toml::from_str(&cfg_str)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e)),
        Err(_) => BrickbotConfig::default(),
    };

    if let Ok(token) = std::env::var("DISCORD_TOKEN") {
        if !token.is_empty() {
            config.discord.token = token;
        }
    }

    GLOBAL_CONFIG
        .set(config)
        .unwrap_or_else(|_| panic!("don't call `load_config()` more than once"));

    get_config()
}

pub fn get_config() -> &'static BrickbotConfig {
    GLOBAL_CONFIG
        .get()
        .expect("called `get_config()` before config was initialized")
}
