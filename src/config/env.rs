//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `EASEL_CONFIG` - Path to the configuration file
//! - `EASEL_DISCORD_TOKEN` - Discord bot token
//! - `EASEL_PIXIV_TOKEN_FILE` - Path to the pixiv token store
//! - `EASEL_TEMP_DIR` - Image staging directory

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "EASEL";

/// Default config file path when `EASEL_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "easel.conf";

/// Resolve the configuration file path.
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Apply environment variable overrides to a config.
///
/// This allows sensitive values like tokens to be provided via
/// environment variables instead of the config file.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Ok(token) = env::var(format!("{}_DISCORD_TOKEN", ENV_PREFIX)) {
        config.discord.token = token;
    }

    if let Ok(path) = env::var(format!("{}_PIXIV_TOKEN_FILE", ENV_PREFIX)) {
        config.pixiv.token_file = path;
    }

    if let Ok(dir) = env::var(format!("{}_TEMP_DIR", ENV_PREFIX)) {
        config.pixiv.temp_dir = dir;
    }

    config
}
