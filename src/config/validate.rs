//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Validate Discord config
    if config.discord.token.is_empty() {
        errors.push("discord.token is required".to_string());
    }
    if config.discord.token == "YOUR_DISCORD_TOKEN_HERE" {
        errors.push("discord.token has not been configured (still using placeholder)".to_string());
    }

    // Validate pixiv config
    if config.pixiv.token_file.is_empty() {
        errors.push("pixiv.token_file is required".to_string());
    }
    if config.pixiv.temp_dir.is_empty() {
        errors.push("pixiv.temp_dir is required".to_string());
    }

    // Validate access lists
    if let Some(ref access) = config.access {
        for (i, entry) in access.guilds.iter().flatten().enumerate() {
            if entry.guild == 0 {
                errors.push(format!("access.guilds[{}].guild must be non-zero", i));
            }
            for channel in entry.channels.iter().flatten() {
                if *channel == 0 {
                    errors.push(format!(
                        "access.guilds[{}] contains a zero channel ID",
                        i
                    ));
                }
            }
        }
        for (i, rule) in access.spoilers.iter().flatten().enumerate() {
            if rule.id == 0 {
                errors.push(format!("access.spoilers[{}].id must be non-zero", i));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::load_config_str;

    fn valid_config() -> Config {
        load_config_str(
            r#"
            discord { token = "abc" }
            pixiv { token_file = "tokens.txt", temp_dir = "/tmp/easel" }
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let mut config = valid_config();
        config.discord.token = "YOUR_DISCORD_TOKEN_HERE".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_all_errors_reported_at_once() {
        let mut config = valid_config();
        config.discord.token = String::new();
        config.pixiv.token_file = String::new();
        config.pixiv.temp_dir = String::new();

        let err = validate_config(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("discord.token"));
        assert!(message.contains("pixiv.token_file"));
        assert!(message.contains("pixiv.temp_dir"));
    }

    #[test]
    fn test_zero_guild_id_rejected() {
        let mut config = valid_config();
        config.access = load_config_str(
            r#"
            discord { token = "abc" }
            pixiv { token_file = "t", temp_dir = "/tmp" }
            access { guilds = [ { guild = 0 } ] }
            "#,
        )
        .unwrap()
        .access;
        assert!(validate_config(&config).is_err());
    }
}
