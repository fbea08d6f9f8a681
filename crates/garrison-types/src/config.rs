//! Environment-sourced process configuration.
//!
//! [`BotConfig`] is read once at startup. Missing or malformed required
//! values abort startup before any connection is made; optional values fall
//! back to documented defaults.

use serde::{Deserialize, Serialize};

/// Default HTTP liveness port when `PORT` is not set.
const DEFAULT_PORT: u16 = 10000;

/// Default command prefix when `COMMAND_PREFIX` is not set.
const DEFAULT_PREFIX: &str = "!";

/// Errors produced while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {detail}")]
    Invalid {
        name: &'static str,
        detail: String,
    },
}

/// Top-level configuration for the bot process.
///
/// All values are sourced from the environment. `port` and `prefix` have
/// defaults; everything else is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BotConfig {
    /// Chat-platform bot credential token.
    pub bot_token: String,
    /// Channel the bot watches for commands and deployment logs.
    pub channel_id: String,
    /// User ID of the trusted automated account that posts deployment logs.
    pub log_author_id: String,
    /// Identifier of the spreadsheet all tables live in.
    pub spreadsheet_id: String,
    /// Access token for the tabular-store API.
    pub sheets_token: String,
    /// Port for the keep-alive HTTP listener.
    pub port: u16,
    /// Leading character sequence that marks a message as a command.
    pub prefix: String,
    /// Role ID used as the default mention target in announcements.
    pub default_role_id: String,
}

impl BotConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests supply a map-backed closure instead
    /// of touching the real environment.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            match get(name) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => Err(ConfigError::Missing(name)),
            }
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                detail: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let prefix = match get("COMMAND_PREFIX") {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_PREFIX.to_string(),
        };

        Ok(Self {
            bot_token: required("DISCORD_TOKEN")?,
            channel_id: required("DEPLOYMENT_CHANNEL_ID")?,
            log_author_id: required("LOG_AUTHOR_ID")?,
            spreadsheet_id: required("SPREADSHEET_ID")?,
            sheets_token: required("SHEETS_TOKEN")?,
            port,
            prefix,
            default_role_id: required("DEFAULT_ROLE_ID")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DISCORD_TOKEN", "tok"),
            ("DEPLOYMENT_CHANNEL_ID", "123"),
            ("LOG_AUTHOR_ID", "456"),
            ("SPREADSHEET_ID", "sheet-1"),
            ("SHEETS_TOKEN", "stok"),
            ("DEFAULT_ROLE_ID", "789"),
        ])
    }

    fn lookup<'a>(map: &'a HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| map.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_config_loads_with_defaults() {
        let env = full_env();
        let config = BotConfig::from_lookup(lookup(&env)).unwrap();
        assert_eq!(config.bot_token, "tok");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.prefix, "!");
    }

    #[test]
    fn test_config_overrides_defaults() {
        let mut env = full_env();
        env.insert("PORT", "8080");
        env.insert("COMMAND_PREFIX", "E://");
        let config = BotConfig::from_lookup(lookup(&env)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.prefix, "E://");
    }

    #[test]
    fn test_config_missing_required() {
        let mut env = full_env();
        env.remove("DISCORD_TOKEN");
        let err = BotConfig::from_lookup(lookup(&env)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DISCORD_TOKEN")));
    }

    #[test]
    fn test_config_blank_required_is_missing() {
        let mut env = full_env();
        env.insert("SPREADSHEET_ID", "   ");
        let err = BotConfig::from_lookup(lookup(&env)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SPREADSHEET_ID")));
    }

    #[test]
    fn test_config_invalid_port() {
        let mut env = full_env();
        env.insert("PORT", "not-a-port");
        let err = BotConfig::from_lookup(lookup(&env)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }
}
