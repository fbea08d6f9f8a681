//! Shared types for the garrison bot.
//!
//! Currently this is the environment-sourced process configuration. The
//! heavier moving parts (chat adapter, row store, command framework) live in
//! their own crates and depend on this one.

pub mod config;

pub use config::{BotConfig, ConfigError};
