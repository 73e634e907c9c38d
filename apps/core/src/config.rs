//! Runtime configuration.
//!
//! Values come from command-line flags, falling back to `CHATBUDDY_*`
//! environment variables (a `.env` file is loaded first by the binary),
//! then to built-in defaults.

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::brain::Profile;
use crate::error::ChatError;

pub const DEFAULT_BOT_NAME: &str = "GrokBot";

/// Diagnostic log output format (stderr)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Command-line interface
#[derive(Debug, Parser)]
#[command(
    name = "chatbuddy",
    version,
    about = "A small chat buddy that answers greetings, questions and moods"
)]
pub struct Cli {
    /// Name the bot introduces itself with
    #[arg(long, env = "CHATBUDDY_NAME", default_value = DEFAULT_BOT_NAME)]
    pub name: String,

    /// JSON profile with custom reply pools and rules
    #[arg(long, env = "CHATBUDDY_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Seed for reproducible reply choices
    #[arg(long, env = "CHATBUDDY_SEED")]
    pub seed: Option<u64>,

    /// File that keeps a rolling history of finished sessions
    #[arg(long, env = "CHATBUDDY_SESSION_LOG")]
    pub session_log: Option<PathBuf>,

    #[arg(long, env = "CHATBUDDY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Validated configuration for one process
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatConfig {
    /// Display name, 1..=32 characters after trimming
    #[validate(length(min = 1, max = 32))]
    pub bot_name: String,
    pub profile_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub session_log: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: DEFAULT_BOT_NAME.to_string(),
            profile_path: None,
            seed: None,
            session_log: None,
            log_format: LogFormat::default(),
        }
    }
}

impl ChatConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ChatError> {
        let config = Self {
            bot_name: cli.name.trim().to_string(),
            profile_path: cli.profile,
            seed: cli.seed,
            session_log: cli.session_log,
            log_format: cli.log_format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Profile from `profile_path`, or the built-in one
    pub fn load_profile(&self) -> Result<Profile, ChatError> {
        match &self.profile_path {
            Some(path) => Profile::load(path),
            None => Ok(Profile::default()),
        }
    }

    /// Reply generator: seeded when a seed is configured, from OS entropy otherwise
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bot_name, "GrokBot");
    }

    #[test]
    fn test_blank_name_rejected() {
        let config = ChatConfig {
            bot_name: String::new(),
            ..ChatConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_long_name_rejected() {
        let config = ChatConfig {
            bot_name: "x".repeat(33),
            ..ChatConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = ChatConfig {
            seed: Some(99),
            ..ChatConfig::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_profile_uses_builtin() {
        let profile = ChatConfig::default().load_profile().unwrap();
        assert_eq!(profile.matcher.rules().len(), 3);
    }
}
