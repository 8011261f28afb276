use std::{path::PathBuf, time::Duration};

use clap::Parser;
use thiserror::Error;

use crate::processing::{ClassifierOptions, DEFAULT_MODEL, LinkFilter, OPENROUTER_API_URL};
use crate::state::CooldownPolicy;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required DISCORD_TOKEN environment variable. Make sure you have a .env file with DISCORD_TOKEN=your_token")]
    MissingDiscordToken,

    #[error("Missing OPENROUTER_API_KEY environment variable. Add OPENROUTER_API_KEY=your_api_key to .env file, or run with --no-ai")]
    MissingApiKey,
}

/// Firka iOS guide auto-replier for Discord
#[derive(Parser, Debug)]
#[command(name = "firka-autoreply", version)]
pub struct Args {
    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub discord_token: Option<String>,

    /// OpenRouter API key, required unless --no-ai
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub openrouter_api_key: Option<String>,

    /// Model asked to confirm keyword matches
    #[arg(long, env = "OPENROUTER_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Chat-completions endpoint
    #[arg(long, env = "OPENROUTER_API_URL", default_value = OPENROUTER_API_URL)]
    pub api_url: String,

    /// Answer on keyword matches alone, never call the model
    #[arg(long, env = "GUIDE_NO_AI")]
    pub no_ai: bool,

    /// Request timeout for the classifier call
    #[arg(long, env = "GUIDE_AI_TIMEOUT_SECS", default_value_t = 15)]
    pub ai_timeout_secs: u64,

    /// Extra attempts after a network failure or timeout (0-5)
    #[arg(long, env = "GUIDE_AI_RETRIES", default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=5))]
    pub ai_retries: u32,

    /// Minimum seconds between two automatic replies in one server
    #[arg(long, env = "GUIDE_COOLDOWN_SECS", default_value_t = 30)]
    pub cooldown_secs: u64,

    #[arg(long, env = "GUIDE_COOLDOWN_POLICY", value_enum, default_value_t = CooldownPolicy::OnTrigger)]
    pub cooldown_policy: CooldownPolicy,

    #[arg(long, env = "GUIDE_LINK_FILTER", value_enum, default_value_t = LinkFilter::BeforeRemote)]
    pub link_filter: LinkFilter,

    /// Messages with a URL shorter than this are treated as link shares
    #[arg(long, env = "GUIDE_LINK_MAX_LEN", default_value_t = 100)]
    pub link_max_len: usize,

    /// Where per-server reply counts are kept
    #[arg(long, env = "GUIDE_COUNTERS_FILE", default_value = "counters.json")]
    pub counters_file: PathBuf,

    /// Verbose logging (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub remote: Option<RemoteSettings>,
    pub classifier: ClassifierOptions,
    pub cooldown: Duration,
    pub cooldown_policy: CooldownPolicy,
    pub counters_file: PathBuf,
}

impl Args {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "firka_autoreply=info,serenity=warn",
            1 => "firka_autoreply=debug,serenity=info",
            _ => "firka_autoreply=trace,serenity=debug",
        }
    }

    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let discord_token = non_blank(self.discord_token).ok_or(ConfigError::MissingDiscordToken)?;

        let remote = if self.no_ai {
            None
        } else {
            let api_key = non_blank(self.openrouter_api_key).ok_or(ConfigError::MissingApiKey)?;
            Some(RemoteSettings {
                api_url: self.api_url,
                api_key,
                model: self.model,
                timeout: Duration::from_secs(self.ai_timeout_secs),
            })
        };

        Ok(Settings {
            discord_token,
            remote,
            classifier: ClassifierOptions {
                link_filter: self.link_filter,
                link_max_len: self.link_max_len,
                retries: self.ai_retries,
                ..ClassifierOptions::default()
            },
            cooldown: Duration::from_secs(self.cooldown_secs),
            cooldown_policy: self.cooldown_policy,
            counters_file: self.counters_file,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
