use std::path::PathBuf;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Command-line flags. Each one overrides the file and `FS_*` environment layers.
#[derive(Debug, Default, Parser)]
#[command(name = "bench-server", version, about = "Share and compare gameplay benchmark captures")]
pub struct CliArgs {
    /// Bind address and port
    #[arg(long)]
    pub bind: Option<String>,

    /// Path where data would be stored
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Discord OAuth2 client ID (see https://discord.com/developers/applications)
    #[arg(long)]
    pub discord_client_id: Option<String>,

    /// Discord OAuth2 client secret
    #[arg(long)]
    pub discord_client_secret: Option<String>,

    /// Discord OAuth2 redirect URL (<scheme>://<domain>/login/callback)
    #[arg(long)]
    pub discord_redirect_url: Option<String>,

    /// OpenAI-compatible API URL
    #[arg(long)]
    pub openai_url: Option<String>,

    /// Model ID sent to the chat completion endpoint
    #[arg(long)]
    pub openai_model: Option<String>,

    /// API key (leave empty to disable automatic summaries)
    #[arg(long)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub bind: String,
    pub data_dir: PathBuf,
    pub discord_client_id: String,
    pub discord_client_secret: String,
    pub discord_redirect_url: String,
    pub openai_url: String,
    pub openai_model: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

impl AppConfig {
    pub fn load(args: CliArgs) -> Result<Self, ConfigError> {
        Self::load_with_env(args, Environment::with_prefix("FS"))
    }

    fn load_with_env(args: CliArgs, env: Environment) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("bind", "0.0.0.0:8080")?
            .set_default("data_dir", "/data")?
            .set_default("discord_client_id", "")?
            .set_default("discord_client_secret", "")?
            .set_default("discord_redirect_url", "")?
            .set_default("openai_url", "https://api.openai.com/v1")?
            .set_default("openai_model", "gpt-4o")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., FS_DATA_DIR)
            .add_source(env)
            .set_override_option("bind", args.bind)?
            .set_override_option("data_dir", args.data_dir)?
            .set_override_option("discord_client_id", args.discord_client_id)?
            .set_override_option("discord_client_secret", args.discord_client_secret)?
            .set_override_option("discord_redirect_url", args.discord_redirect_url)?
            .set_override_option("openai_url", args.openai_url)?
            .set_override_option("openai_model", args.openai_model)?
            .set_override_option("openai_api_key", args.openai_api_key)?
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing = |name: &str| ConfigError::Message(format!("missing {name} argument"));

        if self.data_dir.as_os_str().is_empty() {
            return Err(missing("data-dir"));
        }
        if self.discord_client_id.is_empty() {
            return Err(missing("discord-client-id"));
        }
        if self.discord_client_secret.is_empty() {
            return Err(missing("discord-client-secret"));
        }
        if self.discord_redirect_url.is_empty() {
            return Err(missing("discord-redirect-url"));
        }
        if self.openai_api_key().is_some() {
            if self.openai_url.is_empty() {
                return Err(missing("openai-url"));
            }
            if self.openai_model.is_empty() {
                return Err(missing("openai-model"));
            }
        }
        Ok(())
    }

    /// The API key, treating an empty value as unset.
    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("database.db")
    }

    pub fn benchmarks_dir(&self) -> PathBuf {
        self.data_dir.join("benchmarks")
    }

    pub fn database_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.database_path().display())
    }
}
