//! Settings of the application, read from `config/settings.toml` (or the
//! file given with `--config`) and then from `BUDGET__*` environment
//! variables, e.g. `BUDGET__TELEGRAM__TOKEN`.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use engine::Budget;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/settings.toml";

#[derive(Debug, Parser)]
#[command(name = "budget_organizer", version)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long)]
    level: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Organizer {
    /// IANA name deciding which calendar day an expense belongs to.
    pub timezone: String,
    /// Directory holding the `expenses_<chat>.json` documents.
    pub database: String,
    /// Budget given to chats that have no document yet.
    pub budget: Option<Budget>,
}

impl Default for Organizer {
    fn default() -> Self {
        Self {
            timezone: "America/Sao_Paulo".to_string(),
            database: "database".to_string(),
            budget: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CurrencyBeacon {
    pub api_key: String,
    pub base_url: String,
}

impl Default for CurrencyBeacon {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: telegram_bot::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    #[serde(default)]
    pub allowed_usernames: Vec<String>,
    pub notify_chat_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub organizer: Organizer,
    #[serde(default)]
    pub currency_beacon: CurrencyBeacon,
    pub telegram: Option<Telegram>,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(config_path).required(args.config.is_some()))
            .add_source(
                Environment::with_prefix("BUDGET")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("telegram.allowed_usernames"),
            )
            .build()?
            .try_deserialize()?;

        if let Some(level) = args.level {
            settings.app.level = level;
        }

        Ok(settings)
    }
}
