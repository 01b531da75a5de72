//! Application configuration management.

use serde::Deserialize;
use uuid::Uuid;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Accounts the inventory engine posts against.
    pub accounts: PostingAccounts,
    /// Sale notification configuration.
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Financial year configuration.
    #[serde(default)]
    pub fiscal: FiscalConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Chart-of-accounts entries used by stock and sales postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PostingAccounts {
    /// Inventory asset account (credited on sale, debited on receipt).
    pub stock_account_id: Uuid,
    /// Sales revenue account.
    pub sales_account_id: Uuid,
    /// Cost of goods sold account.
    pub cost_of_sales_account_id: Uuid,
}

/// SMS gateway configuration for the post-sale thank-you message.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Whether messages are sent at all.
    #[serde(default)]
    pub enabled: bool,
    /// Gateway endpoint receiving the message as query parameters.
    #[serde(default)]
    pub endpoint: String,
    /// Gateway API key.
    #[serde(default)]
    pub api_key: String,
    /// Currency label printed before the amount.
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
    /// Extra recipients copied on every message.
    #[serde(default)]
    pub copy_to: Vec<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_key: String::new(),
            currency_label: default_currency_label(),
            copy_to: Vec::new(),
            timeout_secs: default_notification_timeout(),
        }
    }
}

fn default_currency_label() -> String {
    "LKR".to_string()
}

fn default_notification_timeout() -> u64 {
    10
}

/// Financial year configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FiscalConfig {
    /// Month (1-12) on whose first day the financial year begins.
    #[serde(default = "default_year_start_month")]
    pub year_start_month: u32,
}

impl Default for FiscalConfig {
    fn default() -> Self {
        Self {
            year_start_month: default_year_start_month(),
        }
    }
}

fn default_year_start_month() -> u32 {
    4 // April
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TRADELEDGER")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("notification.copy_to")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
