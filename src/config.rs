use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Bind to the testnet environment (default: true).
    /// Credentials are never read from config files; the adapter takes them
    /// from EXCHANGE_API_KEY / EXCHANGE_API_SECRET.
    #[serde(default = "default_testnet")]
    pub testnet: bool,
    /// Request validity window in milliseconds
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
}

fn default_testnet() -> bool {
    true
}

fn default_recv_window_ms() -> u64 {
    5000
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            testnet: default_testnet(),
            recv_window_ms: default_recv_window_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExecutionConfig {
    /// Halt a TWAP run after this many consecutive failed slices.
    /// None preserves fire-and-continue behavior.
    #[serde(default)]
    pub max_consecutive_failures: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path; set to none to log to console only
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> Option<String> {
    Some("bot.log".to_string())
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("exchange.testnet", true)?
            .set_default("exchange.recv_window_ms", 5000)?
            .set_default("logging.level", "info")?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("GAMBIT_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (GAMBIT_EXCHANGE__TESTNET, etc.)
            .add_source(
                Environment::with_prefix("GAMBIT")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.exchange.recv_window_ms == 0 || self.exchange.recv_window_ms > 60_000 {
            errors.push(format!(
                "recv_window_ms must be within 1..=60000: {}",
                self.exchange.recv_window_ms
            ));
        }

        if let Some(0) = self.execution.max_consecutive_failures {
            errors.push("max_consecutive_failures must be >= 1 when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
