//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Default markup percentages applied when a budget version does not
    /// define its own.
    #[serde(default)]
    pub markups: MarkupConfig,
    /// Certification settings.
    #[serde(default)]
    pub certification: CertificationConfig,
}

/// Default markup percentages, as raw percent values (e.g. `13` = 13%).
#[derive(Debug, Clone, Deserialize)]
pub struct MarkupConfig {
    /// General overhead percentage.
    #[serde(default = "default_overhead_pct")]
    pub overhead_pct: Decimal,
    /// Financial cost percentage.
    #[serde(default = "default_financial_pct")]
    pub financial_pct: Decimal,
    /// Industrial profit percentage.
    #[serde(default = "default_profit_pct")]
    pub profit_pct: Decimal,
    /// Tax percentage.
    #[serde(default = "default_tax_pct")]
    pub tax_pct: Decimal,
}

fn default_overhead_pct() -> Decimal {
    Decimal::new(13, 0)
}

fn default_financial_pct() -> Decimal {
    Decimal::ZERO
}

fn default_profit_pct() -> Decimal {
    Decimal::new(6, 0)
}

fn default_tax_pct() -> Decimal {
    Decimal::new(21, 0)
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            overhead_pct: default_overhead_pct(),
            financial_pct: default_financial_pct(),
            profit_pct: default_profit_pct(),
            tax_pct: default_tax_pct(),
        }
    }
}

/// Certification settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificationConfig {
    /// Project salt used to seed the first integrity seal in a chain.
    #[serde(default = "default_seal_salt")]
    pub seal_salt: String,
}

fn default_seal_salt() -> String {
    "obralis-dev-salt".to_string()
}

impl Default for CertificationConfig {
    fn default() -> Self {
        Self {
            seal_salt: default_seal_salt(),
        }
    }
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
            .add_source(config::Environment::with_prefix("OBRALIS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
