//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SANEKEY_DATA_DIR` - Directory for the file-backed cart slot (default: .sanekey)
//! - `SANEKEY_STORAGE_KEY` - Cart slot name (default: sanekey-cart)
//! - `SANEKEY_CATALOG_PATH` - Product catalog YAML file (default: catalog.yaml)
//! - `SANEKEY_CURRENCY` - Cart currency (default: INR)
//! - `SANEKEY_TAX_RATE` - Tax rate as a fraction, 0 to 1 (default: 0.18)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use sanekey_core::CurrencyCode;

use crate::store::{CartSettings, DEFAULT_STORAGE_KEY};
use crate::summary::DEFAULT_TAX_RATE;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory holding the persisted cart slot
    pub data_dir: PathBuf,
    /// Storage slot name for the cart
    pub storage_key: String,
    /// Path to the product catalog file
    pub catalog_path: PathBuf,
    /// Currency the cart is priced in
    pub currency: CurrencyCode,
    /// Tax rate applied in the order summary
    pub tax_rate: Decimal,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".sanekey"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            catalog_path: PathBuf::from("catalog.yaml"),
            currency: CurrencyCode::default(),
            tax_rate: DEFAULT_TAX_RATE,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let currency = match lookup("SANEKEY_CURRENCY") {
            Some(raw) => raw
                .parse::<CurrencyCode>()
                .map_err(|e| ConfigError::InvalidEnvVar("SANEKEY_CURRENCY".to_string(), e))?,
            None => defaults.currency,
        };

        let tax_rate = match lookup("SANEKEY_TAX_RATE") {
            Some(raw) => parse_tax_rate(&raw)?,
            None => defaults.tax_rate,
        };

        let storage_key = lookup("SANEKEY_STORAGE_KEY").unwrap_or(defaults.storage_key);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "SANEKEY_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            data_dir: lookup("SANEKEY_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            storage_key,
            catalog_path: lookup("SANEKEY_CATALOG_PATH").map_or(defaults.catalog_path, PathBuf::from),
            currency,
            tax_rate,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Settings for a cart store.
    #[must_use]
    pub fn cart_settings(&self) -> CartSettings {
        CartSettings {
            storage_key: self.storage_key.clone(),
            currency: self.currency,
        }
    }
}

/// Parse a tax rate fraction in `[0, 1]`.
fn parse_tax_rate(raw: &str) -> Result<Decimal, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("SANEKEY_TAX_RATE".to_string(), reason);

    let rate = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|e| invalid(e.to_string()))?;
    if rate.is_sign_negative() || rate > Decimal::ONE {
        return Err(invalid(format!("must be between 0 and 1 (got {rate})")));
    }
    Ok(rate)
}
