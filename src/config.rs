// Engine configuration: data sources, snapshot cache, breaker and pricing

use std::{path::PathBuf, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::circuit_breaker::CircuitBreakerConfig;
use crate::pricing::PricingPolicy;
use crate::service::HotelService;
use crate::source::{
    CatalogSource, FallbackCatalogSource, FileCatalogSource, HttpCatalogSource, StaticCatalogSource,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    // Base URL of the hotel API; `/api/hotels` is appended
    pub primary_url: Option<String>,
    pub fallback_path: Option<PathBuf>,
    pub request_timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            primary_url: None,
            fallback_path: None,
            request_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub source: SourceConfig,
    pub snapshot_ttl_seconds: u64,
    pub circuit_breaker: CircuitBreakerConfig,
    pub pricing: PricingPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            snapshot_ttl_seconds: 60,
            circuit_breaker: CircuitBreakerConfig::default(),
            pricing: PricingPolicy::default(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        })
}

// Pricing figures must stay finite and non-negative so every cost line is too
fn non_negative(key: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("pricing.default_base_price", self.pricing.default_base_price)?;
        non_negative("pricing.vat_rate", self.pricing.vat_rate)?;
        let discount = non_negative("pricing.discount", self.pricing.discount)?;
        if discount > 100.0 {
            return Err(ConfigError::InvalidValue {
                key: "pricing.discount".to_string(),
                value: discount.to_string(),
            });
        }
        Ok(())
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    // HOTEL_* variables take precedence over file values
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("HOTEL_PRIMARY_URL").filter(|v| !v.is_empty()) {
            self.source.primary_url = Some(url);
        }
        if let Some(path) = lookup("HOTEL_FALLBACK_PATH").filter(|v| !v.is_empty()) {
            self.source.fallback_path = Some(PathBuf::from(path));
        }
        if let Some(v) = lookup("HOTEL_REQUEST_TIMEOUT_MS") {
            self.source.request_timeout_ms = parse_value("HOTEL_REQUEST_TIMEOUT_MS", v)?;
        }
        if let Some(v) = lookup("HOTEL_SNAPSHOT_TTL_SECONDS") {
            self.snapshot_ttl_seconds = parse_value("HOTEL_SNAPSHOT_TTL_SECONDS", v)?;
        }
        if let Some(v) = lookup("HOTEL_VAT_RATE") {
            self.pricing.vat_rate = non_negative("HOTEL_VAT_RATE", parse_value("HOTEL_VAT_RATE", v)?)?;
        }
        if let Some(v) = lookup("HOTEL_DEFAULT_BASE_PRICE") {
            let price = parse_value("HOTEL_DEFAULT_BASE_PRICE", v)?;
            self.pricing.default_base_price = non_negative("HOTEL_DEFAULT_BASE_PRICE", price)?;
        }
        self.validate()?;
        Ok(self)
    }

    // http -> file -> embedded fixture, skipping the links not configured
    pub fn build_source(&self) -> Result<Arc<dyn CatalogSource>, ConfigError> {
        let mut chain: Box<dyn CatalogSource> = Box::new(StaticCatalogSource::embedded());

        if let Some(path) = &self.source.fallback_path {
            chain = Box::new(FallbackCatalogSource::new(
                Box::new(FileCatalogSource::new(path.clone())),
                chain,
                &self.circuit_breaker,
            ));
        }

        if let Some(url) = &self.source.primary_url {
            let http = HttpCatalogSource::new(url, Duration::from_millis(self.source.request_timeout_ms))?;
            chain = Box::new(FallbackCatalogSource::new(
                Box::new(http),
                chain,
                &self.circuit_breaker,
            ));
        }

        Ok(Arc::from(chain))
    }

    pub fn build_service(&self) -> Result<HotelService, ConfigError> {
        Ok(HotelService::new(
            self.build_source()?,
            Duration::from_secs(self.snapshot_ttl_seconds),
            self.pricing.clone(),
        ))
    }
}
