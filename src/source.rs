// Catalog data sources: HTTP endpoint, JSON file, embedded fixture, and the
// primary/secondary fallback chain in front of them

use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::catalog::{Catalog, CatalogDocument, CatalogError, EMBEDDED_CATALOG_JSON};
use crate::circuit_breaker::{BreakerState, CircuitBreaker, CircuitBreakerConfig};

#[async_trait]
pub trait CatalogSource: Send + Sync + 'static {
    fn name(&self) -> &str;

    // Load a full catalog snapshot
    async fn load(&self) -> Result<Catalog, CatalogError>;
}

pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    pub const CATALOG_PATH: &'static str = "/api/hotels";

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), Self::CATALOG_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn load(&self) -> Result<Catalog, CatalogError> {
        debug!(url = %self.url, "fetching catalog");
        let document = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<CatalogDocument>()
            .await?;
        Ok(Catalog::from(document))
    }
}

pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self) -> Result<Catalog, CatalogError> {
        debug!(path = %self.path.display(), "reading catalog file");
        let json = tokio::fs::read_to_string(&self.path).await?;
        Catalog::from_json(&json)
    }
}

pub struct StaticCatalogSource {
    name: String,
    json: String,
}

impl StaticCatalogSource {
    pub fn new(name: impl Into<String>, json: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json: json.into(),
        }
    }

    // The fixture compiled into the crate
    pub fn embedded() -> Self {
        Self::new("embedded", EMBEDDED_CATALOG_JSON)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Catalog, CatalogError> {
        Catalog::from_json(&self.json)
    }
}

pub struct FallbackCatalogSource {
    name: String,
    primary: Box<dyn CatalogSource>,
    secondary: Box<dyn CatalogSource>,
    breaker: Mutex<CircuitBreaker>,
}

impl FallbackCatalogSource {
    pub fn new(
        primary: Box<dyn CatalogSource>,
        secondary: Box<dyn CatalogSource>,
        breaker_config: &CircuitBreakerConfig,
    ) -> Self {
        Self {
            name: format!("{}>{}", primary.name(), secondary.name()),
            primary,
            secondary,
            breaker: Mutex::new(CircuitBreaker::new(breaker_config)),
        }
    }

    pub fn breaker_state(&self) -> BreakerState {
        self.breaker.lock().state()
    }

    async fn try_primary(&self) -> Result<Catalog, String> {
        let allowed = self.breaker.lock().should_allow_call();
        if !allowed {
            debug!(source = self.primary.name(), "circuit open, skipping primary");
            return Err("circuit open".to_string());
        }

        match self.primary.load().await {
            Ok(catalog) => {
                self.breaker.lock().success();
                Ok(catalog)
            }
            Err(e) => {
                self.breaker.lock().fail();
                warn!(source = self.primary.name(), error = %e, "primary catalog source failed, using fallback");
                Err(e.to_string())
            }
        }
    }
}

#[async_trait]
impl CatalogSource for FallbackCatalogSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Catalog, CatalogError> {
        let primary_error = match self.try_primary().await {
            Ok(catalog) => return Ok(catalog),
            Err(reason) => reason,
        };

        match self.secondary.load().await {
            Ok(catalog) => Ok(catalog),
            Err(e) => {
                warn!(source = self.secondary.name(), error = %e, "secondary catalog source failed");
                Err(CatalogError::SourceUnavailable {
                    source_name: self.name.clone(),
                    reason: format!("primary: {primary_error}; secondary: {e}"),
                })
            }
        }
    }
}
