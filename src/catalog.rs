// Hotel catalog: the read-only records served from the static fixture

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Error types for catalog access
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Hotel not found: {0}")]
    NotFound(u32),

    #[error("Data source {source_name} unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("Catalog parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e.to_string())
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::Http(e.to_string())
    }
}

pub const DEFAULT_CURRENCY: &str = "BAHT";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRecord {
    pub id: u32,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_numeric: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    // Canonical guest-capacity strings, treated as a set
    #[serde(default)]
    pub guests: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl HotelRecord {
    // Exact string membership, no numeric interpretation
    pub fn supports_guests(&self, capacity: &str) -> bool {
        self.guests.iter().any(|g| g == capacity)
    }
}

// Wire shape of the "read all" endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub hotels: Vec<HotelRecord>,
}

// Criteria accepted by the query endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchCriteria {
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category: Option<String>,
    pub guests: Option<String>,
}

impl HotelSearchCriteria {
    fn matches(&self, hotel: &HotelRecord) -> bool {
        let location_ok = self
            .location
            .as_deref()
            .filter(|l| !l.is_empty())
            .map_or(true, |l| {
                hotel.location.to_lowercase().contains(&l.to_lowercase())
            });

        // A zero bound is the same as no bound
        let min_price_ok = self
            .min_price
            .filter(|p| *p != 0.0)
            .map_or(true, |min| hotel.price_numeric.map_or(false, |p| p >= min));

        let max_price_ok = self
            .max_price
            .filter(|p| *p != 0.0)
            .map_or(true, |max| hotel.price_numeric.map_or(false, |p| p <= max));

        let category_ok = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .map_or(true, |c| hotel.category.as_deref() == Some(c));

        let guests_ok = self
            .guests
            .as_deref()
            .filter(|g| !g.is_empty())
            .map_or(true, |g| hotel.supports_guests(g));

        location_ok && min_price_ok && max_price_ok && category_ok && guests_ok
    }
}

// Immutable catalog snapshot; clones share the same records
#[derive(Debug, Clone)]
pub struct Catalog {
    hotels: Arc<[HotelRecord]>,
}

impl Catalog {
    pub fn new(hotels: Vec<HotelRecord>) -> Self {
        Self {
            hotels: hotels.into(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Ok(Self::from(document))
    }

    pub fn hotels(&self) -> &[HotelRecord] {
        &self.hotels
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }

    pub fn find(&self, id: u32) -> Option<&HotelRecord> {
        self.hotels.iter().find(|h| h.id == id)
    }

    pub fn get(&self, id: u32) -> Result<&HotelRecord, CatalogError> {
        self.find(id).ok_or(CatalogError::NotFound(id))
    }

    pub fn search(&self, criteria: &HotelSearchCriteria) -> Vec<HotelRecord> {
        self.hotels
            .iter()
            .filter(|h| criteria.matches(h))
            .cloned()
            .collect()
    }

    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            hotels: self.hotels.to_vec(),
        }
    }
}

impl From<CatalogDocument> for Catalog {
    fn from(document: CatalogDocument) -> Self {
        Self::new(document.hotels)
    }
}

// Fixture shipped with the crate, used as the last-resort data path
pub const EMBEDDED_CATALOG_JSON: &str = include_str!("../data/hotels.json");
