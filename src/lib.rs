// Hotel search and booking flow: catalog access, query pipeline and pricing

pub mod booking;
pub mod catalog;
pub mod circuit_breaker;
pub mod config;
pub mod params;
pub mod pricing;
pub mod query;
pub mod search;
pub mod service;
pub mod snapshot;
pub mod source;
pub mod views;

// Re-export key types for convenience
pub use booking::{simulate_payment, BookingConfirmation, BookingError, BookingParams, BookingStep, GuestDetails, PaymentMethod};
pub use catalog::{Catalog, CatalogDocument, CatalogError, HotelRecord, HotelSearchCriteria};
pub use config::{ConfigError, EngineConfig};
pub use pricing::{calculate_cost, CostBreakdown, PricingFallback, PricingPolicy, RoomType};
pub use query::{filter_hotels, run_query, sort_hotels, QueryCriteria, ResultsView, SortKey};
pub use search::SearchState;
pub use service::HotelService;
pub use source::{CatalogSource, FallbackCatalogSource, FileCatalogSource, HttpCatalogSource, StaticCatalogSource};
