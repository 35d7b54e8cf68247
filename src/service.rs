// Hotel service: the read/query operations the pages call, backed by a
// cached catalog snapshot

use std::{sync::Arc, time::Duration};

use tracing::{debug, instrument};

use crate::booking::BookingParams;
use crate::catalog::{Catalog, CatalogDocument, CatalogError, HotelRecord, HotelSearchCriteria};
use crate::pricing::{CostBreakdown, PricingPolicy};
use crate::query::{run_query, ResultsView, SortKey};
use crate::search::SearchState;
use crate::snapshot::{SnapshotCache, SnapshotStats};
use crate::source::CatalogSource;
use crate::views::{HotelCardView, HotelDetailView};

pub struct HotelService {
    source: Arc<dyn CatalogSource>,
    cache: SnapshotCache,
    pricing: PricingPolicy,
}

impl HotelService {
    pub fn new(source: Arc<dyn CatalogSource>, snapshot_ttl: Duration, pricing: PricingPolicy) -> Self {
        Self {
            source,
            cache: SnapshotCache::new(snapshot_ttl),
            pricing,
        }
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    pub async fn catalog(&self) -> Result<Catalog, CatalogError> {
        self.cache.get_or_load(self.source.as_ref()).await
    }

    // Read endpoint: the whole catalog
    pub async fn list_hotels(&self) -> Result<CatalogDocument, CatalogError> {
        Ok(self.catalog().await?.to_document())
    }

    // Read-by-id endpoint
    #[instrument(skip(self))]
    pub async fn get_hotel(&self, id: u32) -> Result<HotelRecord, CatalogError> {
        let catalog = self.catalog().await?;
        let hotel = catalog.get(id)?;
        Ok(hotel.clone())
    }

    // Query endpoint
    pub async fn search(&self, criteria: &HotelSearchCriteria) -> Result<CatalogDocument, CatalogError> {
        let hotels = self.catalog().await?.search(criteria);
        debug!(matches = hotels.len(), "catalog search");
        Ok(CatalogDocument { hotels })
    }

    // Listing page rows for a search and sort selection
    pub async fn results(&self, search: &SearchState, sort_key: SortKey) -> Result<Vec<HotelCardView>, CatalogError> {
        let catalog = self.catalog().await?;
        let hotels = run_query(&catalog, &search.criteria(), sort_key, &self.pricing);
        debug!(query = search.query_text(), sort = %sort_key, matches = hotels.len(), "results");
        Ok(hotels
            .iter()
            .map(|h| HotelCardView::from_record(h, &self.pricing))
            .collect())
    }

    pub async fn results_view(&self, search: &SearchState) -> Result<ResultsView, CatalogError> {
        Ok(ResultsView::new(
            self.catalog().await?,
            search.criteria(),
            self.pricing.clone(),
        ))
    }

    pub async fn hotel_detail(&self, id: u32) -> Result<HotelDetailView, CatalogError> {
        let hotel = self.get_hotel(id).await?;
        Ok(HotelDetailView::from_record(&hotel, &self.pricing))
    }

    pub async fn quote(&self, id: u32, room_type: &str, days: i64) -> Result<CostBreakdown, CatalogError> {
        let hotel = self.get_hotel(id).await?;
        let cost = self
            .pricing
            .calculate(room_type, days, hotel.price_numeric)
            .with_currency(hotel.currency);
        Ok(cost)
    }

    pub async fn start_booking(&self, id: u32, search: &SearchState) -> Result<BookingParams, CatalogError> {
        let cost = self.quote(id, &search.room_type, search.nights()).await?;
        Ok(BookingParams::new(id, search, cost))
    }

    pub fn invalidate(&self) -> bool {
        self.cache.invalidate()
    }

    pub fn snapshot_stats(&self) -> SnapshotStats {
        self.cache.stats()
    }
}
