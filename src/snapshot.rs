// Catalog snapshot cache: keeps the last loaded catalog for a bounded time so
// every request does not go back to the data source

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogError};
use crate::source::CatalogSource;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SnapshotStats {
    pub hits: usize,
    pub misses: usize,
    pub loads: usize,
    pub failures: usize,
    pub items_count: usize,
}

#[derive(Debug, Clone)]
struct Snapshot {
    catalog: Catalog,
    loaded_at: Instant,
}

#[derive(Debug, Default)]
pub struct SnapshotCache {
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
    stats: RwLock<SnapshotStats>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Default::default()
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn fresh(&self) -> Option<Catalog> {
        self.snapshot
            .read()
            .as_ref()
            .filter(|s| s.loaded_at.elapsed() < self.ttl)
            .map(|s| s.catalog.clone())
    }

    // Concurrent callers may each trigger a load after expiry; the last
    // writer wins and earlier callers keep the snapshot they loaded
    pub async fn get_or_load(&self, source: &dyn CatalogSource) -> Result<Catalog, CatalogError> {
        if let Some(catalog) = self.fresh() {
            self.stats.write().hits += 1;
            return Ok(catalog);
        }

        self.stats.write().misses += 1;
        debug!(source = source.name(), "catalog snapshot missing or expired");

        match source.load().await {
            Ok(catalog) => {
                info!(source = source.name(), hotels = catalog.len(), "catalog snapshot loaded");
                *self.snapshot.write() = Some(Snapshot {
                    catalog: catalog.clone(),
                    loaded_at: Instant::now(),
                });
                let mut stats = self.stats.write();
                stats.loads += 1;
                stats.items_count = catalog.len();
                Ok(catalog)
            }
            Err(e) => {
                self.stats.write().failures += 1;
                Err(e)
            }
        }
    }

    pub fn invalidate(&self) -> bool {
        let removed = self.snapshot.write().take().is_some();
        if removed {
            self.stats.write().items_count = 0;
        }
        removed
    }

    pub fn stats(&self) -> SnapshotStats {
        self.stats.read().clone()
    }
}
