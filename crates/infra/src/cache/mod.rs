//! Read-through dataset caching with moka
//!
//! [`CachedDataSource`] wraps any `DataSource`.
//!
//! # Cache Strategy
//! - **Entity counts**: single entry, time-to-live (default 5 minutes)
//! - **Windowed datasets**: keyed by `DateWindow`, no TTL, bounded capacity
//! - **Cash status**: single entry, no TTL
//! - **Errors**: never cached; a failed fetch propagates and the next call
//!   queries the source again
//!
//! Entries are immutable `Arc`s once inserted, so concurrent readers share
//! them without further locking.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::sync::Cache;
use recarga_core::DataSource;
use recarga_domain::{
    CashStatusRecord, DailySalesRecord, DashboardConfig, DateWindow, DeviceRevenueRecord,
    EntityCounts, Result, TransactionRecord,
};
use tracing::{debug, warn};

/// Cache sizing and expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live of the entity counts snapshot
    pub entity_counts_ttl: Duration,

    /// Maximum number of windows kept per windowed dataset
    pub window_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

impl From<&DashboardConfig> for CacheConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            entity_counts_ttl: Duration::from_secs(config.entity_counts_ttl_seconds),
            window_capacity: config.window_cache_capacity,
        }
    }
}

impl CacheConfig {
    /// Log configuration at startup
    pub fn log_config(&self) {
        tracing::info!(
            entity_counts_ttl_seconds = self.entity_counts_ttl.as_secs(),
            window_capacity = self.window_capacity,
            "Dataset cache configuration loaded"
        );
    }
}

/// `DataSource` decorator caching every dataset.
pub struct CachedDataSource<S> {
    inner: S,
    transactions: Cache<DateWindow, Arc<Vec<TransactionRecord>>>,
    device_revenue: Cache<DateWindow, Arc<Vec<DeviceRevenueRecord>>>,
    daily_sales: Cache<DateWindow, Arc<Vec<DailySalesRecord>>>,
    cash_status: Cache<(), Arc<Vec<CashStatusRecord>>>,
    entity_counts: Cache<(), EntityCounts>,
}

impl<S: DataSource> CachedDataSource<S> {
    pub fn new(inner: S, config: CacheConfig) -> Self {
        Self {
            inner,
            transactions: window_cache(config.window_capacity),
            device_revenue: window_cache(config.window_capacity),
            daily_sales: window_cache(config.window_capacity),
            cash_status: Cache::builder().max_capacity(1).build(),
            entity_counts: Cache::builder()
                .time_to_live(config.entity_counts_ttl)
                .max_capacity(1)
                .build(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached entry; the next fetch of each dataset hits the source.
    pub fn invalidate_all(&self) {
        self.transactions.invalidate_all();
        self.device_revenue.invalidate_all();
        self.daily_sales.invalidate_all();
        self.cash_status.invalidate_all();
        self.entity_counts.invalidate_all();
        debug!("dataset caches invalidated");
    }
}

fn window_cache<V>(capacity: u64) -> Cache<DateWindow, V>
where
    V: Clone + Send + Sync + 'static,
{
    Cache::builder().max_capacity(capacity).build()
}

/// Look up `window`, or fetch and insert on a miss. Failures are not cached.
async fn read_through<T, F>(
    cache: &Cache<DateWindow, Arc<Vec<T>>>,
    dataset: &'static str,
    window: &DateWindow,
    fetch: F,
) -> Result<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
    F: std::future::Future<Output = Result<Vec<T>>>,
{
    if let Some(rows) = cache.get(window) {
        debug!(dataset, window = %window, rows = rows.len(), "dataset cache hit");
        return Ok(rows.as_ref().clone());
    }

    debug!(dataset, window = %window, "dataset cache miss");
    let rows = fetch.await?;
    cache.insert(*window, Arc::new(rows.clone()));
    Ok(rows)
}

#[async_trait]
impl<S: DataSource> DataSource for CachedDataSource<S> {
    async fn fetch_transactions(&self, window: &DateWindow) -> Result<Vec<TransactionRecord>> {
        read_through(&self.transactions, "transactions", window, self.inner.fetch_transactions(window))
            .await
    }

    async fn fetch_cash_status(&self) -> Result<Vec<CashStatusRecord>> {
        if let Some(rows) = self.cash_status.get(&()) {
            debug!(dataset = "cash_status", "dataset cache hit");
            return Ok(rows.as_ref().clone());
        }
        debug!(dataset = "cash_status", "dataset cache miss");
        let rows = self.inner.fetch_cash_status().await?;
        self.cash_status.insert((), Arc::new(rows.clone()));
        Ok(rows)
    }

    async fn fetch_device_revenue(&self, window: &DateWindow) -> Result<Vec<DeviceRevenueRecord>> {
        read_through(
            &self.device_revenue,
            "device_revenue",
            window,
            self.inner.fetch_device_revenue(window),
        )
        .await
    }

    async fn fetch_daily_sales(&self, window: &DateWindow) -> Result<Vec<DailySalesRecord>> {
        read_through(&self.daily_sales, "daily_sales", window, self.inner.fetch_daily_sales(window))
            .await
    }

    async fn fetch_entity_counts(&self) -> Result<EntityCounts> {
        if let Some(counts) = self.entity_counts.get(&()) {
            debug!(dataset = "entity_counts", "dataset cache hit");
            return Ok(counts);
        }

        debug!(dataset = "entity_counts", "dataset cache miss");
        let counts = self.inner.fetch_entity_counts().await?;
        if !counts.is_consistent() {
            warn!(
                total_pdv_units = counts.total_pdv_units,
                pos = counts.pos_terminal_count,
                totem = counts.totem_terminal_count,
                list = counts.list_pos_terminal_count,
                "entity counts are inconsistent: terminals exceed total PDV units"
            );
        }
        self.entity_counts.insert((), counts);
        Ok(counts)
    }
}
