//! Port interface for report datasets
//!
//! Implementations must return only records whose timestamp or date lies
//! inside the inclusive window. Datasets without a time dimension take no
//! window. Failures surface as `DashboardError::DataSource`; an implementation
//! never substitutes stale or default data for a failed query.

use std::sync::Arc;

use async_trait::async_trait;
use recarga_domain::{
    CashStatusRecord, DailySalesRecord, DateWindow, DeviceRevenueRecord, EntityCounts, Result,
    TransactionRecord,
};

/// Trait for fetching the dashboard datasets
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Paid transactions inside the window
    async fn fetch_transactions(&self, window: &DateWindow) -> Result<Vec<TransactionRecord>>;

    /// Cash movement values per receivable status (no time dimension)
    async fn fetch_cash_status(&self) -> Result<Vec<CashStatusRecord>>;

    /// Device revenue log entries inside the window
    async fn fetch_device_revenue(&self, window: &DateWindow) -> Result<Vec<DeviceRevenueRecord>>;

    /// Daily sales report rows inside the window
    async fn fetch_daily_sales(&self, window: &DateWindow) -> Result<Vec<DailySalesRecord>>;

    /// Live network size snapshot (no time dimension)
    async fn fetch_entity_counts(&self) -> Result<EntityCounts>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Arc<T> {
    async fn fetch_transactions(&self, window: &DateWindow) -> Result<Vec<TransactionRecord>> {
        (**self).fetch_transactions(window).await
    }

    async fn fetch_cash_status(&self) -> Result<Vec<CashStatusRecord>> {
        (**self).fetch_cash_status().await
    }

    async fn fetch_device_revenue(&self, window: &DateWindow) -> Result<Vec<DeviceRevenueRecord>> {
        (**self).fetch_device_revenue(window).await
    }

    async fn fetch_daily_sales(&self, window: &DateWindow) -> Result<Vec<DailySalesRecord>> {
        (**self).fetch_daily_sales(window).await
    }

    async fn fetch_entity_counts(&self) -> Result<EntityCounts> {
        (**self).fetch_entity_counts().await
    }
}
