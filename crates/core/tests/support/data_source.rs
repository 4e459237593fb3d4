//! In-memory `DataSource` that counts fetches and can be told to fail.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use recarga_core::DataSource;
use recarga_domain::{
    CashStatusRecord, DailySalesRecord, DashboardError, DateWindow, DeviceRevenueRecord,
    EntityCounts, Result as DomainResult, TransactionRecord,
};

#[derive(Default)]
struct Counters {
    transactions: AtomicUsize,
    cash_status: AtomicUsize,
    device_revenue: AtomicUsize,
    daily_sales: AtomicUsize,
    entity_counts: AtomicUsize,
}

/// Fixed datasets, filtered by window the way a real source would.
#[derive(Clone, Default)]
pub struct MockDataSource {
    transactions: Vec<TransactionRecord>,
    cash_status: Vec<CashStatusRecord>,
    device_revenue: Vec<DeviceRevenueRecord>,
    daily_sales: Vec<DailySalesRecord>,
    entity_counts: EntityCounts,
    failure: Option<String>,
    counters: Arc<Counters>,
}

impl MockDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(mut self, rows: Vec<TransactionRecord>) -> Self {
        self.transactions = rows;
        self
    }

    pub fn with_cash_status(mut self, rows: Vec<CashStatusRecord>) -> Self {
        self.cash_status = rows;
        self
    }

    pub fn with_device_revenue(mut self, rows: Vec<DeviceRevenueRecord>) -> Self {
        self.device_revenue = rows;
        self
    }

    pub fn with_daily_sales(mut self, rows: Vec<DailySalesRecord>) -> Self {
        self.daily_sales = rows;
        self
    }

    pub fn with_entity_counts(mut self, counts: EntityCounts) -> Self {
        self.entity_counts = counts;
        self
    }

    /// Every fetch fails with `DashboardError::DataSource(message)`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Total number of fetch calls across every dataset.
    pub fn total_fetches(&self) -> usize {
        self.transaction_fetches()
            + self.counters.cash_status.load(Ordering::SeqCst)
            + self.device_revenue_fetches()
            + self.counters.daily_sales.load(Ordering::SeqCst)
            + self.counters.entity_counts.load(Ordering::SeqCst)
    }

    pub fn transaction_fetches(&self) -> usize {
        self.counters.transactions.load(Ordering::SeqCst)
    }

    pub fn device_revenue_fetches(&self) -> usize {
        self.counters.device_revenue.load(Ordering::SeqCst)
    }

    fn check(&self, counter: &AtomicUsize) -> DomainResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(DashboardError::DataSource(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_transactions(&self, window: &DateWindow) -> DomainResult<Vec<TransactionRecord>> {
        self.check(&self.counters.transactions)?;
        Ok(self
            .transactions
            .iter()
            .filter(|tx| window.contains_timestamp(tx.timestamp))
            .cloned()
            .collect())
    }

    async fn fetch_cash_status(&self) -> DomainResult<Vec<CashStatusRecord>> {
        self.check(&self.counters.cash_status)?;
        Ok(self.cash_status.clone())
    }

    async fn fetch_device_revenue(
        &self,
        window: &DateWindow,
    ) -> DomainResult<Vec<DeviceRevenueRecord>> {
        self.check(&self.counters.device_revenue)?;
        Ok(self
            .device_revenue
            .iter()
            .filter(|record| window.contains_timestamp(record.timestamp))
            .cloned()
            .collect())
    }

    async fn fetch_daily_sales(&self, window: &DateWindow) -> DomainResult<Vec<DailySalesRecord>> {
        self.check(&self.counters.daily_sales)?;
        Ok(self.daily_sales.iter().filter(|row| window.contains_date(row.date)).cloned().collect())
    }

    async fn fetch_entity_counts(&self) -> DomainResult<EntityCounts> {
        self.check(&self.counters.entity_counts)?;
        Ok(self.entity_counts)
    }
}
