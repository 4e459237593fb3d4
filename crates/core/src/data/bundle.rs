//! Per-cycle materialization of the datasets a report depends on

use recarga_domain::{
    CashStatusRecord, DailySalesRecord, DashboardError, DatasetKind, DateWindow,
    DeviceRevenueRecord, EntityCounts, Result, TransactionRecord,
};
use futures::try_join;
use tracing::debug;

use super::ports::DataSource;

/// Datasets fetched for one render cycle.
///
/// Each field is `None` until its dataset has been loaded. Reading a dataset
/// that was never requested is a wiring bug and fails with
/// `DashboardError::Internal`, which keeps it distinct from a loaded but
/// empty dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetBundle {
    transactions: Option<Vec<TransactionRecord>>,
    cash_status: Option<Vec<CashStatusRecord>>,
    device_revenue: Option<Vec<DeviceRevenueRecord>>,
    daily_sales: Option<Vec<DailySalesRecord>>,
    entity_counts: Option<EntityCounts>,
}

impl DatasetBundle {
    /// Fetch `kinds` from `source`, one after another.
    ///
    /// Any fetch failure aborts the whole bundle.
    pub async fn fetch<S>(source: &S, kinds: &[DatasetKind], window: &DateWindow) -> Result<Self>
    where
        S: DataSource + ?Sized,
    {
        let mut bundle = Self::default();
        for kind in kinds {
            match kind {
                DatasetKind::Transactions if bundle.transactions.is_none() => {
                    let rows = source.fetch_transactions(window).await?;
                    debug!(dataset = %kind, rows = rows.len(), "dataset loaded");
                    bundle.transactions = Some(rows);
                }
                DatasetKind::CashStatus if bundle.cash_status.is_none() => {
                    let rows = source.fetch_cash_status().await?;
                    debug!(dataset = %kind, rows = rows.len(), "dataset loaded");
                    bundle.cash_status = Some(rows);
                }
                DatasetKind::DeviceRevenue if bundle.device_revenue.is_none() => {
                    let rows = source.fetch_device_revenue(window).await?;
                    debug!(dataset = %kind, rows = rows.len(), "dataset loaded");
                    bundle.device_revenue = Some(rows);
                }
                DatasetKind::DailySales if bundle.daily_sales.is_none() => {
                    let rows = source.fetch_daily_sales(window).await?;
                    debug!(dataset = %kind, rows = rows.len(), "dataset loaded");
                    bundle.daily_sales = Some(rows);
                }
                DatasetKind::EntityCounts if bundle.entity_counts.is_none() => {
                    bundle.entity_counts = Some(source.fetch_entity_counts().await?);
                    debug!(dataset = %kind, "dataset loaded");
                }
                _ => {}
            }
        }
        Ok(bundle)
    }

    /// Fetch every dataset concurrently, as the consolidated export needs.
    ///
    /// The first failure aborts the remaining fetches.
    pub async fn fetch_all<S>(source: &S, window: &DateWindow) -> Result<Self>
    where
        S: DataSource + ?Sized,
    {
        let (transactions, cash_status, device_revenue, daily_sales, entity_counts) = try_join!(
            source.fetch_transactions(window),
            source.fetch_cash_status(),
            source.fetch_device_revenue(window),
            source.fetch_daily_sales(window),
            source.fetch_entity_counts(),
        )?;
        debug!(window = %window, datasets = DatasetKind::ALL.len(), "all datasets loaded");

        Ok(Self {
            transactions: Some(transactions),
            cash_status: Some(cash_status),
            device_revenue: Some(device_revenue),
            daily_sales: Some(daily_sales),
            entity_counts: Some(entity_counts),
        })
    }

    pub fn with_transactions(mut self, rows: Vec<TransactionRecord>) -> Self {
        self.transactions = Some(rows);
        self
    }

    pub fn with_cash_status(mut self, rows: Vec<CashStatusRecord>) -> Self {
        self.cash_status = Some(rows);
        self
    }

    pub fn with_device_revenue(mut self, rows: Vec<DeviceRevenueRecord>) -> Self {
        self.device_revenue = Some(rows);
        self
    }

    pub fn with_daily_sales(mut self, rows: Vec<DailySalesRecord>) -> Self {
        self.daily_sales = Some(rows);
        self
    }

    pub fn with_entity_counts(mut self, counts: EntityCounts) -> Self {
        self.entity_counts = Some(counts);
        self
    }

    pub fn is_loaded(&self, kind: DatasetKind) -> bool {
        match kind {
            DatasetKind::Transactions => self.transactions.is_some(),
            DatasetKind::CashStatus => self.cash_status.is_some(),
            DatasetKind::DeviceRevenue => self.device_revenue.is_some(),
            DatasetKind::DailySales => self.daily_sales.is_some(),
            DatasetKind::EntityCounts => self.entity_counts.is_some(),
        }
    }

    pub fn transactions(&self) -> Result<&[TransactionRecord]> {
        self.transactions.as_deref().ok_or_else(|| not_loaded(DatasetKind::Transactions))
    }

    pub fn cash_status(&self) -> Result<&[CashStatusRecord]> {
        self.cash_status.as_deref().ok_or_else(|| not_loaded(DatasetKind::CashStatus))
    }

    pub fn device_revenue(&self) -> Result<&[DeviceRevenueRecord]> {
        self.device_revenue.as_deref().ok_or_else(|| not_loaded(DatasetKind::DeviceRevenue))
    }

    pub fn daily_sales(&self) -> Result<&[DailySalesRecord]> {
        self.daily_sales.as_deref().ok_or_else(|| not_loaded(DatasetKind::DailySales))
    }

    pub fn entity_counts(&self) -> Result<EntityCounts> {
        self.entity_counts.ok_or_else(|| not_loaded(DatasetKind::EntityCounts))
    }
}

fn not_loaded(kind: DatasetKind) -> DashboardError {
    DashboardError::Internal(format!("dataset {kind} was not loaded for this render cycle"))
}
