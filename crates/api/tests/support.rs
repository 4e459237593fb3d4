#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use recarga_app::AppContext;
use recarga_core::DataSource;
use recarga_domain::{
    CashStatusRecord, DailySalesRecord, DashboardConfig, DashboardError, DataSourceMode,
    DateWindow, DeviceRevenueRecord, EntityCounts, Result, SampleConfig, TransactionRecord,
};
use recarga_infra::SampleDataSource;
use tempfile::TempDir;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Context over seeded sample data with exports going to a temp dir.
pub struct TestContext {
    pub ctx: AppContext,
    /// Keep temporary directory alive for the lifetime of the context.
    pub export_dir: TempDir,
}

fn sample_config(export_dir: &TempDir) -> DashboardConfig {
    DashboardConfig {
        data_source: DataSourceMode::Sample,
        export_dir: export_dir.path().join("exports"),
        default_window: Some(
            DateWindow::new(date(2025, 8, 1), date(2025, 8, 31)).expect("valid window"),
        ),
        sample: SampleConfig { seed: 11, end_date: Some(date(2025, 8, 31)) },
        ..DashboardConfig::default()
    }
}

pub fn sample_context() -> TestContext {
    let export_dir = TempDir::new().expect("failed to create export directory");
    let config = sample_config(&export_dir);
    let ctx = AppContext::new(config, date(2025, 8, 31)).expect("sample context should build");
    TestContext { ctx, export_dir }
}

/// Sample data that can be switched to fail like an unreachable database.
pub struct FlakySource {
    inner: SampleDataSource,
    failing: AtomicBool,
}

impl FlakySource {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DashboardError::DataSource("error connecting to server".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DataSource for FlakySource {
    async fn fetch_transactions(&self, window: &DateWindow) -> Result<Vec<TransactionRecord>> {
        self.check()?;
        self.inner.fetch_transactions(window).await
    }

    async fn fetch_cash_status(&self) -> Result<Vec<CashStatusRecord>> {
        self.check()?;
        self.inner.fetch_cash_status().await
    }

    async fn fetch_device_revenue(&self, window: &DateWindow) -> Result<Vec<DeviceRevenueRecord>> {
        self.check()?;
        self.inner.fetch_device_revenue(window).await
    }

    async fn fetch_daily_sales(&self, window: &DateWindow) -> Result<Vec<DailySalesRecord>> {
        self.check()?;
        self.inner.fetch_daily_sales(window).await
    }

    async fn fetch_entity_counts(&self) -> Result<EntityCounts> {
        self.check()?;
        self.inner.fetch_entity_counts().await
    }
}

/// Context whose backend failures the test controls.
pub fn flaky_context() -> (TestContext, Arc<FlakySource>) {
    let export_dir = TempDir::new().expect("failed to create export directory");
    let config = sample_config(&export_dir);
    let today = date(2025, 8, 31);
    let source = Arc::new(FlakySource {
        inner: SampleDataSource::generate(&config.sample, today),
        failing: AtomicBool::new(false),
    });
    let ctx = AppContext::with_source(config, source.clone(), today);
    (TestContext { ctx, export_dir }, source)
}
