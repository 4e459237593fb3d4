#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use recarga_core::DataSource;
use recarga_domain::{
    CashStatus, CashStatusRecord, DailySalesRecord, DashboardError, DateWindow,
    DeviceRevenueRecord, DeviceType, EntityCounts, PaymentMethod, Result, TransactionRecord,
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, 0, 0).expect("valid test time")
}

pub fn window(start: NaiveDate, end: NaiveDate) -> DateWindow {
    DateWindow::new(start, end).expect("valid test window")
}

/// In-memory source counting every fetch, with a switch to fail on demand.
pub struct CountingSource {
    transactions: Vec<TransactionRecord>,
    counts: Mutex<EntityCounts>,
    failing: AtomicBool,
    transaction_fetches: AtomicUsize,
    cash_fetches: AtomicUsize,
    device_fetches: AtomicUsize,
    daily_fetches: AtomicUsize,
    count_fetches: AtomicUsize,
}

impl CountingSource {
    pub fn new() -> Self {
        let day = date(2025, 8, 4);
        Self {
            transactions: vec![
                TransactionRecord {
                    id: "t-1".into(),
                    timestamp: at(day, 9),
                    payment_method: PaymentMethod::Pix,
                    paid_value: 100.0,
                    pdv_id: 1,
                    accredited_id: 10,
                },
                TransactionRecord {
                    id: "t-2".into(),
                    timestamp: at(date(2025, 8, 20), 14),
                    payment_method: PaymentMethod::Money,
                    paid_value: 40.0,
                    pdv_id: 2,
                    accredited_id: 11,
                },
            ],
            counts: Mutex::new(EntityCounts {
                total_pdv_units: 10,
                pos_terminal_count: 5,
                totem_terminal_count: 2,
                list_pos_terminal_count: 1,
            }),
            failing: AtomicBool::new(false),
            transaction_fetches: AtomicUsize::new(0),
            cash_fetches: AtomicUsize::new(0),
            device_fetches: AtomicUsize::new(0),
            daily_fetches: AtomicUsize::new(0),
            count_fetches: AtomicUsize::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_counts(&self, counts: EntityCounts) {
        *self.counts.lock().expect("counts lock") = counts;
    }

    pub fn transaction_fetches(&self) -> usize {
        self.transaction_fetches.load(Ordering::SeqCst)
    }

    pub fn cash_fetches(&self) -> usize {
        self.cash_fetches.load(Ordering::SeqCst)
    }

    pub fn device_fetches(&self) -> usize {
        self.device_fetches.load(Ordering::SeqCst)
    }

    pub fn daily_fetches(&self) -> usize {
        self.daily_fetches.load(Ordering::SeqCst)
    }

    pub fn count_fetches(&self) -> usize {
        self.count_fetches.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DashboardError::DataSource("connection refused".into()));
        }
        Ok(())
    }
}

impl Default for CountingSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for CountingSource {
    async fn fetch_transactions(&self, window: &DateWindow) -> Result<Vec<TransactionRecord>> {
        self.transaction_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .transactions
            .iter()
            .filter(|row| window.contains_timestamp(row.timestamp))
            .cloned()
            .collect())
    }

    async fn fetch_cash_status(&self) -> Result<Vec<CashStatusRecord>> {
        self.cash_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(vec![
            CashStatusRecord { status: CashStatus::Received, value: 900.0 },
            CashStatusRecord { status: CashStatus::Pending, value: 100.0 },
        ])
    }

    async fn fetch_device_revenue(&self, window: &DateWindow) -> Result<Vec<DeviceRevenueRecord>> {
        self.device_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let row = DeviceRevenueRecord {
            timestamp: at(date(2025, 8, 4), 10),
            device_type: DeviceType::Totem,
            value: 25.0,
            pdv_id: 1,
            serial: "TT-01".into(),
        };
        Ok(std::iter::once(row).filter(|r| window.contains_timestamp(r.timestamp)).collect())
    }

    async fn fetch_daily_sales(&self, _window: &DateWindow) -> Result<Vec<DailySalesRecord>> {
        self.daily_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(Vec::new())
    }

    async fn fetch_entity_counts(&self) -> Result<EntityCounts> {
        self.count_fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(*self.counts.lock().expect("counts lock"))
    }
}
