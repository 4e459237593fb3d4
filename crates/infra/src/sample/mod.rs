//! Seeded, in-process sample datasets
//!
//! Generates the demo network's history once at construction: ten
//! transactions per day, 500 device revenue entries and one daily sales row
//! per day over the eight calendar months ending at the configured date.
//! The same seed always produces the same datasets, and every fetch honours
//! the window filter like a real source.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use rand::prelude::*;
use rand::rngs::StdRng;
use recarga_core::DataSource;
use recarga_domain::{
    CashStatus, CashStatusRecord, ChannelValues, DailySalesRecord, DateWindow,
    DeviceRevenueRecord, DeviceType, EntityCounts, PaymentMethod, Result, SampleConfig,
    TransactionRecord,
};
use tracing::{debug, info};

const TRANSACTIONS_PER_DAY: usize = 10;
const DEVICE_RECORDS: usize = 500;
const HISTORY_MONTHS: u32 = 8;

const PAYMENT_WEIGHTS: [(PaymentMethod, u32); 5] = [
    (PaymentMethod::Pix, 30),
    (PaymentMethod::Debit, 25),
    (PaymentMethod::Money, 20),
    (PaymentMethod::Credit, 15),
    (PaymentMethod::List, 10),
];

const DEVICE_WEIGHTS: [(DeviceType, u32); 4] = [
    (DeviceType::Pos, 60),
    (DeviceType::Totem, 15),
    (DeviceType::App, 10),
    (DeviceType::WhatsApp, 15),
];

const SAMPLE_ENTITY_COUNTS: EntityCounts = EntityCounts {
    total_pdv_units: 540,
    pos_terminal_count: 480,
    totem_terminal_count: 50,
    list_pos_terminal_count: 10,
};

#[derive(Debug)]
struct SampleDataset {
    history: DateWindow,
    transactions: Vec<TransactionRecord>,
    device_revenue: Vec<DeviceRevenueRecord>,
    daily_sales: Vec<DailySalesRecord>,
}

/// `DataSource` serving generated demo data.
#[derive(Debug, Clone)]
pub struct SampleDataSource {
    dataset: Arc<SampleDataset>,
}

impl SampleDataSource {
    /// Generate history ending at `config.end_date`, or at `today` when unset.
    pub fn generate(config: &SampleConfig, today: NaiveDate) -> Self {
        let end = config.end_date.unwrap_or(today);
        let history = history_window(end);
        let mut rng = StdRng::seed_from_u64(config.seed);

        let days: Vec<NaiveDate> = history.start().iter_days().take_while(|d| *d <= end).collect();
        let transactions = generate_transactions(&mut rng, &days);
        let device_revenue = generate_device_revenue(&mut rng, &days);
        let daily_sales = generate_daily_sales(&mut rng, &days);

        info!(
            seed = config.seed,
            history = %history,
            transactions = transactions.len(),
            device_revenue = device_revenue.len(),
            daily_sales = daily_sales.len(),
            "sample datasets generated"
        );

        Self {
            dataset: Arc::new(SampleDataset { history, transactions, device_revenue, daily_sales }),
        }
    }

    /// Full span of generated history.
    pub fn history(&self) -> DateWindow {
        self.dataset.history
    }
}

#[async_trait]
impl DataSource for SampleDataSource {
    async fn fetch_transactions(&self, window: &DateWindow) -> Result<Vec<TransactionRecord>> {
        let rows: Vec<_> = self
            .dataset
            .transactions
            .iter()
            .filter(|tx| window.contains_timestamp(tx.timestamp))
            .cloned()
            .collect();
        debug!(window = %window, rows = rows.len(), "sample transactions served");
        Ok(rows)
    }

    async fn fetch_cash_status(&self) -> Result<Vec<CashStatusRecord>> {
        Ok(vec![
            CashStatusRecord { status: CashStatus::Received, value: 2_000_000.0 },
            CashStatusRecord { status: CashStatus::Pending, value: 500_000.0 },
            CashStatusRecord { status: CashStatus::Overdue, value: 150_000.0 },
        ])
    }

    async fn fetch_device_revenue(&self, window: &DateWindow) -> Result<Vec<DeviceRevenueRecord>> {
        let rows: Vec<_> = self
            .dataset
            .device_revenue
            .iter()
            .filter(|record| window.contains_timestamp(record.timestamp))
            .cloned()
            .collect();
        debug!(window = %window, rows = rows.len(), "sample device revenue served");
        Ok(rows)
    }

    async fn fetch_daily_sales(&self, window: &DateWindow) -> Result<Vec<DailySalesRecord>> {
        Ok(self
            .dataset
            .daily_sales
            .iter()
            .filter(|row| window.contains_date(row.date))
            .cloned()
            .collect())
    }

    async fn fetch_entity_counts(&self) -> Result<EntityCounts> {
        Ok(SAMPLE_ENTITY_COUNTS)
    }
}

/// First day of the month `HISTORY_MONTHS - 1` months before `end`.
fn history_window(end: NaiveDate) -> DateWindow {
    let start = end
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(HISTORY_MONTHS - 1)))
        .unwrap_or(end);
    DateWindow::new(start, end).unwrap_or_else(|_| DateWindow::single_day(end))
}

fn pick<T: Copy>(rng: &mut StdRng, choices: &[(T, u32)]) -> T {
    choices
        .choose_weighted(rng, |(_, weight)| *weight)
        .map_or(choices[0].0, |(item, _)| *item)
}

fn amount(rng: &mut StdRng, low: f64, high: f64) -> f64 {
    (rng.gen_range(low..high) * 100.0).round() / 100.0
}

fn business_hours(rng: &mut StdRng, day: NaiveDate) -> NaiveDateTime {
    let seconds = rng.gen_range(6 * 3600..23 * 3600);
    day.and_time(chrono::NaiveTime::MIN) + Duration::seconds(seconds)
}

fn generate_transactions(rng: &mut StdRng, days: &[NaiveDate]) -> Vec<TransactionRecord> {
    let total = days.len() * TRANSACTIONS_PER_DAY;

    let mut rows: Vec<TransactionRecord> = (0..total)
        .filter_map(|i| {
            let day = *days.choose(rng)?;
            Some(TransactionRecord {
                id: format!("trans_{i}"),
                timestamp: business_hours(rng, day),
                payment_method: pick(rng, &PAYMENT_WEIGHTS),
                paid_value: amount(rng, 10.0, 150.0),
                pdv_id: rng.gen_range(1..=20),
                accredited_id: rng.gen_range(1..=5),
            })
        })
        .collect();
    rows.sort_by_key(|tx| tx.timestamp);
    rows
}

fn generate_device_revenue(rng: &mut StdRng, days: &[NaiveDate]) -> Vec<DeviceRevenueRecord> {
    let mut rows: Vec<DeviceRevenueRecord> = (0..DEVICE_RECORDS)
        .filter_map(|_| {
            let day = *days.choose(rng)?;
            Some(DeviceRevenueRecord {
                timestamp: business_hours(rng, day),
                device_type: pick(rng, &DEVICE_WEIGHTS),
                value: amount(rng, 15.0, 120.0),
                pdv_id: rng.gen_range(1..=20),
                serial: format!("SERIAL_{}", rng.gen_range(100..200)),
            })
        })
        .collect();
    rows.sort_by_key(|record| record.timestamp);
    rows
}

fn generate_daily_sales(rng: &mut StdRng, days: &[NaiveDate]) -> Vec<DailySalesRecord> {
    days.iter()
        .map(|day| DailySalesRecord {
            date: *day,
            pdv: format!("PDV {}", rng.gen_range(1..=20)),
            credenciado: format!("Credenciado {}", rng.gen_range(1..=5)),
            channels: ChannelValues {
                vc: amount(rng, 1000.0, 5000.0),
                ve: amount(rng, 1000.0, 5000.0),
                vt: amount(rng, 1000.0, 5000.0),
                celular: amount(rng, 500.0, 2000.0),
                credito: amount(rng, 200.0, 1000.0),
                lista: amount(rng, 3000.0, 8000.0),
            },
        })
        .collect()
}
