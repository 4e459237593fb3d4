//! Aggregations behind every report and export section
//!
//! Pure functions over datasets that the data access layer has already
//! filtered to the selected window. Nothing here filters by date again.
//!
//! An empty input is a valid state: each function reports it explicitly
//! (`None` or an empty collection) rather than dividing by zero.

pub mod ranking;

use std::collections::BTreeMap;

use chrono::Timelike;
use recarga_domain::{
    CashStatus, CashStatusRecord, DeviceRevenueRecord, DeviceType, PaymentMethod,
    TransactionRecord,
};
use serde::{Deserialize, Serialize};

pub use ranking::{top_n, RankingEntry, RankingKey};

/// Revenue KPIs over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_paid: f64,
    pub average_ticket: f64,
    pub transaction_count: usize,
}

/// Total paid and mean ticket; `None` when there are no transactions.
pub fn monthly_revenue(transactions: &[TransactionRecord]) -> Option<RevenueSummary> {
    if transactions.is_empty() {
        return None;
    }
    let total_paid: f64 = transactions.iter().map(|tx| tx.paid_value).sum();
    let transaction_count = transactions.len();
    Some(RevenueSummary {
        total_paid,
        average_ticket: total_paid / transaction_count as f64,
        transaction_count,
    })
}

/// Sum paid per payment method. Methods absent from the data are absent
/// from the result.
pub fn revenue_by_payment_method(transactions: &[TransactionRecord]) -> BTreeMap<PaymentMethod, f64> {
    let mut totals = BTreeMap::new();
    for tx in transactions {
        *totals.entry(tx.payment_method).or_insert(0.0) += tx.paid_value;
    }
    totals
}

/// Cash values grouped by status.
///
/// The source already aggregates per status; repeated statuses are summed.
pub fn cash_status_breakdown(records: &[CashStatusRecord]) -> BTreeMap<CashStatus, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.status).or_insert(0.0) += record.value;
    }
    totals
}

/// Sum of device revenue per channel.
pub fn revenue_by_channel(records: &[DeviceRevenueRecord]) -> BTreeMap<DeviceType, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.device_type).or_insert(0.0) += record.value;
    }
    totals
}

/// Sales summed into one bucket per hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyTotal {
    /// 0-23, taken from the naive local timestamp.
    pub hour: u32,
    pub total: f64,
}

/// Device revenue bucketed by hour of day.
///
/// All 24 hours are present, zero-filled, so chart axes stay stable. An
/// empty input yields an empty vector.
pub fn hourly_sales(records: &[DeviceRevenueRecord]) -> Vec<HourlyTotal> {
    if records.is_empty() {
        return Vec::new();
    }
    let mut buckets = [0.0_f64; 24];
    for record in records {
        buckets[record.timestamp.hour() as usize] += record.value;
    }
    buckets
        .iter()
        .enumerate()
        .map(|(hour, total)| HourlyTotal { hour: hour as u32, total: *total })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn tx(value: f64, method: PaymentMethod) -> TransactionRecord {
        TransactionRecord {
            id: format!("trans_{value}"),
            timestamp: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(10, 0, 0).unwrap(),
            payment_method: method,
            paid_value: value,
            pdv_id: 1,
            accredited_id: 1,
        }
    }

    fn device(hour: u32, device_type: DeviceType, value: f64) -> DeviceRevenueRecord {
        DeviceRevenueRecord {
            timestamp: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(hour, 30, 0).unwrap(),
            device_type,
            value,
            pdv_id: 3,
            serial: "SERIAL_150".into(),
        }
    }

    #[test]
    fn test_revenue_figures_for_reference_transactions() {
        let transactions = vec![
            tx(100.0, PaymentMethod::Pix),
            tx(50.0, PaymentMethod::Pix),
            tx(20.0, PaymentMethod::Credit),
        ];

        let by_method = revenue_by_payment_method(&transactions);
        assert_eq!(by_method.len(), 2);
        assert_eq!(by_method[&PaymentMethod::Pix], 150.0);
        assert_eq!(by_method[&PaymentMethod::Credit], 20.0);

        let summary = monthly_revenue(&transactions).unwrap();
        assert_eq!(summary.total_paid, 170.0);
        assert!((summary.average_ticket - 56.666_666).abs() < 1e-5);
        assert_eq!(summary.transaction_count, 3);
    }

    #[test]
    fn test_empty_inputs_report_empty_state() {
        assert!(monthly_revenue(&[]).is_none());
        assert!(revenue_by_payment_method(&[]).is_empty());
        assert!(cash_status_breakdown(&[]).is_empty());
        assert!(revenue_by_channel(&[]).is_empty());
        assert!(hourly_sales(&[]).is_empty());
    }

    #[test]
    fn test_cash_status_groups_repeated_status() {
        let records = vec![
            CashStatusRecord { status: CashStatus::Pending, value: 10.0 },
            CashStatusRecord { status: CashStatus::Received, value: 5.0 },
            CashStatusRecord { status: CashStatus::Pending, value: 2.5 },
        ];
        let breakdown = cash_status_breakdown(&records);
        assert_eq!(breakdown[&CashStatus::Pending], 12.5);
        assert_eq!(breakdown[&CashStatus::Received], 5.0);
        assert!(!breakdown.contains_key(&CashStatus::Overdue));
    }

    #[test]
    fn test_revenue_by_channel() {
        let records = vec![
            device(9, DeviceType::Pos, 10.0),
            device(9, DeviceType::Totem, 4.0),
            device(18, DeviceType::Pos, 6.0),
        ];
        let by_channel = revenue_by_channel(&records);
        assert_eq!(by_channel[&DeviceType::Pos], 16.0);
        assert_eq!(by_channel[&DeviceType::Totem], 4.0);
        assert!(!by_channel.contains_key(&DeviceType::App));
    }

    #[test]
    fn test_hourly_sales_zero_fills_all_hours() {
        let records = vec![
            device(0, DeviceType::App, 1.0),
            device(9, DeviceType::Pos, 10.0),
            device(9, DeviceType::WhatsApp, 5.0),
            device(23, DeviceType::Pos, 2.0),
        ];
        let hourly = hourly_sales(&records);
        assert_eq!(hourly.len(), 24);
        assert_eq!(hourly[0], HourlyTotal { hour: 0, total: 1.0 });
        assert_eq!(hourly[9].total, 15.0);
        assert_eq!(hourly[12].total, 0.0);
        assert_eq!(hourly[23].total, 2.0);
        assert!(hourly.iter().enumerate().all(|(i, bucket)| bucket.hour == i as u32));
    }
}
