//! Record builders with sensible defaults.

use chrono::{NaiveDate, NaiveDateTime};
use recarga_domain::{
    CashStatus, CashStatusRecord, ChannelValues, DailySalesRecord, DeviceRevenueRecord,
    DeviceType, EntityCounts, PaymentMethod, TransactionRecord,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, 0, 0).unwrap()
}

pub fn transaction(day: NaiveDate, method: PaymentMethod, paid_value: f64) -> TransactionRecord {
    TransactionRecord {
        id: format!("tx-{day}-{paid_value}"),
        timestamp: at(day, 10),
        payment_method: method,
        paid_value,
        pdv_id: 1,
        accredited_id: 1,
    }
}

pub fn device_revenue(
    day: NaiveDate,
    hour: u32,
    device_type: DeviceType,
    value: f64,
) -> DeviceRevenueRecord {
    DeviceRevenueRecord {
        timestamp: at(day, hour),
        device_type,
        value,
        pdv_id: 1,
        serial: "SN-0001".into(),
    }
}

/// A daily row whose whole total sits in the `vc` channel.
pub fn daily_sales(day: NaiveDate, pdv: &str, credenciado: &str, total: f64) -> DailySalesRecord {
    DailySalesRecord {
        date: day,
        pdv: pdv.into(),
        credenciado: credenciado.into(),
        channels: ChannelValues { vc: total, ..ChannelValues::default() },
    }
}

pub fn cash_status() -> Vec<CashStatusRecord> {
    vec![
        CashStatusRecord { status: CashStatus::Received, value: 2_000_000.0 },
        CashStatusRecord { status: CashStatus::Pending, value: 500_000.0 },
        CashStatusRecord { status: CashStatus::Overdue, value: 150_000.0 },
    ]
}

pub fn entity_counts() -> EntityCounts {
    EntityCounts {
        total_pdv_units: 540,
        pos_terminal_count: 480,
        totem_terminal_count: 50,
        list_pos_terminal_count: 10,
    }
}
