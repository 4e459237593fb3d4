//! Tabular records served by the data source
//!
//! Monetary values are `f64` reais. Adapters validate non-negativity with
//! [`non_negative`] before building a record.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{impl_record_enum_conversions, DashboardError, Result};

/* -------------------------------------------------------------------------- */
/* Transactions */
/* -------------------------------------------------------------------------- */

/// How a recharge was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Pix,
    Debit,
    Money,
    Credit,
    List,
}

impl_record_enum_conversions!(PaymentMethod {
    Pix => "PIX",
    Debit => "DEBIT",
    Money => "MONEY",
    Credit => "CREDIT",
    List => "LIST",
});

impl PaymentMethod {
    pub const ALL: [Self; 5] = [Self::Pix, Self::Debit, Self::Money, Self::Credit, Self::List];
}

/// One paid recharge transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub timestamp: NaiveDateTime,
    pub payment_method: PaymentMethod,
    pub paid_value: f64,
    pub pdv_id: i64,
    pub accredited_id: i64,
}

/* -------------------------------------------------------------------------- */
/* Cash status */
/* -------------------------------------------------------------------------- */

/// Receivable status of cash transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CashStatus {
    Received,
    Pending,
    Overdue,
}

impl_record_enum_conversions!(CashStatus {
    Received => "Received",
    Pending => "Pending",
    Overdue => "Overdue",
});

impl CashStatus {
    pub const ALL: [Self; 3] = [Self::Received, Self::Pending, Self::Overdue];

    /// Label shown to dashboard viewers.
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Received => "Recebido",
            Self::Pending => "Pendente",
            Self::Overdue => "Vencido",
        }
    }
}

/// Pre-aggregated cash movement value for one status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashStatusRecord {
    pub status: CashStatus,
    pub value: f64,
}

/* -------------------------------------------------------------------------- */
/* Device revenue */
/* -------------------------------------------------------------------------- */

/// Channel a sale originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "POS")]
    Pos,
    Totem,
    App,
    WhatsApp,
}

impl_record_enum_conversions!(DeviceType {
    Pos => "POS",
    Totem => "Totem",
    App => "App",
    WhatsApp => "WhatsApp",
});

impl DeviceType {
    pub const ALL: [Self; 4] = [Self::Pos, Self::Totem, Self::App, Self::WhatsApp];
}

/// Revenue logged by a single device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRevenueRecord {
    pub timestamp: NaiveDateTime,
    pub device_type: DeviceType,
    pub value: f64,
    pub pdv_id: i64,
    pub serial: String,
}

/* -------------------------------------------------------------------------- */
/* Daily sales */
/* -------------------------------------------------------------------------- */

/// Per-channel sale values of a daily sales row.
///
/// Field names follow the source report columns: `vc`, `ve` and `vt` are the
/// three transit-card products, followed by mobile, credit and list sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelValues {
    pub vc: f64,
    pub ve: f64,
    pub vt: f64,
    pub celular: f64,
    pub credito: f64,
    pub lista: f64,
}

impl ChannelValues {
    /// Sum of all six channels.
    pub fn total(&self) -> f64 {
        self.vc + self.ve + self.vt + self.celular + self.credito + self.lista
    }
}

/// One row of the daily sales report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySalesRecord {
    pub date: NaiveDate,
    pub pdv: String,
    /// Accredited party credited with the sale.
    pub credenciado: String,
    pub channels: ChannelValues,
}

impl DailySalesRecord {
    /// Derived total: the sum of the channel values.
    pub fn total(&self) -> f64 {
        self.channels.total()
    }
}

/* -------------------------------------------------------------------------- */
/* Validation helpers */
/* -------------------------------------------------------------------------- */

/// Reject negative or non-finite monetary values coming from a source.
///
/// # Errors
/// Returns `DashboardError::DataSource` naming the offending field.
pub fn non_negative(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DashboardError::DataSource(format!("{field} must be a non-negative amount, got {value}")))
    }
}
