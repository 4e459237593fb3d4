//! Domain types and models

pub mod counts;
pub mod records;
pub mod window;

use serde::{Deserialize, Serialize};

pub use counts::EntityCounts;
pub use records::{
    non_negative, CashStatus, CashStatusRecord, ChannelValues, DailySalesRecord,
    DeviceRevenueRecord, DeviceType, PaymentMethod, TransactionRecord,
};
pub use window::DateWindow;

/// The datasets a report or export section can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Transactions,
    CashStatus,
    DeviceRevenue,
    DailySales,
    EntityCounts,
}

impl DatasetKind {
    pub const ALL: [Self; 5] = [
        Self::Transactions,
        Self::CashStatus,
        Self::DeviceRevenue,
        Self::DailySales,
        Self::EntityCounts,
    ];

    /// Whether the dataset has a time dimension filtered by [`DateWindow`].
    pub fn is_windowed(&self) -> bool {
        matches!(self, Self::Transactions | Self::DeviceRevenue | Self::DailySales)
    }

    /// Stable name used in logs and cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::CashStatus => "cash_status",
            Self::DeviceRevenue => "device_revenue",
            Self::DailySales => "daily_sales",
            Self::EntityCounts => "entity_counts",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
