//! Top-N rankings over the daily sales report

use std::collections::BTreeMap;

use recarga_domain::DailySalesRecord;
use serde::{Deserialize, Serialize};

/// Column a ranking groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKey {
    Pdv,
    Credenciado,
}

impl RankingKey {
    fn value_of<'a>(&self, record: &'a DailySalesRecord) -> &'a str {
        match self {
            Self::Pdv => &record.pdv,
            Self::Credenciado => &record.credenciado,
        }
    }
}

/// One ranked group and its summed sales total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub key: String,
    pub total: f64,
}

/// The `n` groups with the highest summed total, highest first.
///
/// Equal totals are ordered by group key ascending, so the result does not
/// depend on input order.
pub fn top_n(records: &[DailySalesRecord], key: RankingKey, n: usize) -> Vec<RankingEntry> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(key.value_of(record)).or_insert(0.0) += record.total();
    }

    // BTreeMap iteration is key-ascending and sort_by is stable, which fixes
    // the order of ties.
    let mut ranked: Vec<RankingEntry> = totals
        .into_iter()
        .map(|(group, total)| RankingEntry { key: group.to_string(), total })
        .collect();
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    ranked.truncate(n);
    ranked
}
