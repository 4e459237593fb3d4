//! Framework-free description of what a report shows
//!
//! A presentation layer turns these values into widgets, terminal text or
//! document sections; nothing here knows how.

use serde::{Deserialize, Serialize};

use crate::aggregation::RankingEntry;

/// A rendered report: a heading plus one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub title: String,
    pub body: PresentationBody,
}

impl Presentation {
    pub fn is_empty(&self) -> bool {
        matches!(self.body, PresentationBody::Empty { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresentationBody {
    Metrics { metrics: Vec<Metric> },
    Chart { chart: ChartSpec },
    Tables { tables: Vec<RankingTable> },
    /// No data for the selected period.
    Empty { message: String },
}

/// A single KPI tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Donut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Self = Self(46, 160, 67);
    pub const ORANGE: Self = Self(245, 147, 34);
    pub const RED: Self = Self(214, 39, 40);
}

/// One labelled value of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    /// Fixed colour; the renderer's palette applies when absent.
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingTable {
    pub title: String,
    pub key_header: String,
    pub value_header: String,
    pub rows: Vec<RankingEntry>,
}
