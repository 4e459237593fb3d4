//! Report catalog and presentation model

pub mod catalog;
pub mod presentation;
pub mod sections;

pub use catalog::{ReportCatalog, ReportDescriptor, ReportKind};
pub use presentation::{
    ChartKind, ChartPoint, ChartSpec, Metric, Presentation, PresentationBody, RankingTable, Rgb,
};
