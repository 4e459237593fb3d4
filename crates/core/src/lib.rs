//! # Rede Recarga Core
//!
//! Dashboard logic with no infrastructure dependencies.
//!
//! This crate contains:
//! - Ports for the data source, chart renderer and document writer
//! - The aggregations behind every report and export section
//! - The report catalog and its framework-free presentation model
//! - The rotation state machine and the session that drives it
//!
//! ## Architecture Principles
//! - Only depends on `recarga-domain`
//! - No database, raster or PDF code
//! - Every external collaborator sits behind a trait

pub mod aggregation;
pub mod data;
pub mod export;
pub mod format;
pub mod reports;
pub mod rotation;
pub mod session;

pub use aggregation::{HourlyTotal, RankingEntry, RankingKey, RevenueSummary};
pub use data::{DataSource, DatasetBundle};
pub use export::{
    ChartRenderer, DocumentWriter, DocumentWriterFactory, ExportPipeline, ExportSection,
    ExportedDocument, RasterImage,
};
pub use reports::{
    ChartKind, ChartPoint, ChartSpec, Metric, Presentation, PresentationBody, RankingTable,
    ReportCatalog, ReportDescriptor, ReportKind, Rgb,
};
pub use rotation::{Countdown, RotationController, RotationState};
pub use session::{DashboardSession, RenderCycle, RenderedReport};
