//! Consolidated report export
//!
//! [`ExportPipeline`] walks the fixed section order, building every figure
//! through the same section builders as the interactive reports. Rasterizing
//! and document serialization sit behind [`ChartRenderer`] and
//! [`DocumentWriter`], implemented in the infrastructure layer.

pub mod pipeline;
pub mod ports;

pub use pipeline::{ExportPipeline, ExportSection, ExportedDocument};
pub use ports::{ChartRenderer, DocumentWriter, DocumentWriterFactory, RasterImage};
