//! Chart rasterization and PDF document output

pub mod chart;
pub mod pdf;

pub use chart::{encode_png, RasterChartRenderer};
pub use pdf::{PdfDocumentWriter, PdfWriterFactory};
