//! # Rede Recarga Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The PostgreSQL data source over the reporting views
//! - The seeded sample data source used when no database is configured
//! - The read-through dataset cache
//! - Chart rasterization and the PDF document writer
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements traits defined in `recarga-core`
//! - Depends on `recarga-domain` and `recarga-core`
//! - Contains all "impure" code (I/O, network, encoders)

pub mod cache;
pub mod config;
pub mod database;
pub mod errors;
pub mod rendering;
pub mod sample;

// Re-export commonly used items
pub use cache::{CacheConfig, CachedDataSource};
pub use database::{PgConnector, PostgresDataSource, ScopedConnection};
pub use errors::InfraError;
pub use rendering::{encode_png, PdfDocumentWriter, PdfWriterFactory, RasterChartRenderer};
pub use sample::SampleDataSource;
