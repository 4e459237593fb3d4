//! Data access boundary
//!
//! The [`DataSource`] port is the only way report datasets enter the core.
//! [`DatasetBundle`] materializes exactly the datasets a report or the export
//! needs for one render cycle.

pub mod bundle;
pub mod ports;

pub use bundle::DatasetBundle;
pub use ports::DataSource;
