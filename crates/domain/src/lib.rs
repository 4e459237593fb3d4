//! # Rede Recarga BI Domain
//!
//! Business domain types for the rotating BI dashboard.
//!
//! This crate contains:
//! - Dataset records (transactions, cash status, device revenue, daily sales)
//! - The inclusive `DateWindow` and the live `EntityCounts` snapshot
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Dashboard-wide constants
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
