//! # Rede Recarga Dashboard App
//!
//! Terminal kiosk for the rotating BI dashboard.
//!
//! This crate contains:
//! - Operator commands (navigation, window, export, snapshot)
//! - Application context (dependency injection and kiosk state)
//! - Logging setup and text rendering
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - `main.rs` drives the rotation timer and reads commands from stdin

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::{execute, Command, Reply};
pub use context::*;
