//! Utility modules for the dashboard binary

pub mod display;
pub mod logging;
