//! Configuration loading and management
//!
//! This module provides utilities for loading the dashboard settings and the
//! PostgreSQL connection parameters from environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load, load_database_config, load_from_env, load_from_file, probe_config_paths,
};
