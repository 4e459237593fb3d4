//! Shared test helpers for `recarga-core` integration tests.
//!
//! In-memory fakes for every core port plus record fixtures, so the tests
//! can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod data_source;
pub mod fixtures;
pub mod rendering;
