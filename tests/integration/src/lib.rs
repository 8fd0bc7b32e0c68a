//! Integration test utilities for the songbook API
//!
//! Runs the real axum application on a local port, backed by the in-memory
//! store, and drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
