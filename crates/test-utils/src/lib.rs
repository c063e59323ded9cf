//! Shared test utilities for the glm-toe workspace.
//!
//! Provides deterministic synthetic lightning-event generators used across
//! the aggregator, renderer, and service test suites.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod generators;

pub use generators::*;
