//! # Test Infrastructure
//!
//! Shared helpers for the test suite.

/// Builders for engines and a script-driven simulator harness.
pub mod harness;
