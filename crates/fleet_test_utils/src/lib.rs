//! # Fleet Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Determinism test harness
//! - Fixture games and unit classes
//! - Scripted actions for replay and property tests
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod actions;
pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
