//! Common types and utilities for the mirror reflection engine.
//!
//! This crate provides the leaf pieces shared by the other mirror crates:
//! - String interning for declaration names (`Atom`, `ShardedInterner`)
//! - Centralized recursion limits
//! - Tracing subscriber setup

// String interning for class, member, and type-variable names
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Centralized limits and thresholds
pub mod limits;

// Opt-in tracing subscriber configuration
pub mod tracing_config;
pub use tracing_config::{LogFormat, LogPreset, QUERY_TARGET, TracingConfig, init_tracing};
