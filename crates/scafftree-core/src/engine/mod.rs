//! # Engine Module
//!
//! This module implements the stateful machinery behind scaffold tree
//! generation: run configuration, the tree under construction, progress
//! and cancellation plumbing, per-scaffold property calculators, and the
//! persistence boundary.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Run options and the builder used to assemble them
//! - **Tree Assembly** ([`tree`]) - Deduplicated scaffold hierarchy and the synthetic root
//! - **Progress Monitoring** ([`progress`]) - Snapshot reporting and cooperative cancellation
//! - **Property Calculators** ([`calculators`]) - Derived numeric properties per scaffold
//! - **Persistence** ([`store`]) - Backend trait with retryable/fatal error classification
//! - **Error Handling** ([`error`]) - Engine-specific error types and error propagation

pub mod calculators;
pub mod config;
pub mod error;
pub mod progress;
pub mod store;
pub mod tree;
