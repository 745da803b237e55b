//! # Workflows Module
//!
//! This module provides the high-level entry points that orchestrate a
//! complete scaffold tree generation run.
//!
//! ## Overview
//!
//! Workflows are the top-level API of the library. They tie molecule
//! input, scaffold construction, ring pruning, prioritization, tree
//! assembly and persistence together behind a single call, handling
//! progress reporting and cancellation along the way.
//!
//! ## Architecture
//!
//! - **Generation Workflow** ([`generate`]) - Per-molecule pruning loop,
//!   canonical-SMILES deduplication, synthetic root and level assignment,
//!   derived property evaluation and final persistence.

pub mod generate;
