//! # ScaffTree Core Library
//!
//! A library for building scaffold trees: hierarchical classifications of
//! molecule collections obtained by iteratively pruning rings from Murcko
//! scaffolds.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   (`MolecularGraph`), SMILES parsing and canonical writing, ring and
//!   aromaticity perception, the scaffold algorithms (Murcko construction,
//!   parent enumeration, prioritization rules) and I/O utilities.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer holds the scaffold
//!   tree under construction, run configuration, progress and cancellation
//!   plumbing, per-scaffold property calculators, and the persistence
//!   boundary.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It ties the `engine` and `core` together to execute a complete
//!   generation run over a molecule collection, from raw SMILES input to a
//!   persisted tree.

pub mod core;
pub mod engine;
pub mod workflows;
