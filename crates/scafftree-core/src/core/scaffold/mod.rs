//! Scaffold construction and pruning.
//!
//! The [`container::ScaffoldContainer`] wraps one scaffold state and its
//! derived properties; [`murcko`] reduces molecules to their framework,
//! [`sugars`] strips terminal glycosides, [`parents`] enumerates the
//! scaffolds reachable by removing one ring, and [`rules`] picks one of
//! them.

pub mod container;
pub mod murcko;
pub mod parents;
pub mod properties;
pub mod rules;
pub mod sugars;

pub use container::ScaffoldContainer;
pub use properties::{RemovedRingProperties, RingAssemblyProperties, ScaffoldProperties};
pub use rules::{PrioritizationRule, RuleKind, RuleSet, RuleSetError, select_index};
