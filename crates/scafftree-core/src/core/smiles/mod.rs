//! SMILES line notation support.
//!
//! The parser covers the subset needed for scaffold work: organic-subset
//! and bracket atoms, ring closures (including `%nn`), branches, explicit
//! bond orders, charges and aromatic lowercase forms. Stereochemistry is
//! accepted and discarded. The writer produces a canonical form used as
//! the identity key for scaffolds.

pub mod parser;
pub mod writer;

pub use parser::{SmilesError, parse};
pub use writer::canonical_smiles;
