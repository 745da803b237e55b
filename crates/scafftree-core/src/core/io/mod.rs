//! Input of molecule lists for tree generation.
//!
//! Two formats are supported: plain `.smi` files (one SMILES per line
//! with an optional whitespace-separated name) and CSV files with
//! `id` and `smiles` columns plus an optional `name` column. Both
//! readers share the trait-based interface below.

pub mod smi;
pub mod traits;

pub use smi::{CsvMoleculeFile, SmiFile};
pub use traits::{MoleculeListFile, MoleculeRecord};
