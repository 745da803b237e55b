//! Stateless domain layer: molecular data structures, SMILES handling,
//! structure perception, and the scaffold pruning algorithms. Nothing
//! in this layer holds run state; orchestration lives in `engine`.

pub mod io;
pub mod layout;
pub mod models;
pub mod perception;
pub mod scaffold;
pub mod smiles;
