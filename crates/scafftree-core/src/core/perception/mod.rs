//! Structure perception over molecular graphs: SSSR ring detection,
//! ring assemblies with their fusion metrics, and aromaticity.

pub mod aromaticity;
pub mod rings;

pub use aromaticity::{aromatic_ring_count, ring_is_aromatic};
pub use rings::{Ring, RingPerception, perceive};
