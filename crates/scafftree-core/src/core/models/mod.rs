//! Data structures for hydrogen-suppressed molecular graphs: atoms,
//! bonds, the slot-map arena they live in, and the static element table
//! backing atom classification.

pub mod atom;
pub mod element;
pub mod graph;
pub mod ids;
pub mod topology;
