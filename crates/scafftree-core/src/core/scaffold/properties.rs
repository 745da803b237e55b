use crate::core::models::graph::MolecularGraph;
use crate::core::perception::{self, RingPerception};
use serde::Serialize;

/// Scalar properties of one scaffold, computed once at container
/// construction and immutable afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScaffoldProperties {
    pub ring_count: usize,
    pub aromatic_ring_count: usize,
    /// Bonds outside any ring: inter-ring linkers and exocyclic
    /// double-bond attachments.
    pub linker_bond_count: usize,
    pub fusion_delta: i64,
    pub abs_fusion_delta: i64,
    pub atom_count: usize,
    pub heteroatom_count: usize,
    pub nitrogen_count: usize,
    pub oxygen_count: usize,
    pub sulfur_count: usize,
}

impl ScaffoldProperties {
    pub fn compute(graph: &MolecularGraph, perception: &RingPerception) -> Self {
        let mut heteroatom_count = 0;
        let mut nitrogen_count = 0;
        let mut oxygen_count = 0;
        let mut sulfur_count = 0;
        for (_, atom) in graph.atoms_iter() {
            if atom.is_heteroatom() {
                heteroatom_count += 1;
            }
            if atom.is_nitrogen() {
                nitrogen_count += 1;
            } else if atom.is_oxygen() {
                oxygen_count += 1;
            } else if atom.is_sulfur() {
                sulfur_count += 1;
            }
        }

        let linker_bond_count = graph
            .bonds()
            .iter()
            .filter(|b| !perception.is_ring_bond(b.atom1_id, b.atom2_id))
            .count();

        let fusion_delta = perception.total_fusion_delta();

        Self {
            ring_count: perception.ring_count(),
            aromatic_ring_count: perception::aromatic_ring_count(graph, perception),
            linker_bond_count,
            fusion_delta,
            abs_fusion_delta: fusion_delta.abs(),
            atom_count: graph.atom_count(),
            heteroatom_count,
            nitrogen_count,
            oxygen_count,
            sulfur_count,
        }
    }
}

/// Composition of the ring a parent candidate just removed, used only
/// by prioritization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovedRingProperties {
    pub size: usize,
    /// Candidate linker bonds minus child linker bonds.
    pub linker_bond_delta: i64,
    pub heteroatom_count: usize,
    pub nitrogen_count: usize,
    pub oxygen_count: usize,
    pub sulfur_count: usize,
    pub was_aromatic: bool,
    /// Set when the torn-down linker contained a heteroatom.
    pub hetero_linked: bool,
}

/// Composition of the ring assembly the removed ring belonged to, taken
/// from the child scaffold before removal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingAssemblyProperties {
    pub fusion_delta: i64,
    pub abs_fusion_delta: i64,
    pub ring_count: usize,
    pub aromatic_ring_count: usize,
    pub heteroatom_count: usize,
    pub nitrogen_count: usize,
    pub oxygen_count: usize,
    pub sulfur_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::perception;
    use crate::core::smiles::parse;

    fn props(smiles: &str) -> ScaffoldProperties {
        let graph = parse(smiles).unwrap();
        let perception = perception::perceive(&graph);
        ScaffoldProperties::compute(&graph, &perception)
    }

    #[test]
    fn benzene_properties() {
        let p = props("c1ccccc1");
        assert_eq!(p.ring_count, 1);
        assert_eq!(p.aromatic_ring_count, 1);
        assert_eq!(p.linker_bond_count, 0);
        assert_eq!(p.fusion_delta, 0);
        assert_eq!(p.atom_count, 6);
        assert_eq!(p.heteroatom_count, 0);
    }

    #[test]
    fn biphenyl_counts_the_linker_bond() {
        let p = props("c1ccc(-c2ccccc2)cc1");
        assert_eq!(p.ring_count, 2);
        assert_eq!(p.linker_bond_count, 1);
        assert_eq!(p.fusion_delta, -1);
        assert_eq!(p.abs_fusion_delta, 1);
    }

    #[test]
    fn heteroatom_breakdown() {
        let p = props("c1ccc2c(c1)ncs2");
        assert_eq!(p.nitrogen_count, 1);
        assert_eq!(p.sulfur_count, 1);
        assert_eq!(p.oxygen_count, 0);
        assert_eq!(p.heteroatom_count, 2);
    }
}
