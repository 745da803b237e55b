use crate::core::models::graph::MolecularGraph;
use crate::core::perception::{self, RingPerception};
use crate::core::scaffold::properties::{
    RemovedRingProperties, RingAssemblyProperties, ScaffoldProperties,
};
use crate::core::scaffold::{murcko, parents, sugars};
use std::sync::OnceLock;

/// One scaffold state: a molecular graph together with its perceived
/// rings, scalar properties and, for parent candidates, the bookkeeping
/// prioritization needs.
///
/// Cloning deep-copies the graph, so ring removal on one candidate
/// never mutates another. The canonical SMILES is computed on first
/// request and memoized.
#[derive(Debug, Clone)]
pub struct ScaffoldContainer {
    graph: MolecularGraph,
    perception: RingPerception,
    properties: ScaffoldProperties,
    /// Canonical SMILES of the scaffold this candidate was derived
    /// from by one ring removal.
    child_smiles: Option<String>,
    removed_ring: Option<RemovedRingProperties>,
    removed_assembly: Option<RingAssemblyProperties>,
    smiles: OnceLock<String>,
}

impl ScaffoldContainer {
    /// Wraps a graph as-is, without any pruning.
    pub fn from_graph(graph: MolecularGraph) -> Self {
        let perception = perception::perceive(&graph);
        let properties = ScaffoldProperties::compute(&graph, &perception);
        Self {
            graph,
            perception,
            properties,
            child_smiles: None,
            removed_ring: None,
            removed_assembly: None,
            smiles: OnceLock::new(),
        }
    }

    /// Builds the scaffold of a whole molecule: optional terminal-sugar
    /// removal first, then reduction to the Murcko framework.
    ///
    /// The input is expected to be a single connected fragment.
    pub fn from_molecule(
        mut graph: MolecularGraph,
        generate_murcko: bool,
        deglycosilate: bool,
    ) -> Self {
        if deglycosilate {
            sugars::remove_terminal_sugars(&mut graph);
        }
        if generate_murcko {
            murcko::prune_to_scaffold(&mut graph);
        }
        Self::from_graph(graph)
    }

    /// Constructor for parent candidates produced by ring removal.
    pub(crate) fn candidate(
        graph: MolecularGraph,
        child_smiles: String,
        removed_ring: RemovedRingProperties,
        removed_assembly: RingAssemblyProperties,
    ) -> Self {
        let mut container = Self::from_graph(graph);
        container.child_smiles = Some(child_smiles);
        container.removed_ring = Some(removed_ring);
        container.removed_assembly = Some(removed_assembly);
        container
    }

    /// Canonical SMILES identity, memoized on first call.
    pub fn smiles(&self) -> &str {
        self.smiles
            .get_or_init(|| crate::core::smiles::canonical_smiles(&self.graph))
    }

    pub fn graph(&self) -> &MolecularGraph {
        &self.graph
    }

    pub fn perception(&self) -> &RingPerception {
        &self.perception
    }

    pub fn properties(&self) -> &ScaffoldProperties {
        &self.properties
    }

    pub fn ring_count(&self) -> usize {
        self.perception.ring_count()
    }

    pub fn atom_count(&self) -> usize {
        self.graph.atom_count()
    }

    pub fn child_smiles(&self) -> Option<&str> {
        self.child_smiles.as_deref()
    }

    pub fn removed_ring(&self) -> Option<&RemovedRingProperties> {
        self.removed_ring.as_ref()
    }

    pub fn removed_assembly(&self) -> Option<&RingAssemblyProperties> {
        self.removed_assembly.as_ref()
    }

    /// Enumerates every valid parent scaffold reachable by removing
    /// exactly one ring.
    pub fn parent_scaffolds(&self) -> Vec<ScaffoldContainer> {
        parents::enumerate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::smiles::parse;

    #[test]
    fn from_molecule_strips_decoration() {
        let graph = parse("CCc1ccccc1O").unwrap();
        let container = ScaffoldContainer::from_molecule(graph, true, false);
        assert_eq!(container.atom_count(), 6);
        assert_eq!(container.ring_count(), 1);
        assert_eq!(container.smiles(), "c1ccccc1");
    }

    #[test]
    fn smiles_is_memoized() {
        let graph = parse("c1ccccc1").unwrap();
        let container = ScaffoldContainer::from_graph(graph);
        let first = container.smiles() as *const str;
        let second = container.smiles() as *const str;
        assert_eq!(first, second);
    }

    #[test]
    fn deglycosilation_happens_before_murcko() {
        let graph = parse("OCC1OC(Oc2ccccc2)C(O)C(O)C1O").unwrap();
        let container = ScaffoldContainer::from_molecule(graph, true, true);
        assert_eq!(container.ring_count(), 1);
        assert_eq!(container.smiles(), "c1ccccc1");
    }

    #[test]
    fn clone_isolates_graph_state() {
        let graph = parse("c1ccccc1").unwrap();
        let container = ScaffoldContainer::from_graph(graph);
        let clone = container.clone();
        assert_eq!(container.smiles(), clone.smiles());
        assert_eq!(container.atom_count(), clone.atom_count());
    }
}
