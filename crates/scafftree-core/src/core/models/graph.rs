use super::atom::Atom;
use super::ids::AtomId;
use super::topology::{Bond, BondOrder};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashSet;

/// A hydrogen-suppressed molecular graph with destructive editing support.
///
/// Atoms live in a slot map so that removals never invalidate the ids of
/// surviving atoms, and so that cloning the graph preserves every id:
/// a clone can be pruned independently while ids recorded against the
/// original remain meaningful on both copies.
#[derive(Debug, Clone, Default)]
pub struct MolecularGraph {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// List of all bonds in the graph.
    bonds: Vec<Bond>,
    /// Cached adjacency list, indexed by atom id.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
}

impl MolecularGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atom_ids(&self) -> Vec<AtomId> {
        self.atoms.keys().collect()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn contains_atom(&self, id: AtomId) -> bool {
        self.atoms.contains_key(id)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Adds an atom and initializes its adjacency slot.
    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let atom_id = self.atoms.insert(atom);
        self.bond_adjacency.insert(atom_id, Vec::new());
        atom_id
    }

    /// Adds a bond between two atoms.
    ///
    /// Idempotent: adding a bond that already exists succeeds without
    /// creating a duplicate (the original order is kept).
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Option<()> {
        if !self.atoms.contains_key(atom1_id) || !self.atoms.contains_key(atom2_id) {
            return None;
        }

        if let Some(neighbors) = self.bond_adjacency.get(atom1_id) {
            if neighbors.contains(&atom2_id) {
                return Some(());
            }
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id, order));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    /// Removes an atom together with every bond incident to it.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(atom_id)?;

        let original_bonds = std::mem::take(&mut self.bonds);
        self.bonds = original_bonds
            .into_iter()
            .filter(|bond| !bond.contains(atom_id))
            .collect();

        let neighbors = self.bond_adjacency.remove(atom_id).unwrap_or_default();
        for neighbor_id in neighbors {
            if let Some(adjacency) = self.bond_adjacency.get_mut(neighbor_id) {
                adjacency.retain(|&id| id != atom_id);
            }
        }

        Some(atom)
    }

    /// Removes the bond between two atoms, leaving both atoms in place.
    pub fn remove_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId) -> Option<Bond> {
        let idx = self
            .bonds
            .iter()
            .position(|b| b.contains(atom1_id) && b.contains(atom2_id))?;
        let bond = self.bonds.remove(idx);
        if let Some(adjacency) = self.bond_adjacency.get_mut(atom1_id) {
            adjacency.retain(|&id| id != atom2_id);
        }
        if let Some(adjacency) = self.bond_adjacency.get_mut(atom2_id) {
            adjacency.retain(|&id| id != atom1_id);
        }
        Some(bond)
    }

    /// Adjacent atom ids; empty for unknown atoms.
    pub fn neighbors(&self, atom_id: AtomId) -> &[AtomId] {
        self.bond_adjacency
            .get(atom_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of explicit bonds on an atom.
    pub fn degree(&self, atom_id: AtomId) -> usize {
        self.bond_adjacency
            .get(atom_id)
            .map(|v| v.len())
            .unwrap_or(0)
    }

    pub fn bond_between(&self, atom1_id: AtomId, atom2_id: AtomId) -> Option<&Bond> {
        self.bonds
            .iter()
            .find(|b| b.contains(atom1_id) && b.contains(atom2_id))
    }

    pub fn bond_between_mut(&mut self, atom1_id: AtomId, atom2_id: AtomId) -> Option<&mut Bond> {
        self.bonds
            .iter_mut()
            .find(|b| b.contains(atom1_id) && b.contains(atom2_id))
    }

    /// Sum of bond orders on an atom, rounded to the nearest integer.
    ///
    /// Aromatic bonds count as 1.5 each, so two aromatic bonds contribute 3.
    pub fn bond_order_sum(&self, atom_id: AtomId) -> u32 {
        let sum: f64 = self
            .bonds
            .iter()
            .filter(|b| b.contains(atom_id))
            .map(|b| b.order.value())
            .sum();
        sum.round() as u32
    }

    /// Bond order sum with aromatic bonds resolved to their minimal
    /// Kekulé assignment: n aromatic bonds on one atom contribute n + 1,
    /// since exactly one of them is a double bond in any valid Kekulé
    /// structure. An aromatic fusion carbon (three aromatic bonds) thus
    /// sums to 4, not the rounded-up 5 of [`Self::bond_order_sum`].
    pub fn kekule_bond_order_sum(&self, atom_id: AtomId) -> u32 {
        let mut aromatic = 0u32;
        let mut fixed = 0.0f64;
        for bond in self.bonds.iter().filter(|b| b.contains(atom_id)) {
            if bond.order == BondOrder::Aromatic {
                aromatic += 1;
            } else {
                fixed += bond.order.value();
            }
        }
        let aromatic_sum = if aromatic > 0 { aromatic + 1 } else { 0 };
        fixed.round() as u32 + aromatic_sum
    }

    /// Whether the atom carries a double or triple bond to any neighbor.
    pub fn has_multiple_bond(&self, atom_id: AtomId) -> bool {
        self.bonds.iter().any(|b| {
            b.contains(atom_id) && matches!(b.order, BondOrder::Double | BondOrder::Triple)
        })
    }

    /// Connected components, each a list of atom ids in traversal order.
    pub fn connected_components(&self) -> Vec<Vec<AtomId>> {
        let mut visited: HashSet<AtomId> = HashSet::new();
        let mut components = Vec::new();

        for start in self.atoms.keys() {
            if visited.contains(&start) {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            visited.insert(start);
            while let Some(current) = stack.pop() {
                component.push(current);
                if let Some(neighbors) = self.bond_adjacency.get(current) {
                    for &neighbor in neighbors {
                        if visited.insert(neighbor) {
                            stack.push(neighbor);
                        }
                    }
                }
            }
            components.push(component);
        }

        components
    }

    pub fn is_connected(&self) -> bool {
        self.atom_count() <= 1 || self.connected_components().len() == 1
    }

    /// Removes every atom outside `keep`.
    pub fn keep_only(&mut self, keep: &HashSet<AtomId>) {
        let doomed: Vec<AtomId> = self
            .atoms
            .keys()
            .filter(|id| !keep.contains(id))
            .collect();
        for id in doomed {
            self.remove_atom(id);
        }
    }

    /// Reduces the graph to its largest connected fragment (by atom count).
    pub fn reduce_to_largest_fragment(&mut self) {
        let components = self.connected_components();
        if components.len() <= 1 {
            return;
        }
        let largest = components
            .into_iter()
            .max_by_key(|c| c.len())
            .unwrap_or_default();
        let keep: HashSet<AtomId> = largest.into_iter().collect();
        self.keep_only(&keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element;

    fn carbon() -> Atom {
        Atom::new(element::CARBON)
    }

    fn chain(graph: &mut MolecularGraph, n: usize) -> Vec<AtomId> {
        let ids: Vec<AtomId> = (0..n).map(|_| graph.add_atom(carbon())).collect();
        for pair in ids.windows(2) {
            graph.add_bond(pair[0], pair[1], BondOrder::Single).unwrap();
        }
        ids
    }

    #[test]
    fn atom_removal_updates_bonds_and_adjacency() {
        let mut graph = MolecularGraph::new();
        let ids = chain(&mut graph, 3);

        assert_eq!(graph.bond_count(), 2);
        assert!(graph.neighbors(ids[1]).contains(&ids[0]));

        graph.remove_atom(ids[0]).unwrap();

        assert_eq!(graph.atom_count(), 2);
        assert_eq!(graph.bond_count(), 1);
        assert!(graph.atom(ids[0]).is_none());
        assert!(!graph.neighbors(ids[1]).contains(&ids[0]));
    }

    #[test]
    fn bond_removal_keeps_atoms() {
        let mut graph = MolecularGraph::new();
        let ids = chain(&mut graph, 2);

        graph.remove_bond(ids[0], ids[1]).unwrap();
        assert_eq!(graph.atom_count(), 2);
        assert_eq!(graph.bond_count(), 0);
        assert_eq!(graph.degree(ids[0]), 0);
        assert!(!graph.is_connected());
    }

    #[test]
    fn add_bond_is_idempotent() {
        let mut graph = MolecularGraph::new();
        let ids = chain(&mut graph, 2);
        graph.add_bond(ids[1], ids[0], BondOrder::Single).unwrap();
        assert_eq!(graph.bond_count(), 1);
        assert_eq!(graph.neighbors(ids[0]).len(), 1);
    }

    #[test]
    fn bond_order_sum_rounds_aromatic_halves() {
        let mut graph = MolecularGraph::new();
        let a = graph.add_atom(carbon());
        let b = graph.add_atom(carbon());
        let c = graph.add_atom(carbon());
        graph.add_bond(a, b, BondOrder::Aromatic).unwrap();
        graph.add_bond(a, c, BondOrder::Aromatic).unwrap();
        assert_eq!(graph.bond_order_sum(a), 3);

        let mut graph2 = MolecularGraph::new();
        let x = graph2.add_atom(carbon());
        let y = graph2.add_atom(carbon());
        graph2.add_bond(x, y, BondOrder::Double).unwrap();
        assert_eq!(graph2.bond_order_sum(x), 2);
        assert!(graph2.has_multiple_bond(x));
    }

    #[test]
    fn kekule_sum_keeps_fusion_carbons_tetravalent() {
        // Three aromatic bonds on one carbon: 4.5 rounds up to 5, but
        // any Kekulé assignment gives single + single + double = 4.
        let mut graph = MolecularGraph::new();
        let hub = graph.add_atom(carbon());
        for _ in 0..3 {
            let other = graph.add_atom(carbon());
            graph.add_bond(hub, other, BondOrder::Aromatic).unwrap();
        }
        assert_eq!(graph.bond_order_sum(hub), 5);
        assert_eq!(graph.kekule_bond_order_sum(hub), 4);

        // Non-aromatic bonds are unaffected.
        let mut graph2 = MolecularGraph::new();
        let x = graph2.add_atom(carbon());
        let y = graph2.add_atom(carbon());
        graph2.add_bond(x, y, BondOrder::Double).unwrap();
        assert_eq!(graph2.kekule_bond_order_sum(x), 2);
    }

    #[test]
    fn clone_preserves_ids_and_isolates_mutation() {
        let mut graph = MolecularGraph::new();
        let ids = chain(&mut graph, 4);

        let mut clone = graph.clone();
        clone.remove_atom(ids[0]).unwrap();

        assert_eq!(graph.atom_count(), 4);
        assert_eq!(clone.atom_count(), 3);
        assert!(graph.atom(ids[0]).is_some());
        assert!(clone.atom(ids[1]).is_some(), "surviving ids stay valid");
    }

    #[test]
    fn connected_components_and_largest_fragment() {
        let mut graph = MolecularGraph::new();
        chain(&mut graph, 5);
        let lone = graph.add_atom(carbon());

        let components = graph.connected_components();
        assert_eq!(components.len(), 2);

        graph.reduce_to_largest_fragment();
        assert_eq!(graph.atom_count(), 5);
        assert!(graph.atom(lone).is_none());
        assert!(graph.is_connected());
    }
}
