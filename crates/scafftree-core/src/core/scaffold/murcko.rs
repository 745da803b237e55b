use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use crate::core::perception;
use std::collections::{HashMap, HashSet, VecDeque};

/// Structural role of an atom with respect to the Murcko framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MurckoType {
    /// Member of an SSSR ring.
    Ring,
    /// Acyclic atom on a path connecting two ring atoms.
    Linker,
    /// Acyclic decoration with no structural role; deleted.
    SideChain,
    /// Non-ring atom double or triple bonded directly to a ring atom.
    ExoDouble,
    /// Non-ring atom double or triple bonded to a linker atom.
    ExoLinkerDouble,
}

/// Classifies every atom of the graph with its Murcko type.
///
/// Linkers are found by iteratively stripping acyclic leaves with a
/// worklist: any non-ring atom still standing after the strip lies
/// between two ring atoms. Exocyclic multiple-bond partners of kept
/// atoms are then rescued from the side chain.
pub fn classify(graph: &MolecularGraph) -> HashMap<AtomId, MurckoType> {
    let perception = perception::perceive(graph);

    // Strip acyclic leaves until only rings and inter-ring paths remain.
    let mut degree: HashMap<AtomId, usize> = graph
        .atom_ids()
        .into_iter()
        .map(|id| (id, graph.degree(id)))
        .collect();
    let mut stripped: HashSet<AtomId> = HashSet::new();
    let mut worklist: VecDeque<AtomId> = graph
        .atom_ids()
        .into_iter()
        .filter(|&id| !perception.is_ring_atom(id) && degree[&id] <= 1)
        .collect();

    while let Some(atom_id) = worklist.pop_front() {
        if !stripped.insert(atom_id) {
            continue;
        }
        for &neighbor in graph.neighbors(atom_id) {
            if stripped.contains(&neighbor) || perception.is_ring_atom(neighbor) {
                continue;
            }
            let d = degree.get_mut(&neighbor).expect("tracked degree");
            *d = d.saturating_sub(1);
            if *d <= 1 {
                worklist.push_back(neighbor);
            }
        }
    }

    let mut types: HashMap<AtomId, MurckoType> = HashMap::new();
    for atom_id in graph.atom_ids() {
        let t = if perception.is_ring_atom(atom_id) {
            MurckoType::Ring
        } else if !stripped.contains(&atom_id) {
            MurckoType::Linker
        } else {
            MurckoType::SideChain
        };
        types.insert(atom_id, t);
    }

    // Exocyclic multiple bonds stay attached to the framework.
    let rescued: Vec<(AtomId, MurckoType)> = graph
        .atom_ids()
        .into_iter()
        .filter(|id| types[id] == MurckoType::SideChain)
        .filter_map(|id| {
            graph
                .neighbors(id)
                .iter()
                .copied()
                .filter(|&n| {
                    graph
                        .bond_between(id, n)
                        .is_some_and(|b| b.order.is_multiple())
                })
                .find_map(|n| match types[&n] {
                    MurckoType::Ring => Some((id, MurckoType::ExoDouble)),
                    MurckoType::Linker => Some((id, MurckoType::ExoLinkerDouble)),
                    _ => None,
                })
        })
        .collect();
    for (id, t) in rescued {
        types.insert(id, t);
    }

    types
}

/// Reduces the graph to its Murcko scaffold by deleting every
/// side-chain atom. Returns whether anything was removed.
pub fn prune_to_scaffold(graph: &mut MolecularGraph) -> bool {
    let types = classify(graph);
    let doomed: Vec<AtomId> = types
        .iter()
        .filter(|&(_, &t)| t == MurckoType::SideChain)
        .map(|(&id, _)| id)
        .collect();
    for atom_id in &doomed {
        graph.remove_atom(*atom_id);
    }
    !doomed.is_empty()
}
