use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use crate::core::models::topology::BondOrder;
use crate::core::perception::{self, Ring, RingPerception};
use std::collections::HashSet;
use tracing::debug;

/// Removes terminal sugar rings (deglycosilation).
///
/// A sugar candidate is a non-aromatic, non-fused five or six membered
/// ring with only single bonds, exactly one ring oxygen, and an
/// exocyclic oxygen next to that ring oxygen. Candidates are classified
/// terminal outward-in: a sugar is terminal when at most one of its
/// exocyclic branches reaches a ring that is not itself a terminal
/// sugar. Classification repeats to a fixed point since one pass over a
/// glycosidic chain only settles its outermost ring.
///
/// All atoms of terminal sugars are deleted; if this disconnects the
/// graph only the largest fragment that still contains rings survives
/// (an empty graph when none does). Returns whether anything changed.
pub fn remove_terminal_sugars(graph: &mut MolecularGraph) -> bool {
    let perception = perception::perceive(graph);
    if perception.ring_count() == 0 {
        return false;
    }

    let candidates: Vec<usize> = (0..perception.ring_count())
        .filter(|&i| is_sugar_candidate(graph, &perception, i))
        .collect();
    if candidates.is_empty() {
        return false;
    }

    let mut terminal: HashSet<usize> = HashSet::new();
    loop {
        let mut changed = false;
        for &idx in &candidates {
            if terminal.contains(&idx) {
                continue;
            }
            if is_terminal(graph, &perception, idx, &terminal) {
                terminal.insert(idx);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    if terminal.is_empty() {
        return false;
    }
    debug!(removed = terminal.len(), "removing terminal sugar rings");

    let doomed: HashSet<AtomId> = terminal
        .iter()
        .flat_map(|&idx| perception.rings[idx].atoms.iter().copied())
        .collect();
    for atom_id in &doomed {
        graph.remove_atom(*atom_id);
    }

    retain_ring_fragment(graph);
    true
}

fn is_sugar_candidate(graph: &MolecularGraph, perception: &RingPerception, idx: usize) -> bool {
    let ring = &perception.rings[idx];
    if ring.len() != 5 && ring.len() != 6 {
        return false;
    }
    if perception::ring_is_aromatic(graph, ring) {
        return false;
    }

    // Fused rings are never sugar candidates.
    let fused = ring.atoms.iter().any(|&a| {
        perception
            .rings
            .iter()
            .enumerate()
            .any(|(other, r)| other != idx && r.contains_atom(a))
    });
    if fused {
        return false;
    }

    let all_single = ring.bonds().iter().all(|&(a, b)| {
        graph
            .bond_between(a, b)
            .is_some_and(|bond| bond.order == BondOrder::Single)
    });
    if !all_single {
        return false;
    }

    let ring_oxygens: Vec<AtomId> = ring
        .atoms
        .iter()
        .copied()
        .filter(|&a| graph.atom(a).is_some_and(|atom| atom.is_oxygen()))
        .collect();
    if ring_oxygens.len() != 1 {
        return false;
    }

    // An anomeric-type exocyclic oxygen next to the ring oxygen.
    let ring_oxygen = ring_oxygens[0];
    graph
        .neighbors(ring_oxygen)
        .iter()
        .filter(|&&n| ring.contains_atom(n))
        .any(|&anomeric| {
            graph.neighbors(anomeric).iter().any(|&ext| {
                !ring.contains_atom(ext) && graph.atom(ext).is_some_and(|a| a.is_oxygen())
            })
        })
}

/// A sugar ring is terminal when at most one exocyclic branch reaches
/// atoms of a ring not already classified as a terminal sugar.
fn is_terminal(
    graph: &MolecularGraph,
    perception: &RingPerception,
    idx: usize,
    terminal: &HashSet<usize>,
) -> bool {
    let ring = &perception.rings[idx];
    let mut anchored_branches = 0;

    for &ring_atom in &ring.atoms {
        for &start in graph.neighbors(ring_atom) {
            if ring.contains_atom(start) {
                continue;
            }
            if branch_reaches_live_ring(graph, perception, ring, start, terminal) {
                anchored_branches += 1;
                if anchored_branches > 1 {
                    return false;
                }
            }
        }
    }

    true
}

fn branch_reaches_live_ring(
    graph: &MolecularGraph,
    perception: &RingPerception,
    origin: &Ring,
    start: AtomId,
    terminal: &HashSet<usize>,
) -> bool {
    let mut stack = vec![start];
    let mut seen: HashSet<AtomId> = origin.atoms.iter().copied().collect();
    seen.insert(start);

    while let Some(current) = stack.pop() {
        let memberships = perception.rings_containing(current);
        if memberships.iter().any(|m| !terminal.contains(m)) {
            return true;
        }
        for &next in graph.neighbors(current) {
            if seen.insert(next) {
                stack.push(next);
            }
        }
    }
    false
}

/// Keeps the largest fragment still containing a ring; clears the graph
/// when no fragment has one.
fn retain_ring_fragment(graph: &mut MolecularGraph) {
    let perception = perception::perceive(graph);
    let components = graph.connected_components();
    if components.len() <= 1 && perception.ring_count() > 0 {
        return;
    }

    let keep: Option<Vec<AtomId>> = components
        .into_iter()
        .filter(|c| c.iter().any(|&a| perception.is_ring_atom(a)))
        .max_by_key(|c| c.len());

    match keep {
        Some(component) => {
            let keep_set: HashSet<AtomId> = component.into_iter().collect();
            graph.keep_only(&keep_set);
        }
        None => {
            let all: Vec<AtomId> = graph.atom_ids();
            for id in all {
                graph.remove_atom(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::smiles::{canonical_smiles, parse};

    #[test]
    fn glucose_alone_reduces_to_nothing() {
        // Plain pyranose: a terminal sugar with no core to keep.
        let mut graph = parse("OC1OC(CO)C(O)C(O)C1O").unwrap();
        assert!(remove_terminal_sugars(&mut graph));
        assert_eq!(graph.atom_count(), 0);
    }

    #[test]
    fn pyranose_hanging_off_a_core_ring_is_removed() {
        // Phenyl glycoside: the sugar goes, the benzene stays.
        let mut graph = parse("OCC1OC(Oc2ccccc2)C(O)C(O)C1O").unwrap();
        assert!(remove_terminal_sugars(&mut graph));
        let smiles = canonical_smiles(&graph);
        assert!(smiles.contains('c'), "core ring lost: '{smiles}'");
        assert!(!smiles.contains("C1"), "sugar ring survived: '{smiles}'");
    }

    #[test]
    fn cyclohexane_is_not_a_sugar() {
        let mut graph = parse("C1CCCCC1").unwrap();
        assert!(!remove_terminal_sugars(&mut graph));
        assert_eq!(graph.atom_count(), 6);
    }

    #[test]
    fn tetrahydropyran_without_exocyclic_oxygen_is_kept() {
        let mut graph = parse("C1CCOCC1").unwrap();
        assert!(!remove_terminal_sugars(&mut graph));
        assert_eq!(graph.atom_count(), 6);
    }

    #[test]
    fn sugar_chain_is_peeled_to_the_core() {
        // Disaccharide on a benzene: outer sugar terminal in pass one,
        // inner sugar only after the outer is classified.
        let smiles = "OCC1OC(OC2OC(CO)C(O)C(O)C2Oc2ccccc2)C(O)C(O)C1O";
        let mut graph = parse(smiles).unwrap();
        assert!(remove_terminal_sugars(&mut graph));
        let out = canonical_smiles(&graph);
        assert!(out.contains('c'), "core lost: '{out}'");
        let perception = perception::perceive(&graph);
        assert_eq!(perception.ring_count(), 1, "sugars survived: '{out}'");
    }

    #[test]
    fn aromatic_rings_are_never_candidates() {
        let mut graph = parse("Oc1ccoc1O").unwrap();
        assert!(!remove_terminal_sugars(&mut graph));
    }
}
