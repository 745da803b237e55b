use crate::core::models::element;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use crate::core::models::topology::BondOrder;
use crate::core::perception::{self, Ring, RingPerception};
use crate::core::scaffold::container::ScaffoldContainer;
use crate::core::scaffold::murcko::{self, MurckoType};
use crate::core::scaffold::properties::{
    RemovedRingProperties, RingAssemblyProperties, ScaffoldProperties,
};
use std::collections::HashSet;
use tracing::trace;

/// Enumerates the parent candidates of a scaffold: one attempted
/// removal per SSSR ring, keeping only removals that leave a valid,
/// connected, strictly smaller scaffold. Candidate order carries no
/// meaning; prioritization imposes one.
pub fn enumerate(scaffold: &ScaffoldContainer) -> Vec<ScaffoldContainer> {
    let perception = scaffold.perception();
    let mut candidates = Vec::new();

    for ring_idx in 0..perception.ring_count() {
        match remove_ring(scaffold, ring_idx) {
            Some(candidate) => candidates.push(candidate),
            None => trace!(ring = ring_idx, "ring removal rejected"),
        }
    }

    candidates
}

fn remove_ring(scaffold: &ScaffoldContainer, ring_idx: usize) -> Option<ScaffoldContainer> {
    let graph = scaffold.graph();
    let perception = scaffold.perception();
    let ring = &perception.rings[ring_idx];
    let was_aromatic = perception::ring_is_aromatic(graph, ring);

    let mut clone = graph.clone();

    // Epoxide/aziridine correction: losing the heteroatom of a
    // three-membered ring leaves the two carbons one bond short.
    if ring.len() == 3 && ring_heteroatom_count(graph, ring) == 1 {
        force_double_between_ring_carbons(&mut clone, ring);
    }

    let exclusive: Vec<AtomId> = ring
        .atoms
        .iter()
        .copied()
        .filter(|&a| perception.rings_containing(a).len() == 1)
        .collect();

    for &atom_id in &exclusive {
        clone.remove_atom(atom_id);
    }

    // A ring bond between two shared atoms that belongs to no other
    // ring must go explicitly (bridged systems).
    for (a, b) in ring.bonds() {
        if clone.contains_atom(a) && clone.contains_atom(b) {
            let in_other_ring = perception
                .rings
                .iter()
                .enumerate()
                .any(|(i, r)| i != ring_idx && r.contains_bond(a, b));
            if !in_other_ring {
                clone.remove_bond(a, b);
            }
        }
    }

    if was_aromatic {
        repair_fused_bonds(&mut clone, perception, ring_idx);
    }

    // Tear down linkers left dangling by the removal; anything that no
    // longer connects two rings is decoration now. Bridges between the
    // surviving rings classify as linkers and stay.
    let types = murcko::classify(&clone);
    let mut hetero_linked = false;
    let torn_down: Vec<AtomId> = types
        .iter()
        .filter(|&(_, &t)| t == MurckoType::SideChain)
        .map(|(&id, _)| id)
        .collect();
    for atom_id in &torn_down {
        if let Some(atom) = clone.atom(*atom_id) {
            hetero_linked |= atom.is_heteroatom();
        }
        clone.remove_atom(*atom_id);
    }

    accept(scaffold, &clone, was_aromatic)?;

    let removed_ring = removed_ring_properties(
        scaffold,
        &clone,
        ring,
        was_aromatic,
        hetero_linked,
    );
    let removed_assembly = assembly_properties(graph, perception, ring_idx);

    Some(ScaffoldContainer::candidate(
        clone,
        scaffold.smiles().to_string(),
        removed_ring,
        removed_assembly,
    ))
}

/// Validity gate from the removal contract: non-empty, strictly
/// smaller, connected, chemically sane carbon valences, and an aromatic
/// removal must lower the aromatic ring count by exactly one.
fn accept(
    scaffold: &ScaffoldContainer,
    candidate: &MolecularGraph,
    was_aromatic: bool,
) -> Option<()> {
    if candidate.atom_count() == 0 || candidate.atom_count() >= scaffold.atom_count() {
        return None;
    }
    if !candidate.is_connected() {
        return None;
    }

    // Kekulé-consistent sums, so fused aromatic carbons (three aromatic
    // bonds) are not misread as pentavalent.
    let carbon_overloaded = candidate.atoms_iter().any(|(id, atom)| {
        atom.is_carbon()
            && candidate.kekule_bond_order_sum(id)
                > u32::from(element::max_valence(atom.atomic_number))
    });
    if carbon_overloaded {
        return None;
    }

    if was_aromatic {
        let new_perception = perception::perceive(candidate);
        let before = scaffold.properties().aromatic_ring_count;
        let after = perception::aromatic_ring_count(candidate, &new_perception);
        if after + 1 != before {
            return None;
        }
    }

    Some(())
}

/// Fixes bond orders where the removed aromatic ring was fused to a
/// surviving ring. A fully aromatic survivor keeps its aromatic bond;
/// otherwise the shared bond is promoted to double when both atoms have
/// the valence headroom, except that a shared nitrogen in a
/// six-membered survivor keeps a single bond. Atoms repaired this way
/// lose their aromatic flag.
fn repair_fused_bonds(clone: &mut MolecularGraph, perception: &RingPerception, ring_idx: usize) {
    let ring = &perception.rings[ring_idx];

    for (a, b) in ring.bonds() {
        if !clone.contains_atom(a) || !clone.contains_atom(b) {
            continue;
        }

        let survivors: Vec<&Ring> = perception
            .rings
            .iter()
            .enumerate()
            .filter(|&(i, r)| i != ring_idx && r.contains_bond(a, b))
            .map(|(_, r)| r)
            .collect();
        if survivors.is_empty() {
            continue;
        }

        let all_aromatic = survivors.iter().all(|r| {
            r.bonds().iter().all(|&(x, y)| {
                clone
                    .bond_between(x, y)
                    .is_some_and(|bond| bond.order == BondOrder::Aromatic)
            })
        });
        if all_aromatic {
            continue;
        }

        let nitrogen_in_six_ring = survivors.iter().any(|r| r.len() == 6)
            && [a, b].iter().any(|&id| {
                clone.atom(id).is_some_and(|atom| atom.is_nitrogen())
            });

        let order = if nitrogen_in_six_ring {
            BondOrder::Single
        } else if double_fits(clone, a, b) {
            BondOrder::Double
        } else {
            BondOrder::Single
        };

        if let Some(bond) = clone.bond_between_mut(a, b) {
            bond.order = order;
        }
        for id in [a, b] {
            if let Some(atom) = clone.atom_mut(id) {
                atom.is_aromatic = false;
            }
        }
    }
}

/// Whether promoting the bond between `a` and `b` to double keeps both
/// endpoints within their element's valence.
fn double_fits(graph: &MolecularGraph, a: AtomId, b: AtomId) -> bool {
    [a, b].iter().all(|&id| {
        let Some(atom) = graph.atom(id) else {
            return false;
        };
        let current = graph.bond_order_sum(id);
        let bond_now = graph
            .bond_between(a, b)
            .map(|bond| bond.order.value().round() as u32)
            .unwrap_or(1);
        current - bond_now + 2 <= u32::from(element::max_valence(atom.atomic_number))
    })
}

fn force_double_between_ring_carbons(clone: &mut MolecularGraph, ring: &Ring) {
    let carbons: Vec<AtomId> = ring
        .atoms
        .iter()
        .copied()
        .filter(|&a| clone.atom(a).is_some_and(|atom| atom.is_carbon()))
        .collect();
    if carbons.len() == 2
        && let Some(bond) = clone.bond_between_mut(carbons[0], carbons[1])
    {
        bond.order = BondOrder::Double;
    }
}

fn ring_heteroatom_count(graph: &MolecularGraph, ring: &Ring) -> usize {
    ring.atoms
        .iter()
        .filter(|&&a| graph.atom(a).is_some_and(|atom| atom.is_heteroatom()))
        .count()
}

fn removed_ring_properties(
    scaffold: &ScaffoldContainer,
    candidate: &MolecularGraph,
    ring: &Ring,
    was_aromatic: bool,
    hetero_linked: bool,
) -> RemovedRingProperties {
    let graph = scaffold.graph();
    let mut nitrogen_count = 0;
    let mut oxygen_count = 0;
    let mut sulfur_count = 0;
    let mut heteroatom_count = 0;
    for &atom_id in &ring.atoms {
        let Some(atom) = graph.atom(atom_id) else {
            continue;
        };
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

    let candidate_perception = perception::perceive(candidate);
    let candidate_props = ScaffoldProperties::compute(candidate, &candidate_perception);

    RemovedRingProperties {
        size: ring.len(),
        linker_bond_delta: candidate_props.linker_bond_count as i64
            - scaffold.properties().linker_bond_count as i64,
        heteroatom_count,
        nitrogen_count,
        oxygen_count,
        sulfur_count,
        was_aromatic,
        hetero_linked,
    }
}

fn assembly_properties(
    graph: &MolecularGraph,
    perception: &RingPerception,
    ring_idx: usize,
) -> RingAssemblyProperties {
    let assembly = perception
        .assemblies()
        .into_iter()
        .find(|group| group.contains(&ring_idx))
        .unwrap_or_else(|| vec![ring_idx]);

    let fusion_delta = perception.fusion_delta(&assembly);
    let aromatic_ring_count = assembly
        .iter()
        .filter(|&&i| perception::ring_is_aromatic(graph, &perception.rings[i]))
        .count();

    let atoms: HashSet<AtomId> = assembly
        .iter()
        .flat_map(|&i| perception.rings[i].atoms.iter().copied())
        .collect();
    let mut heteroatom_count = 0;
    let mut nitrogen_count = 0;
    let mut oxygen_count = 0;
    let mut sulfur_count = 0;
    for &atom_id in &atoms {
        let Some(atom) = graph.atom(atom_id) else {
            continue;
        };
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

    RingAssemblyProperties {
        fusion_delta,
        abs_fusion_delta: fusion_delta.abs(),
        ring_count: assembly.len(),
        aromatic_ring_count,
        heteroatom_count,
        nitrogen_count,
        oxygen_count,
        sulfur_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::smiles::parse;

    fn scaffold(smiles: &str) -> ScaffoldContainer {
        ScaffoldContainer::from_molecule(parse(smiles).unwrap(), true, false)
    }

    #[test]
    fn single_ring_has_no_parents() {
        let parents = scaffold("c1ccccc1").parent_scaffolds();
        assert!(parents.is_empty());
    }

    #[test]
    fn biphenyl_yields_benzene_from_either_ring() {
        let container = scaffold("c1ccc(-c2ccccc2)cc1");
        let parents = container.parent_scaffolds();
        assert_eq!(parents.len(), 2);
        for parent in &parents {
            assert_eq!(parent.smiles(), "c1ccccc1");
            assert_eq!(parent.child_smiles(), Some(container.smiles()));
            assert_eq!(parent.ring_count(), 1);
        }
    }

    #[test]
    fn naphthalene_loses_one_ring_and_stays_aromatic() {
        let container = scaffold("c1ccc2ccccc2c1");
        let parents = container.parent_scaffolds();
        assert_eq!(parents.len(), 2);
        for parent in &parents {
            assert_eq!(parent.smiles(), "c1ccccc1");
            let rrp = parent.removed_ring().unwrap();
            assert!(rrp.was_aromatic);
            assert_eq!(rrp.size, 6);
        }
    }

    #[test]
    fn indane_fusion_bond_is_promoted_to_double() {
        let container = scaffold("C1Cc2ccccc2C1");
        let parents = container.parent_scaffolds();
        // Removing the cyclopentane leaves benzene; removing the
        // benzene leaves cyclopentene with a repaired double bond.
        assert_eq!(parents.len(), 2);
        let smiles: Vec<&str> = parents.iter().map(|p| p.smiles()).collect();
        assert!(smiles.contains(&"c1ccccc1"));
        assert!(
            parents.iter().any(|p| {
                p.ring_count() == 1
                    && p.graph()
                        .bonds()
                        .iter()
                        .any(|b| b.order == BondOrder::Double)
            }),
            "no repaired cyclopentene found: {smiles:?}"
        );
    }

    #[test]
    fn anthracene_end_ring_removal_yields_naphthalene() {
        let container = scaffold("c1ccc2cc3ccccc3cc2c1");
        let parents = container.parent_scaffolds();
        // Both end rings are removable; the middle ring would
        // disconnect the two benzo rings.
        assert_eq!(parents.len(), 2);
        for parent in &parents {
            assert_eq!(parent.atom_count(), 10);
            assert_eq!(parent.ring_count(), 2);
            assert_eq!(parent.properties().aromatic_ring_count, 2);
        }
    }

    #[test]
    fn phenyl_naphthalene_can_drop_the_phenyl() {
        let container = scaffold("c1ccc(-c2ccc3ccccc3c2)cc1");
        let parents = container.parent_scaffolds();
        // The fused pair must survive phenyl removal despite its
        // three-bonded aromatic fusion carbons.
        assert!(
            parents
                .iter()
                .any(|p| p.atom_count() == 10 && p.ring_count() == 2),
            "no naphthalene candidate among {:?}",
            parents.iter().map(|p| p.smiles()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn middle_ring_removal_is_rejected_when_it_disconnects() {
        // Two phenyls joined through a central cyclohexane.
        let container = scaffold("C1CC(c2ccccc2)CCC1c1ccccc1");
        let parents = container.parent_scaffolds();
        // Only the two outer rings are removable.
        assert_eq!(parents.len(), 2);
        for parent in &parents {
            assert!(parent.graph().is_connected());
            assert_eq!(parent.ring_count(), 2);
        }
    }

    #[test]
    fn dangling_linker_is_torn_down_with_its_ring() {
        let container = scaffold("c1ccc(CCOc2ccccc2)cc1");
        let parents = container.parent_scaffolds();
        assert_eq!(parents.len(), 2);
        for parent in &parents {
            // The whole ether linker goes with the removed ring.
            assert_eq!(parent.smiles(), "c1ccccc1");
        }
        assert!(
            parents
                .iter()
                .any(|p| p.removed_ring().unwrap().hetero_linked),
            "ether oxygen should flag the linker as hetero-linked"
        );
    }

    #[test]
    fn epoxide_removal_leaves_a_double_bond() {
        // Styrene oxide scaffold: benzene + epoxide.
        let container = scaffold("C1OC1c1ccccc1");
        let parents = container.parent_scaffolds();
        let epoxide_removed = parents
            .iter()
            .find(|p| p.smiles() == "c1ccccc1")
            .expect("epoxide removal accepted");
        assert!(epoxide_removed.removed_ring().unwrap().oxygen_count == 1);
    }

    #[test]
    fn assembly_properties_describe_the_fused_system() {
        let container = scaffold("C1CCC(CC1)c1ccc2ccccc2c1");
        let parents = container.parent_scaffolds();
        let from_naphthalene = parents
            .iter()
            .filter_map(|p| p.removed_assembly())
            .find(|rap| rap.ring_count == 2)
            .expect("naphthalene assembly recorded");
        assert_eq!(from_naphthalene.aromatic_ring_count, 2);
        assert_eq!(from_naphthalene.fusion_delta, 0);
    }

    #[test]
    fn accepted_candidates_strictly_shrink() {
        let container = scaffold("c1ccc2ccccc2c1");
        for parent in container.parent_scaffolds() {
            assert!(parent.atom_count() < container.atom_count());
            assert_eq!(parent.ring_count() + 1, container.ring_count());
        }
    }
}
