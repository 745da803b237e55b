use crate::core::models::graph::MolecularGraph;
use crate::core::models::topology::BondOrder;
use crate::core::perception::rings::{Ring, RingPerception};

/// Decides whether a single SSSR ring is aromatic.
///
/// A ring whose bonds all carry aromatic order is accepted as written.
/// Otherwise a Hueckel electron count is attempted over Kekule orders:
/// each atom in an in-ring double bond contributes one pi electron, a
/// nitrogen, oxygen or sulfur with no double bond contributes a lone
/// pair, and a carbon with an exocyclic double bond contributes nothing.
/// A saturated ring carbon disqualifies the ring. Perception never
/// fails hard; an undecidable ring is simply non-aromatic.
pub fn ring_is_aromatic(graph: &MolecularGraph, ring: &Ring) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let all_aromatic_orders = ring.bonds().iter().all(|&(a, b)| {
        graph
            .bond_between(a, b)
            .is_some_and(|bond| bond.order == BondOrder::Aromatic)
    });
    if all_aromatic_orders {
        return true;
    }

    let mut pi_electrons: u32 = 0;
    for &atom_id in &ring.atoms {
        let Some(atom) = graph.atom(atom_id) else {
            return false;
        };

        let in_ring_double = graph.neighbors(atom_id).iter().any(|&n| {
            ring.contains_atom(n)
                && graph
                    .bond_between(atom_id, n)
                    .is_some_and(|b| b.order == BondOrder::Double)
        });
        if in_ring_double {
            pi_electrons += 1;
            continue;
        }

        let any_double = graph.has_multiple_bond(atom_id);
        if !any_double && (atom.is_nitrogen() || atom.is_oxygen() || atom.is_sulfur()) {
            pi_electrons += 2;
            continue;
        }

        if atom.is_carbon() && any_double {
            // Exocyclic double bond: the carbon stays sp2 but donates
            // no electrons to this ring.
            continue;
        }

        return false;
    }

    pi_electrons >= 2 && pi_electrons % 4 == 2
}

/// Number of aromatic rings in a perceived ring set.
pub fn aromatic_ring_count(graph: &MolecularGraph, perception: &RingPerception) -> usize {
    perception
        .rings
        .iter()
        .filter(|ring| ring_is_aromatic(graph, ring))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::perception::rings;
    use crate::core::smiles::parse;

    fn aromatic_rings(smiles: &str) -> usize {
        let graph = parse(smiles).unwrap();
        let perception = rings::perceive(&graph);
        aromatic_ring_count(&graph, &perception)
    }

    #[test]
    fn lowercase_benzene_is_aromatic() {
        assert_eq!(aromatic_rings("c1ccccc1"), 1);
    }

    #[test]
    fn kekule_benzene_is_aromatic() {
        assert_eq!(aromatic_rings("C1=CC=CC=C1"), 1);
    }

    #[test]
    fn cyclohexane_is_not_aromatic() {
        assert_eq!(aromatic_rings("C1CCCCC1"), 0);
    }

    #[test]
    fn cyclohexene_is_not_aromatic() {
        assert_eq!(aromatic_rings("C1=CCCCC1"), 0);
    }

    #[test]
    fn kekule_pyrrole_counts_the_nitrogen_lone_pair() {
        assert_eq!(aromatic_rings("C1=CC=CN1"), 1);
    }

    #[test]
    fn kekule_furan_counts_the_oxygen_lone_pair() {
        assert_eq!(aromatic_rings("C1=CC=CO1"), 1);
    }

    #[test]
    fn pyridone_carbonyl_carbon_donates_nothing() {
        // 2-pyridone: the exocyclic C=O carbon contributes zero pi
        // electrons while the ring nitrogen contributes its lone pair.
        assert_eq!(aromatic_rings("O=C1C=CC=CN1"), 1);
    }

    #[test]
    fn cyclopentadiene_fails_on_the_sp3_carbon() {
        assert_eq!(aromatic_rings("C1=CC=CC1"), 0);
    }

    #[test]
    fn naphthalene_has_two_aromatic_rings() {
        assert_eq!(aromatic_rings("c1ccc2ccccc2c1"), 2);
    }

    #[test]
    fn indane_has_one_aromatic_ring() {
        assert_eq!(aromatic_rings("C1Cc2ccccc2C1"), 1);
    }
}
