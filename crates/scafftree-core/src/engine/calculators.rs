use crate::core::scaffold::container::ScaffoldContainer;

/// Closed set of per-scaffold numeric properties evaluated once per
/// registered scaffold after the tree is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyCalculator {
    AtomCount,
    BondCount,
    RingCount,
    AromaticRingFraction,
    HeteroatomFraction,
    FusionDelta,
}

impl PropertyCalculator {
    pub fn name(&self) -> &'static str {
        match self {
            PropertyCalculator::AtomCount => "atom_count",
            PropertyCalculator::BondCount => "bond_count",
            PropertyCalculator::RingCount => "ring_count",
            PropertyCalculator::AromaticRingFraction => "aromatic_ring_fraction",
            PropertyCalculator::HeteroatomFraction => "heteroatom_fraction",
            PropertyCalculator::FusionDelta => "fusion_delta",
        }
    }

    pub fn evaluate(&self, scaffold: &ScaffoldContainer) -> f64 {
        let props = scaffold.properties();
        match self {
            PropertyCalculator::AtomCount => props.atom_count as f64,
            PropertyCalculator::BondCount => scaffold.graph().bonds().len() as f64,
            PropertyCalculator::RingCount => props.ring_count as f64,
            PropertyCalculator::AromaticRingFraction => {
                if props.ring_count == 0 {
                    0.0
                } else {
                    props.aromatic_ring_count as f64 / props.ring_count as f64
                }
            }
            PropertyCalculator::HeteroatomFraction => {
                if props.atom_count == 0 {
                    0.0
                } else {
                    props.heteroatom_count as f64 / props.atom_count as f64
                }
            }
            PropertyCalculator::FusionDelta => props.fusion_delta as f64,
        }
    }
}

pub fn default_calculators() -> &'static [PropertyCalculator] {
    &[
        PropertyCalculator::AtomCount,
        PropertyCalculator::BondCount,
        PropertyCalculator::RingCount,
        PropertyCalculator::AromaticRingFraction,
        PropertyCalculator::HeteroatomFraction,
        PropertyCalculator::FusionDelta,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::smiles;

    fn scaffold(smiles: &str) -> ScaffoldContainer {
        ScaffoldContainer::from_graph(smiles::parse(smiles).unwrap())
    }

    #[test]
    fn pyridine_fractions() {
        let pyridine = scaffold("c1ccncc1");
        assert_eq!(PropertyCalculator::AtomCount.evaluate(&pyridine), 6.0);
        assert_eq!(PropertyCalculator::RingCount.evaluate(&pyridine), 1.0);
        assert_eq!(
            PropertyCalculator::AromaticRingFraction.evaluate(&pyridine),
            1.0
        );
        let hetero = PropertyCalculator::HeteroatomFraction.evaluate(&pyridine);
        assert!((hetero - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn every_default_calculator_has_a_distinct_name() {
        let mut names: Vec<&str> = default_calculators().iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), default_calculators().len());
    }
}
