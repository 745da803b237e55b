use crate::core::scaffold::container::ScaffoldContainer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Closed set of prioritization rule kinds.
///
/// `SCP*` rules read the candidate scaffold's own properties, `RRP*`
/// rules the properties of the ring the candidate removed, and `RAP*`
/// rules the properties of the ring assembly that ring belonged to.
/// The serialized names are the historical rule identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    #[serde(rename = "SCPnoLinkerBonds")]
    ScpNoLinkerBonds,
    #[serde(rename = "SCPdelta")]
    ScpDelta,
    #[serde(rename = "SCPabsDelta")]
    ScpAbsDelta,
    #[serde(rename = "SCPnoAroRings")]
    ScpNoAroRings,
    #[serde(rename = "SCPnoHetAt")]
    ScpNoHetAt,
    #[serde(rename = "SCPnoNAt")]
    ScpNoNAt,
    #[serde(rename = "SCPnoOAt")]
    ScpNoOAt,
    #[serde(rename = "SCPnoSAt")]
    ScpNoSAt,
    #[serde(rename = "SCPnoRings")]
    ScpNoRings,
    #[serde(rename = "RRPringSize")]
    RrpRingSize,
    #[serde(rename = "RRPlinkerBondDelta")]
    RrpLinkerBondDelta,
    #[serde(rename = "RRPnoHetAt")]
    RrpNoHetAt,
    #[serde(rename = "RRPnoNAt")]
    RrpNoNAt,
    #[serde(rename = "RRPnoOAt")]
    RrpNoOAt,
    #[serde(rename = "RRPnoSAt")]
    RrpNoSAt,
    #[serde(rename = "RRParomatic")]
    RrpAromatic,
    #[serde(rename = "RRPheteroLinked")]
    RrpHeteroLinked,
    #[serde(rename = "RAPdelta")]
    RapDelta,
    #[serde(rename = "RAPabsDelta")]
    RapAbsDelta,
    #[serde(rename = "RAPnoRings")]
    RapNoRings,
    #[serde(rename = "RAPnoAroRings")]
    RapNoAroRings,
    #[serde(rename = "RAPnoHetAt")]
    RapNoHetAt,
    #[serde(rename = "RAPnoNAt")]
    RapNoNAt,
    #[serde(rename = "RAPnoOAt")]
    RapNoOAt,
    #[serde(rename = "RAPnoSAt")]
    RapNoSAt,
}

impl RuleKind {
    /// Numeric value this rule compares for one candidate. Candidates
    /// without removal bookkeeping score zero on RRP and RAP rules.
    fn value(self, candidate: &ScaffoldContainer) -> i64 {
        let scp = candidate.properties();
        let rrp = candidate.removed_ring().copied().unwrap_or_default();
        let rap = candidate.removed_assembly().copied().unwrap_or_default();
        match self {
            Self::ScpNoLinkerBonds => scp.linker_bond_count as i64,
            Self::ScpDelta => scp.fusion_delta,
            Self::ScpAbsDelta => scp.abs_fusion_delta,
            Self::ScpNoAroRings => scp.aromatic_ring_count as i64,
            Self::ScpNoHetAt => scp.heteroatom_count as i64,
            Self::ScpNoNAt => scp.nitrogen_count as i64,
            Self::ScpNoOAt => scp.oxygen_count as i64,
            Self::ScpNoSAt => scp.sulfur_count as i64,
            Self::ScpNoRings => scp.ring_count as i64,
            Self::RrpRingSize => rrp.size as i64,
            Self::RrpLinkerBondDelta => rrp.linker_bond_delta,
            Self::RrpNoHetAt => rrp.heteroatom_count as i64,
            Self::RrpNoNAt => rrp.nitrogen_count as i64,
            Self::RrpNoOAt => rrp.oxygen_count as i64,
            Self::RrpNoSAt => rrp.sulfur_count as i64,
            Self::RrpAromatic => rrp.was_aromatic as i64,
            Self::RrpHeteroLinked => rrp.hetero_linked as i64,
            Self::RapDelta => rap.fusion_delta,
            Self::RapAbsDelta => rap.abs_fusion_delta,
            Self::RapNoRings => rap.ring_count as i64,
            Self::RapNoAroRings => rap.aromatic_ring_count as i64,
            Self::RapNoHetAt => rap.heteroatom_count as i64,
            Self::RapNoNAt => rap.nitrogen_count as i64,
            Self::RapNoOAt => rap.oxygen_count as i64,
            Self::RapNoSAt => rap.sulfur_count as i64,
        }
    }
}

/// One rule in a custom rule set: a kind plus its tie-break direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritizationRule {
    pub kind: RuleKind,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

/// Historical built-in order, applied ascending. Do not reorder.
const BUILT_IN_ORDER: [RuleKind; 9] = [
    RuleKind::ScpNoLinkerBonds,
    RuleKind::ScpDelta,
    RuleKind::ScpAbsDelta,
    RuleKind::ScpNoAroRings,
    RuleKind::ScpNoHetAt,
    RuleKind::ScpNoNAt,
    RuleKind::ScpNoOAt,
    RuleKind::ScpNoSAt,
    RuleKind::ScpNoRings,
];

#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rule set: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Rule set contains no rules")]
    Empty,
}

/// An ordered sequence of prioritization rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<PrioritizationRule>,
}

impl RuleSet {
    pub fn from_toml_str(input: &str) -> Result<Self, RuleSetError> {
        let ruleset: RuleSet = toml::from_str(input)?;
        if ruleset.rules.is_empty() {
            return Err(RuleSetError::Empty);
        }
        Ok(ruleset)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleSetError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    fn built_in() -> Self {
        Self {
            rules: BUILT_IN_ORDER
                .iter()
                .map(|&kind| PrioritizationRule {
                    kind,
                    ascending: true,
                })
                .collect(),
        }
    }
}

/// Picks exactly one parent candidate.
///
/// Rules are applied in order; each narrows the surviving set to the
/// candidates with the best value under its direction. The first rule
/// leaving a unique survivor decides; if every rule ties, the first
/// candidate in enumeration order wins.
///
/// # Panics
///
/// Panics on an empty candidate list. Callers must not ask for a
/// selection when enumeration produced nothing; doing so is a bug, not
/// an input condition.
pub fn select_index(candidates: &[ScaffoldContainer], ruleset: Option<&RuleSet>) -> usize {
    assert!(
        !candidates.is_empty(),
        "parent selection requires at least one candidate"
    );

    let built_in;
    let rules = match ruleset {
        Some(rs) => &rs.rules,
        None => {
            built_in = RuleSet::built_in();
            &built_in.rules
        }
    };

    let mut survivors: Vec<usize> = (0..candidates.len()).collect();
    for rule in rules {
        if survivors.len() == 1 {
            break;
        }
        let values: Vec<i64> = survivors
            .iter()
            .map(|&i| rule.kind.value(&candidates[i]))
            .collect();
        let best = if rule.ascending {
            *values.iter().min().expect("non-empty survivors")
        } else {
            *values.iter().max().expect("non-empty survivors")
        };
        survivors = survivors
            .into_iter()
            .zip(values)
            .filter(|&(_, v)| v == best)
            .map(|(i, _)| i)
            .collect();
    }

    survivors[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::smiles::parse;

    fn scaffold(smiles: &str) -> ScaffoldContainer {
        ScaffoldContainer::from_molecule(parse(smiles).unwrap(), true, false)
    }

    #[test]
    fn built_in_rules_prefer_fewer_linker_bonds() {
        // Benzene fused to a cyclohexane, with a pyridine hanging off a
        // linker: removing the pyridine leaves the fused pair and zero
        // linker bonds; removing an outer fused ring keeps the linker.
        let container = scaffold("C1CCc2ccc(CCc3ccncc3)cc2C1");
        let candidates = container.parent_scaffolds();
        assert!(candidates.len() >= 2);
        let winner = &candidates[select_index(&candidates, None)];
        assert_eq!(winner.properties().linker_bond_count, 0);
    }

    #[test]
    fn fallback_is_first_in_enumeration_order() {
        // Two symmetric removals tie on every rule.
        let container = scaffold("c1ccc(-c2ccccc2)cc1");
        let candidates = container.parent_scaffolds();
        assert_eq!(candidates.len(), 2);
        assert_eq!(select_index(&candidates, None), 0);
    }

    #[test]
    fn custom_ruleset_reverses_a_decision() {
        let container = scaffold("C1CCc2ccc(CCc3ccncc3)cc2C1");
        let candidates = container.parent_scaffolds();
        let ruleset = RuleSet {
            rules: vec![PrioritizationRule {
                kind: RuleKind::ScpNoLinkerBonds,
                ascending: false,
            }],
        };
        let winner = &candidates[select_index(&candidates, Some(&ruleset))];
        assert!(winner.properties().linker_bond_count > 0);
    }

    #[test]
    fn ruleset_parses_from_toml() {
        let input = r#"
            [[rules]]
            kind = "SCPnoRings"

            [[rules]]
            kind = "RRPringSize"
            ascending = false
        "#;
        let ruleset = RuleSet::from_toml_str(input).unwrap();
        assert_eq!(ruleset.rules.len(), 2);
        assert_eq!(ruleset.rules[0].kind, RuleKind::ScpNoRings);
        assert!(ruleset.rules[0].ascending);
        assert!(!ruleset.rules[1].ascending);
    }

    #[test]
    fn empty_ruleset_is_rejected() {
        assert!(matches!(
            RuleSet::from_toml_str("rules = []"),
            Err(RuleSetError::Empty)
        ));
    }

    #[test]
    #[should_panic(expected = "at least one candidate")]
    fn empty_candidate_list_is_a_bug() {
        select_index(&[], None);
    }
}
