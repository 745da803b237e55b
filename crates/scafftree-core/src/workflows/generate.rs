use crate::core::io::traits::MoleculeRecord;
use crate::core::layout;
use crate::core::scaffold::container::ScaffoldContainer;
use crate::core::scaffold::rules;
use crate::core::smiles;
use crate::engine::calculators;
use crate::engine::config::GeneratorOptions;
use crate::engine::error::GeneratorError;
use crate::engine::progress::{CancelToken, ProgressReporter, ProgressSnapshot};
use crate::engine::store::ScaffoldStore;
use crate::engine::tree::ScaffoldTree;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// Result of a generation run. A cancelled run persists nothing.
#[derive(Debug)]
pub enum GenerationOutcome {
    Completed(ScaffoldTree),
    Cancelled,
}

/// Generates a scaffold tree over `molecules` and persists it through
/// `store`.
///
/// Per-molecule faults (unparseable SMILES, ring-free structures,
/// duplicate identifiers) are recorded as messages and skipped; they
/// never abort the run. Cancellation is polled once per molecule and
/// returns [`GenerationOutcome::Cancelled`] without touching the store.
///
/// # Errors
///
/// Returns [`GeneratorError::Internal`] when tree assembly violates the
/// single-parent invariant, and [`GeneratorError::Store`] when the final
/// write fails (after a best-effort delete of the partial tree).
#[instrument(skip_all, name = "scaffold_tree_generation", fields(title = %options.title))]
pub fn run(
    initiator: &str,
    molecules: &[MoleculeRecord],
    options: &GeneratorOptions,
    store: &mut impl ScaffoldStore,
    reporter: &ProgressReporter,
    cancel: &CancelToken,
) -> Result<GenerationOutcome, GeneratorError> {
    let mut tree = ScaffoldTree::new(&options.title, options.comment.clone(), initiator);
    let mut containers: HashMap<String, ScaffoldContainer> = HashMap::new();
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut messages: Vec<String> = Vec::new();
    let total = molecules.len();

    info!(total, "Starting scaffold tree generation");

    for (processed, record) in molecules.iter().enumerate() {
        if cancel.is_cancelled() {
            info!(processed, "Generation cancelled; discarding partial tree");
            return Ok(GenerationOutcome::Cancelled);
        }

        if let Some(message) =
            process_molecule(record, options, &mut tree, &mut containers, &mut seen_ids)?
        {
            debug!(molecule = %record.external_id, %message, "Skipping molecule");
            messages.push(message);
        }

        reporter.report(ProgressSnapshot {
            processed: processed + 1,
            total,
            saving: false,
            messages: messages.clone(),
        });
    }

    tree.attach_root();
    evaluate_calculators(&mut tree, &containers);

    reporter.report(ProgressSnapshot {
        processed: total,
        total,
        saving: true,
        messages: messages.clone(),
    });

    if let Err(source) = store.save_all_new(&tree) {
        warn!(error = %source, "Persisting the tree failed; removing partial entity");
        if let Err(cleanup) = store.delete(tree.title()) {
            warn!(error = %cleanup, "Cleanup after failed save also failed");
        }
        return Err(GeneratorError::Store { source });
    }

    info!(scaffolds = tree.len(), "Generation finished");
    Ok(GenerationOutcome::Completed(tree))
}

/// Runs one molecule through scaffold construction and the pruning
/// chain. Soft faults come back as `Ok(Some(message))` and skip the
/// molecule; only internal consistency violations are hard errors.
fn process_molecule<'a>(
    record: &'a MoleculeRecord,
    options: &GeneratorOptions,
    tree: &mut ScaffoldTree,
    containers: &mut HashMap<String, ScaffoldContainer>,
    seen_ids: &mut HashSet<&'a str>,
) -> Result<Option<String>, GeneratorError> {
    if !seen_ids.insert(&record.external_id) {
        return Ok(Some(format!(
            "molecule '{}': duplicate identifier, ignored",
            record.external_id
        )));
    }

    let mut graph = match smiles::parse(&record.smiles) {
        Ok(graph) => graph,
        Err(error) => {
            return Ok(Some(format!("molecule '{}': {error}", record.external_id)));
        }
    };
    if graph.atom_count() == 0 {
        return Ok(Some(format!(
            "molecule '{}': empty structure",
            record.external_id
        )));
    }
    graph.reduce_to_largest_fragment();

    let murcko = ScaffoldContainer::from_molecule(graph, true, options.deglycosilate);
    if murcko.ring_count() == 0 || murcko.smiles().is_empty() {
        return Ok(Some(format!(
            "molecule '{}': no ring system, contributes nothing",
            record.external_id
        )));
    }

    let (mut current_id, fresh) = register(&murcko, tree, containers);
    if let Some(node) = tree.get_mut(current_id) {
        node.add_molecule(&record.external_id);
    }
    if !fresh {
        return Ok(None);
    }

    // Pruning chain: remove one ring at a time until the scaffold is a
    // single ring or the parent is already known.
    let mut current = murcko;
    loop {
        let mut candidates = current.parent_scaffolds();
        if candidates.is_empty() {
            break;
        }
        let selected = rules::select_index(&candidates, options.ruleset.as_ref());
        let parent = candidates.swap_remove(selected);

        let (parent_id, parent_fresh) = register(&parent, tree, containers);
        tree.link_parent(current_id, parent_id).map_err(|conflict| {
            GeneratorError::Internal(format!(
                "scaffold '{}' linked under both '{}' and '{}'",
                conflict.smiles, conflict.existing_parent, conflict.new_parent
            ))
        })?;

        if !parent_fresh {
            break;
        }
        current_id = parent_id;
        current = parent;
    }

    Ok(None)
}

/// Registers a scaffold in the tree, deduplicating by canonical SMILES,
/// and remembers its container for calculator evaluation.
fn register(
    scaffold: &ScaffoldContainer,
    tree: &mut ScaffoldTree,
    containers: &mut HashMap<String, ScaffoldContainer>,
) -> (crate::core::models::ids::ScaffoldId, bool) {
    let smiles = scaffold.smiles().to_string();
    if let Some(id) = tree.get_by_smiles(&smiles) {
        return (id, false);
    }
    let positions = depiction(scaffold);
    let (id, fresh) = tree.insert(smiles.clone(), positions, Some(*scaffold.properties()));
    containers.insert(smiles, scaffold.clone());
    (id, fresh)
}

/// Produces flat 2-D coordinates for persistence, in stable atom order.
fn depiction(scaffold: &ScaffoldContainer) -> Vec<[f64; 2]> {
    let mut graph = scaffold.graph().clone();
    layout::assign_coordinates(&mut graph);
    graph
        .atom_ids()
        .into_iter()
        .filter_map(|id| graph.atom(id).and_then(|atom| atom.position))
        .map(|point| [point.x, point.y])
        .collect()
}

fn evaluate_calculators(tree: &mut ScaffoldTree, containers: &HashMap<String, ScaffoldContainer>) {
    let ids: Vec<_> = tree.iter().map(|(id, _)| id).collect();
    for id in ids {
        let Some(container) = tree
            .get(id)
            .and_then(|node| containers.get(node.smiles()))
            .cloned()
        else {
            continue;
        };
        for calculator in calculators::default_calculators() {
            let value = calculator.evaluate(&container);
            if let Some(node) = tree.get_mut(id) {
                node.set_computed(calculator.name(), value);
            }
        }
    }
}
