use crate::core::models::element;
use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use crate::core::models::topology::BondOrder;
use std::collections::HashMap;

/// Generates a canonical SMILES string for the given graph.
///
/// Atoms are ranked by Morgan-like iterative invariant refinement, then
/// emitted by a depth-first traversal that always descends into the
/// lowest-ranked unvisited neighbor. Equal inputs produce equal strings
/// regardless of atom insertion order.
pub fn canonical_smiles(graph: &MolecularGraph) -> String {
    let index = GraphIndex::new(graph);
    let n = index.atoms.len();
    if n == 0 {
        return String::new();
    }

    let ranks = compute_canonical_ranks(graph, &index);
    let ring_closures = precompute_ring_closures(graph, &index, &ranks);

    let mut visited = vec![false; n];
    let mut result = String::new();

    loop {
        let start = (0..n).filter(|&i| !visited[i]).min_by_key(|&i| ranks[i]);
        match start {
            Some(start_idx) => {
                if !result.is_empty() {
                    result.push('.');
                }
                emit_component(
                    graph,
                    &index,
                    start_idx,
                    &ranks,
                    &mut visited,
                    &mut result,
                    &ring_closures,
                );
            }
            None => break,
        }
    }

    result
}

/// Dense index over the slot-map arena so rank and visit state can live
/// in flat vectors.
struct GraphIndex {
    atoms: Vec<AtomId>,
    index_of: HashMap<AtomId, usize>,
    /// Per atom: (neighbor index, bond index) pairs.
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl GraphIndex {
    fn new(graph: &MolecularGraph) -> Self {
        let atoms: Vec<AtomId> = graph.atom_ids();
        let index_of: HashMap<AtomId, usize> =
            atoms.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); atoms.len()];
        for (bond_idx, bond) in graph.bonds().iter().enumerate() {
            let i = index_of[&bond.atom1_id];
            let j = index_of[&bond.atom2_id];
            adjacency[i].push((j, bond_idx));
            adjacency[j].push((i, bond_idx));
        }

        Self {
            atoms,
            index_of,
            adjacency,
        }
    }
}

/// Per atom: (ring number, bond order, is_opening) triples to emit.
struct RingClosureInfo {
    atom_closures: Vec<Vec<(usize, BondOrder, bool)>>,
}

fn precompute_ring_closures(
    graph: &MolecularGraph,
    index: &GraphIndex,
    ranks: &[u64],
) -> RingClosureInfo {
    let n = index.atoms.len();
    let mut visited = vec![false; n];
    let mut atom_closures: Vec<Vec<(usize, BondOrder, bool)>> = vec![Vec::new(); n];
    let mut next_ring_num: usize = 1;
    let mut used_bonds = vec![false; graph.bond_count()];

    loop {
        let component_start = (0..n).filter(|&i| !visited[i]).min_by_key(|&i| ranks[i]);
        match component_start {
            Some(start) => scan_component(
                graph,
                index,
                start,
                ranks,
                &mut visited,
                &mut atom_closures,
                &mut next_ring_num,
                &mut used_bonds,
            ),
            None => break,
        }
    }

    RingClosureInfo { atom_closures }
}

/// One in-flight atom during the depth-first scan. The cursor walks the
/// rank-sorted neighbor list so a frame can resume after its subtree.
struct ScanFrame {
    atom_idx: usize,
    neighbors: Vec<(usize, usize)>,
    cursor: usize,
}

fn scan_frame(
    index: &GraphIndex,
    atom_idx: usize,
    from_atom: Option<usize>,
    ranks: &[u64],
) -> ScanFrame {
    let mut neighbors: Vec<(usize, usize)> = index.adjacency[atom_idx]
        .iter()
        .copied()
        .filter(|&(n, _)| Some(n) != from_atom)
        .collect();
    neighbors.sort_by_key(|&(n, _)| ranks[n]);
    ScanFrame {
        atom_idx,
        neighbors,
        cursor: 0,
    }
}

#[allow(clippy::too_many_arguments)]
fn scan_component(
    graph: &MolecularGraph,
    index: &GraphIndex,
    start_idx: usize,
    ranks: &[u64],
    visited: &mut [bool],
    atom_closures: &mut [Vec<(usize, BondOrder, bool)>],
    next_ring_num: &mut usize,
    used_bonds: &mut [bool],
) {
    visited[start_idx] = true;
    let mut stack = vec![scan_frame(index, start_idx, None, ranks)];

    while !stack.is_empty() {
        let top = stack.len() - 1;
        if stack[top].cursor >= stack[top].neighbors.len() {
            stack.pop();
            continue;
        }
        let (n, bi) = stack[top].neighbors[stack[top].cursor];
        stack[top].cursor += 1;

        if visited[n] {
            // Back-edge becomes a ring closure, once per bond.
            if !used_bonds[bi] {
                used_bonds[bi] = true;
                let order = graph.bonds()[bi].order;
                let ring_num = *next_ring_num;
                *next_ring_num += 1;
                atom_closures[n].push((ring_num, order, true));
                atom_closures[stack[top].atom_idx].push((ring_num, order, false));
            }
        } else {
            visited[n] = true;
            let parent = stack[top].atom_idx;
            stack.push(scan_frame(index, n, Some(parent), ranks));
        }
    }
}

fn compute_canonical_ranks(graph: &MolecularGraph, index: &GraphIndex) -> Vec<u64> {
    let n = index.atoms.len();

    let mut invariants: Vec<u64> = Vec::with_capacity(n);
    for &atom_id in &index.atoms {
        let atom = graph.atom(atom_id).expect("indexed atom exists");
        let degree = graph.degree(atom_id) as u64;
        let h_count = atom.explicit_hydrogens.unwrap_or(0) as u64;
        let charge = (atom.formal_charge as i64 + 128) as u64;
        let aromatic = atom.is_aromatic as u64;

        let inv = (atom.atomic_number as u64) << 32
            | degree << 24
            | h_count << 16
            | charge << 8
            | aromatic;
        invariants.push(inv);
    }

    // Refine until the number of distinct invariants stops growing.
    let mut prev_distinct = count_distinct(&invariants);

    for _ in 0..n {
        let mut new_invariants = Vec::with_capacity(n);
        for i in 0..n {
            let mut combined = invariants[i].wrapping_mul(1000003);
            let mut neighbor_invs: Vec<u64> = index.adjacency[i]
                .iter()
                .map(|&(neighbor, bond_idx)| {
                    let bond_val = graph.bonds()[bond_idx].order as u64;
                    invariants[neighbor].wrapping_mul(31).wrapping_add(bond_val)
                })
                .collect();
            neighbor_invs.sort_unstable();
            for nv in &neighbor_invs {
                combined = combined.wrapping_mul(1000003).wrapping_add(*nv);
            }
            new_invariants.push(combined);
        }

        let new_distinct = count_distinct(&new_invariants);
        invariants = new_invariants;

        if new_distinct <= prev_distinct {
            break;
        }
        prev_distinct = new_distinct;
    }

    let mut indexed: Vec<(u64, usize)> = invariants
        .iter()
        .copied()
        .enumerate()
        .map(|(i, v)| (v, i))
        .collect();
    indexed.sort_unstable();

    let mut ranks = vec![0u64; n];
    let mut rank = 0u64;
    for i in 1..indexed.len() {
        if indexed[i].0 != indexed[i - 1].0 {
            rank += 1;
        }
        ranks[indexed[i].1] = rank;
    }

    ranks
}

fn count_distinct(values: &[u64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

/// One in-flight subtree during emission. `buffer` collects the text for
/// the frame's atom and everything below it; `bond` is the edge from the
/// parent as (order, aromatic context), `None` at a component root.
struct EmitFrame {
    atom_idx: usize,
    neighbors: Vec<(usize, usize)>,
    buffer: String,
    bond: Option<(BondOrder, bool)>,
}

fn emit_frame(
    graph: &MolecularGraph,
    index: &GraphIndex,
    atom_idx: usize,
    from_atom: Option<usize>,
    bond: Option<(BondOrder, bool)>,
    ranks: &[u64],
    ring_info: &RingClosureInfo,
) -> EmitFrame {
    let mut buffer = String::new();
    write_atom(graph, index, atom_idx, &mut buffer);

    let mut closures = ring_info.atom_closures[atom_idx].clone();
    closures.sort_by_key(|&(rn, _, _)| rn);
    for &(ring_num, order, is_opening) in &closures {
        if is_opening {
            // Closing side inherits the symbol written at the opener.
            write_ring_bond_symbol(order, &mut buffer);
        }
        write_ring_number(ring_num, &mut buffer);
    }

    let mut neighbors: Vec<(usize, usize)> = index.adjacency[atom_idx]
        .iter()
        .copied()
        .filter(|&(n, _)| Some(n) != from_atom)
        .collect();
    neighbors.sort_by_key(|&(n, _)| ranks[n]);

    EmitFrame {
        atom_idx,
        neighbors,
        buffer,
        bond,
    }
}

fn emit_component(
    graph: &MolecularGraph,
    index: &GraphIndex,
    start_idx: usize,
    ranks: &[u64],
    visited: &mut [bool],
    output: &mut String,
    ring_info: &RingClosureInfo,
) {
    visited[start_idx] = true;
    let mut stack = vec![emit_frame(graph, index, start_idx, None, None, ranks, ring_info)];

    while !stack.is_empty() {
        let top = stack.len() - 1;
        // Re-check visited at each step; earlier branches may have reached
        // atoms that were unvisited when the list was built.
        let next = stack[top]
            .neighbors
            .iter()
            .copied()
            .find(|&(n, _)| !visited[n]);

        match next {
            Some((n, bi)) => {
                visited[n] = true;
                let order = graph.bonds()[bi].order;
                let aromatic_context = is_aromatic_idx(graph, index, stack[top].atom_idx)
                    && is_aromatic_idx(graph, index, n);
                let parent = stack[top].atom_idx;
                stack.push(emit_frame(
                    graph,
                    index,
                    n,
                    Some(parent),
                    Some((order, aromatic_context)),
                    ranks,
                    ring_info,
                ));
            }
            None => {
                let Some(done) = stack.pop() else { break };
                match stack.last_mut() {
                    Some(parent) => {
                        // Only wrap in parentheses when the parent still
                        // has an unvisited branch after this one; atoms
                        // consumed through ring closures leave none.
                        let wrap = parent.neighbors.iter().any(|&(m, _)| !visited[m]);
                        if wrap {
                            parent.buffer.push('(');
                        }
                        if let Some((order, aromatic_context)) = done.bond {
                            write_bond_symbol(order, aromatic_context, &mut parent.buffer);
                        }
                        parent.buffer.push_str(&done.buffer);
                        if wrap {
                            parent.buffer.push(')');
                        }
                    }
                    None => output.push_str(&done.buffer),
                }
            }
        }
    }
}

fn is_aromatic_idx(graph: &MolecularGraph, index: &GraphIndex, atom_idx: usize) -> bool {
    graph
        .atom(index.atoms[atom_idx])
        .is_some_and(|a| a.is_aromatic)
}

fn write_ring_number(num: usize, output: &mut String) {
    if num < 10 {
        output.push((b'0' + num as u8) as char);
    } else {
        output.push('%');
        output.push_str(&num.to_string());
    }
}

fn write_ring_bond_symbol(order: BondOrder, output: &mut String) {
    match order {
        BondOrder::Single | BondOrder::Aromatic => {}
        BondOrder::Double => output.push('='),
        BondOrder::Triple => output.push('#'),
    }
}

fn write_bond_symbol(order: BondOrder, aromatic_context: bool, output: &mut String) {
    match order {
        BondOrder::Single => {
            // Between two aromatic atoms the implicit bond would read as
            // aromatic, so a true single bond must be spelled out.
            if aromatic_context {
                output.push('-');
            }
        }
        BondOrder::Double => output.push('='),
        BondOrder::Triple => output.push('#'),
        BondOrder::Aromatic => {
            if !aromatic_context {
                output.push(':');
            }
        }
    }
}

fn write_atom(graph: &MolecularGraph, index: &GraphIndex, atom_idx: usize, output: &mut String) {
    let atom = graph
        .atom(index.atoms[atom_idx])
        .expect("indexed atom exists");

    let h_count = atom.explicit_hydrogens.unwrap_or(0);
    let needs_bracket = atom.formal_charge != 0
        || !is_organic_subset(atom.atomic_number, atom.is_aromatic)
        || (atom.is_aromatic && atom.is_heteroatom() && h_count > 0);

    let symbol = element::by_number(atom.atomic_number)
        .map(|e| e.symbol)
        .unwrap_or("*");

    if needs_bracket {
        output.push('[');
        push_symbol(symbol, atom.is_aromatic, output);
        if h_count > 0 {
            output.push('H');
            if h_count > 1 {
                output.push_str(&h_count.to_string());
            }
        }
        if atom.formal_charge > 0 {
            output.push('+');
            if atom.formal_charge > 1 {
                output.push_str(&atom.formal_charge.to_string());
            }
        } else if atom.formal_charge < 0 {
            output.push('-');
            if atom.formal_charge < -1 {
                output.push_str(&atom.formal_charge.abs().to_string());
            }
        }
        output.push(']');
    } else {
        push_symbol(symbol, atom.is_aromatic, output);
    }
}

fn push_symbol(symbol: &str, aromatic: bool, output: &mut String) {
    if aromatic {
        for c in symbol.chars() {
            output.push(c.to_ascii_lowercase());
        }
    } else {
        output.push_str(symbol);
    }
}

fn is_organic_subset(atomic_number: u8, is_aromatic: bool) -> bool {
    if is_aromatic {
        matches!(atomic_number, 5 | 6 | 7 | 8 | 15 | 16)
    } else {
        matches!(atomic_number, 5 | 6 | 7 | 8 | 9 | 15 | 16 | 17 | 35 | 53)
    }
}
