use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use std::collections::{HashMap, HashSet, VecDeque};

/// A single ring from the smallest set of smallest rings, stored as a
/// closed walk of atom ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub atoms: Vec<AtomId>,
}

impl Ring {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains_atom(&self, atom_id: AtomId) -> bool {
        self.atoms.contains(&atom_id)
    }

    /// Consecutive atom pairs around the cycle, each normalized so the
    /// smaller id comes first.
    pub fn bonds(&self) -> Vec<(AtomId, AtomId)> {
        let n = self.atoms.len();
        (0..n)
            .map(|i| normalize_pair(self.atoms[i], self.atoms[(i + 1) % n]))
            .collect()
    }

    pub fn contains_bond(&self, a: AtomId, b: AtomId) -> bool {
        self.bonds().contains(&normalize_pair(a, b))
    }
}

/// Result of ring perception over one graph.
#[derive(Debug, Clone, Default)]
pub struct RingPerception {
    pub rings: Vec<Ring>,
    ring_atoms: HashSet<AtomId>,
    ring_bonds: HashSet<(AtomId, AtomId)>,
}

impl RingPerception {
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    pub fn is_ring_atom(&self, atom_id: AtomId) -> bool {
        self.ring_atoms.contains(&atom_id)
    }

    pub fn is_ring_bond(&self, a: AtomId, b: AtomId) -> bool {
        self.ring_bonds.contains(&normalize_pair(a, b))
    }

    pub fn rings_containing(&self, atom_id: AtomId) -> Vec<usize> {
        self.rings
            .iter()
            .enumerate()
            .filter(|(_, r)| r.contains_atom(atom_id))
            .map(|(i, _)| i)
            .collect()
    }

    /// Groups ring indices into assemblies of rings connected through
    /// shared atoms (fused, bridged or spiro).
    pub fn assemblies(&self) -> Vec<Vec<usize>> {
        let n = self.rings.len();
        let mut assigned = vec![false; n];
        let mut assemblies = Vec::new();

        for start in 0..n {
            if assigned[start] {
                continue;
            }
            let mut group = vec![start];
            assigned[start] = true;
            let mut frontier = vec![start];
            while let Some(current) = frontier.pop() {
                for other in 0..n {
                    if assigned[other] {
                        continue;
                    }
                    let shares_atom = self.rings[current]
                        .atoms
                        .iter()
                        .any(|a| self.rings[other].contains_atom(*a));
                    if shares_atom {
                        assigned[other] = true;
                        group.push(other);
                        frontier.push(other);
                    }
                }
            }
            group.sort_unstable();
            assemblies.push(group);
        }

        assemblies
    }

    /// Number of ring bonds shared by at least two rings in the given set.
    pub fn shared_bond_count(&self, ring_indices: &[usize]) -> usize {
        let mut counts: HashMap<(AtomId, AtomId), usize> = HashMap::new();
        for &idx in ring_indices {
            for pair in self.rings[idx].bonds() {
                *counts.entry(pair).or_insert(0) += 1;
            }
        }
        counts.values().filter(|&&c| c >= 2).count()
    }

    /// Fusion degree of a set of rings: shared ring bonds minus the
    /// bonds a simple fused chain of that many rings would share. Zero
    /// for isolated and ortho-fused systems, positive for bridged ones,
    /// negative for spiro-linked ones.
    pub fn fusion_delta(&self, ring_indices: &[usize]) -> i64 {
        if ring_indices.is_empty() {
            return 0;
        }
        self.shared_bond_count(ring_indices) as i64 - (ring_indices.len() as i64 - 1)
    }

    /// Fusion degree over every ring in the graph.
    pub fn total_fusion_delta(&self) -> i64 {
        let all: Vec<usize> = (0..self.rings.len()).collect();
        self.fusion_delta(&all)
    }
}

/// Finds the smallest set of smallest rings.
///
/// Terminal atoms are pruned until only cyclic cores remain, then each
/// surviving ring bond seeds a breadth-first search for the shortest
/// cycle through it. The result is trimmed to the expected ring count
/// (bonds - atoms + components).
pub fn perceive(graph: &MolecularGraph) -> RingPerception {
    let rings = find_sssr(graph);

    let mut ring_atoms = HashSet::new();
    let mut ring_bonds = HashSet::new();
    for ring in &rings {
        ring_atoms.extend(ring.atoms.iter().copied());
        ring_bonds.extend(ring.bonds());
    }

    RingPerception {
        rings,
        ring_atoms,
        ring_bonds,
    }
}

fn find_sssr(graph: &MolecularGraph) -> Vec<Ring> {
    if graph.atom_count() == 0 || graph.bond_count() == 0 {
        return Vec::new();
    }

    let num_components = graph.connected_components().len();
    let expected_rings =
        graph.bond_count() as isize - graph.atom_count() as isize + num_components as isize;
    if expected_rings <= 0 {
        return Vec::new();
    }

    let ring_atoms = find_ring_atoms(graph);
    if ring_atoms.is_empty() {
        return Vec::new();
    }

    let mut rings: Vec<Vec<AtomId>> = Vec::new();

    for (bond_idx, bond) in graph.bonds().iter().enumerate() {
        if !ring_atoms.contains(&bond.atom1_id) || !ring_atoms.contains(&bond.atom2_id) {
            continue;
        }

        if let Some(mut ring) =
            bfs_shortest_path(graph, bond.atom1_id, bond.atom2_id, bond_idx, &ring_atoms)
        {
            normalize_ring(&mut ring);
            if !rings.iter().any(|r| r == &ring) {
                rings.push(ring);
            }
        }
    }

    rings.sort_by_key(|r| r.len());
    if rings.len() > expected_rings as usize {
        rings.truncate(expected_rings as usize);
    }

    rings.into_iter().map(|atoms| Ring { atoms }).collect()
}

/// Ring atoms survive iterative pruning of degree <= 1 atoms.
fn find_ring_atoms(graph: &MolecularGraph) -> HashSet<AtomId> {
    let mut degree: HashMap<AtomId, usize> = graph
        .atom_ids()
        .into_iter()
        .map(|id| (id, graph.degree(id)))
        .collect();

    let mut queue: VecDeque<AtomId> = degree
        .iter()
        .filter(|&(_, &d)| d <= 1)
        .map(|(&id, _)| id)
        .collect();

    let mut removed: HashSet<AtomId> = HashSet::new();
    while let Some(atom_id) = queue.pop_front() {
        if !removed.insert(atom_id) {
            continue;
        }
        for &neighbor in graph.neighbors(atom_id) {
            if !removed.contains(&neighbor) {
                let d = degree.get_mut(&neighbor).expect("neighbor degree tracked");
                *d = d.saturating_sub(1);
                if *d <= 1 {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    graph
        .atom_ids()
        .into_iter()
        .filter(|id| !removed.contains(id))
        .collect()
}

/// BFS from `start` to `end` avoiding one bond, restricted to ring atoms.
fn bfs_shortest_path(
    graph: &MolecularGraph,
    start: AtomId,
    end: AtomId,
    excluded_bond: usize,
    ring_atoms: &HashSet<AtomId>,
) -> Option<Vec<AtomId>> {
    let excluded = &graph.bonds()[excluded_bond];
    let mut visited: HashSet<AtomId> = HashSet::new();
    let mut parent: HashMap<AtomId, AtomId> = HashMap::new();
    let mut queue = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == end {
            let mut path = Vec::new();
            let mut node = end;
            while node != start {
                path.push(node);
                node = parent[&node];
            }
            path.push(start);
            path.reverse();
            return Some(path);
        }

        for &neighbor in graph.neighbors(current) {
            let along_excluded = excluded.contains(current) && excluded.contains(neighbor);
            if along_excluded {
                continue;
            }
            if !visited.contains(&neighbor) && ring_atoms.contains(&neighbor) {
                visited.insert(neighbor);
                parent.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    None
}

/// Rotates the cycle to start at the smallest id and picks the direction
/// with the lexicographically smaller sequence, so the same ring found
/// from different seed bonds compares equal.
fn normalize_ring(ring: &mut Vec<AtomId>) {
    if ring.is_empty() {
        return;
    }

    let min_pos = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, v)| *v)
        .map(|(i, _)| i)
        .unwrap_or(0);
    ring.rotate_left(min_pos);

    let n = ring.len();
    if n > 2 && ring[n - 1] < ring[1] {
        ring[1..].reverse();
    }
}

fn normalize_pair(a: AtomId, b: AtomId) -> (AtomId, AtomId) {
    if a <= b { (a, b) } else { (b, a) }
}
