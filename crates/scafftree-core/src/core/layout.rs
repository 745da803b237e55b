//! Deterministic 2-D coordinate assignment for depiction.
//!
//! This is a lightweight sketch layout, not a full structure diagram
//! generator: the largest ring of each component is drawn as a regular
//! polygon and the remaining atoms are grown outward breadth-first,
//! each placed one bond length from its parent in the most open
//! direction. The same graph always yields the same coordinates.

use crate::core::models::graph::MolecularGraph;
use crate::core::models::ids::AtomId;
use crate::core::perception;
use nalgebra::{Point2, Vector2};
use std::collections::VecDeque;
use std::f64::consts::PI;

const BOND_LENGTH: f64 = 1.5;
const COMPONENT_GAP: f64 = 3.0;

/// Assigns a position to every atom in the graph, overwriting any
/// existing coordinates.
pub fn assign_coordinates(graph: &mut MolecularGraph) {
    let perception = perception::perceive(graph);
    let mut components = graph.connected_components();
    for component in &mut components {
        component.sort_unstable();
    }
    components.sort_by_key(|c| c.first().copied());

    let mut x_offset = 0.0;
    for component in components {
        let width = layout_component(graph, &component, &perception, x_offset);
        x_offset += width + COMPONENT_GAP;
    }
}

fn layout_component(
    graph: &mut MolecularGraph,
    component: &[AtomId],
    perception: &perception::RingPerception,
    x_offset: f64,
) -> f64 {
    let mut placed: Vec<AtomId> = Vec::new();
    let mut queue: VecDeque<AtomId> = VecDeque::new();

    // Seed with the largest ring fully inside this component, drawn as
    // a regular polygon; acyclic components start from a single atom.
    let seed_ring = perception
        .rings
        .iter()
        .filter(|r| r.atoms.iter().all(|a| component.contains(a)))
        .max_by_key(|r| r.len());

    match seed_ring {
        Some(ring) => {
            let n = ring.len() as f64;
            let radius = BOND_LENGTH / (2.0 * (PI / n).sin());
            for (i, &atom_id) in ring.atoms.iter().enumerate() {
                let angle = 2.0 * PI * i as f64 / n;
                set_position(
                    graph,
                    atom_id,
                    Point2::new(x_offset + radius * angle.cos(), radius * angle.sin()),
                );
                placed.push(atom_id);
                queue.push_back(atom_id);
            }
        }
        None => {
            let first = component[0];
            set_position(graph, first, Point2::new(x_offset, 0.0));
            placed.push(first);
            queue.push_back(first);
        }
    }

    while let Some(current) = queue.pop_front() {
        let origin = position(graph, current);
        let mut neighbors = graph.neighbors(current).to_vec();
        neighbors.sort_unstable();

        for neighbor in neighbors {
            if placed.contains(&neighbor) {
                continue;
            }
            let direction = open_direction(graph, current, &placed);
            set_position(graph, neighbor, origin + direction * BOND_LENGTH);
            placed.push(neighbor);
            queue.push_back(neighbor);
        }
    }

    let min_x = placed
        .iter()
        .map(|&a| position(graph, a).x)
        .fold(f64::INFINITY, f64::min);
    let max_x = placed
        .iter()
        .map(|&a| position(graph, a).x)
        .fold(f64::NEG_INFINITY, f64::max);
    (max_x - min_x).max(0.0)
}

/// Picks the unit direction from `atom` farthest from its already
/// placed neighbors, probing twelve compass slots.
fn open_direction(graph: &MolecularGraph, atom: AtomId, placed: &[AtomId]) -> Vector2<f64> {
    let origin = position(graph, atom);
    let occupied: Vec<Vector2<f64>> = graph
        .neighbors(atom)
        .iter()
        .copied()
        .filter(|n| placed.contains(n))
        .map(|n| {
            let delta = position(graph, n) - origin;
            if delta.norm() > f64::EPSILON {
                delta.normalize()
            } else {
                Vector2::new(1.0, 0.0)
            }
        })
        .collect();

    let mut best = Vector2::new(1.0, 0.0);
    let mut best_score = f64::NEG_INFINITY;
    for slot in 0..12 {
        let angle = 2.0 * PI * slot as f64 / 12.0;
        let candidate = Vector2::new(angle.cos(), angle.sin());
        let score = occupied
            .iter()
            .map(|o| (candidate - o).norm())
            .fold(f64::INFINITY, f64::min);
        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }
    best
}

fn position(graph: &MolecularGraph, atom_id: AtomId) -> Point2<f64> {
    graph
        .atom(atom_id)
        .and_then(|a| a.position)
        .unwrap_or_else(|| Point2::new(0.0, 0.0))
}

fn set_position(graph: &mut MolecularGraph, atom_id: AtomId, point: Point2<f64>) {
    if let Some(atom) = graph.atom_mut(atom_id) {
        atom.position = Some(point);
    }
}
