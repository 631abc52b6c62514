use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Vec2, vec2};
use tracing::warn;

use crate::graph::{Graph, NodeIndex};
use crate::util::stable_pair;

use super::{LayoutConfig, Slot, relax};

pub(super) struct Placement {
    pub positions: Vec<Vec2>,
    pub slots: Vec<Slot>,
    pub pinned: Vec<bool>,
}

/// Concentric rings by degree around the ego at the origin.
pub(super) fn place(graph: &Graph, radii: &[f32], config: &LayoutConfig) -> Placement {
    let outermost = graph.nodes().iter().filter_map(|node| node.degree).max().unwrap_or(0);
    let fallback_ring = outermost + 1;

    let mut rings: BTreeMap<u32, Vec<NodeIndex>> = BTreeMap::new();
    let mut missing = 0;
    for (index, node) in graph.nodes().iter().enumerate() {
        let ring = node.degree.unwrap_or_else(|| {
            missing += 1;
            fallback_ring
        });
        rings.entry(ring).or_default().push(index);
    }
    if missing > 0 {
        warn!(count = missing, ring = fallback_ring, "nodes without degree placed on outer ring");
    }

    let mut positions = vec![Vec2::ZERO; graph.len()];
    let mut slots = vec![Slot::Ring(fallback_ring); graph.len()];
    let mut pinned = vec![false; graph.len()];

    for (&ring, members) in &rings {
        let radius = config.ring_radius(ring);
        let count = members.len() as f32;

        for (position, &index) in members.iter().enumerate() {
            slots[index] = Slot::Ring(ring);

            if ring == 0 {
                // A second degree-0 node would be a data bug; let relaxation part them.
                pinned[index] = position == 0;
                continue;
            }

            let angle = (position as f32 / count) * TAU - FRAC_PI_2;
            let (jitter, _) = stable_pair(&graph.nodes()[index].id);
            let distance = radius + jitter * config.ring_jitter;
            positions[index] = vec2(angle.cos(), angle.sin()) * distance;
            pinned[index] = ring == 1 && position < config.pinned_inner_circle;
        }
    }

    let positions = relax(&positions, radii, &pinned, &config.relax);
    Placement {
        positions,
        slots,
        pinned,
    }
}
