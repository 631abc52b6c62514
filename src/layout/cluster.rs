use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Vec2, vec2};
use tracing::warn;

use crate::graph::{Graph, NodeIndex};
use crate::people::Category;

use super::{ClusterInfo, LayoutConfig, Slot, relax};

pub(super) struct Placement {
    pub positions: Vec<Vec2>,
    pub slots: Vec<Slot>,
    pub clusters: Vec<ClusterInfo>,
}

/// One disc per populated category, arranged on a circle around the origin.
pub(super) fn place(graph: &Graph, radii: &[f32], config: &LayoutConfig) -> Placement {
    let categories = graph.categories();
    let mut positions = vec![Vec2::ZERO; graph.len()];
    let mut slots = vec![Slot::Cluster(Category::Uncategorized); graph.len()];
    let mut clusters = Vec::with_capacity(categories.len());

    let cluster_count = categories.len() as f32;
    for (cluster_index, &(category, count)) in categories.iter().enumerate() {
        if category == Category::Uncategorized {
            warn!(count, "people without a recognizable category");
        }

        let members = graph
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| node.category == category)
            .map(|(index, _)| index)
            .collect::<Vec<NodeIndex>>();

        let angle = (cluster_index as f32 / cluster_count) * TAU - FRAC_PI_2;
        let distance =
            config.cluster_distance + (count as f32).sqrt() * config.cluster_population_spread;
        let center = vec2(angle.cos(), angle.sin()) * distance;

        let per_ring = config.nodes_per_ring.max(1);
        let ring_count = members.len().div_ceil(per_ring);
        let radius = (ring_count as f32 * 22.0 + 50.0).max(70.0);

        let mut local = Vec::with_capacity(members.len());
        for member_index in 0..members.len() {
            let ring = member_index / per_ring;
            let in_ring = per_ring.min(members.len() - ring * per_ring) as f32;
            let slot_angle =
                ((member_index % per_ring) as f32 / in_ring) * TAU + ring as f32 * 0.3;
            let ring_radius = 25.0 + ring as f32 * 20.0;
            local.push(center + vec2(slot_angle.cos(), slot_angle.sin()) * ring_radius);
        }

        let local_radii = members.iter().map(|&index| radii[index]).collect::<Vec<_>>();
        let relaxed = relax(
            &local,
            &local_radii,
            &vec![false; members.len()],
            &config.cluster_relax,
        );

        for (&index, position) in members.iter().zip(relaxed) {
            positions[index] = position;
            slots[index] = Slot::Cluster(category);
        }

        clusters.push(ClusterInfo {
            category,
            center,
            radius,
            members,
        });
    }

    Placement {
        positions,
        slots,
        clusters,
    }
}
