use std::time::Instant;

use eframe::egui::{Pos2, Rect, Vec2};
use tracing::debug;

use crate::graph::{Graph, Node, NodeIndex};
use crate::people::Category;

mod cluster;
mod quadtree;
mod radial;
mod relax;

pub use relax::{RelaxConfig, overlap_energy, relax};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Rings by degree around the ego.
    #[default]
    Radial,
    /// One disc per category (address-book view).
    Clusters,
}

impl LayoutMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Radial => "Network",
            Self::Clusters => "Contacts",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    pub base_radius: f32,
    pub ring_spacing: f32,
    /// Maximum radial offset applied per node from its id hash.
    pub ring_jitter: f32,
    /// Degree-1 nodes (in insertion order) that relaxation may not move.
    pub pinned_inner_circle: usize,
    pub cluster_distance: f32,
    pub cluster_population_spread: f32,
    pub nodes_per_ring: usize,
    pub relax: RelaxConfig,
    pub cluster_relax: RelaxConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_radius: 0.0,
            ring_spacing: 160.0,
            ring_jitter: 12.0,
            pinned_inner_circle: 8,
            cluster_distance: 320.0,
            cluster_population_spread: 12.0,
            nodes_per_ring: 10,
            relax: RelaxConfig::default(),
            cluster_relax: RelaxConfig {
                iterations: 25,
                ..RelaxConfig::default()
            },
        }
    }
}

impl LayoutConfig {
    pub fn ring_radius(&self, degree: u32) -> f32 {
        self.base_radius + degree as f32 * self.ring_spacing
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Ring(u32),
    Cluster(Category),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClusterInfo {
    pub category: Category,
    pub center: Vec2,
    pub radius: f32,
    pub members: Vec<NodeIndex>,
}

/// World-space placement for every node of one graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub mode: LayoutMode,
    pub positions: Vec<Vec2>,
    pub radii: Vec<f32>,
    pub slots: Vec<Slot>,
    pub pinned: Vec<bool>,
    pub clusters: Vec<ClusterInfo>,
}

impl Layout {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, index: NodeIndex) -> Option<Vec2> {
        self.positions.get(index).copied()
    }

    pub fn radius(&self, index: NodeIndex) -> f32 {
        self.radii.get(index).copied().unwrap_or(0.0)
    }

    /// Moves a node and pins it there until the next recompute.
    pub fn place(&mut self, index: NodeIndex, position: Vec2) {
        if let Some(slot) = self.positions.get_mut(index) {
            *slot = position;
            if let Some(pinned) = self.pinned.get_mut(index) {
                *pinned = true;
            }
        }
    }

    pub fn cluster_of(&self, index: NodeIndex) -> Option<&ClusterInfo> {
        match self.slots.get(index)? {
            Slot::Cluster(category) => self
                .clusters
                .iter()
                .find(|cluster| cluster.category == *category),
            Slot::Ring(_) => None,
        }
    }

    /// World-space box around every node and cluster disc.
    pub fn bounds(&self) -> Option<Rect> {
        let mut rect: Option<Rect> = None;
        let mut include = |center: Vec2, radius: f32| {
            let disc = Rect::from_center_size(Pos2::ZERO + center, Vec2::splat(radius * 2.0));
            rect = Some(rect.map_or(disc, |bounds| bounds.union(disc)));
        };

        for (index, &position) in self.positions.iter().enumerate() {
            include(position, self.radius(index));
        }
        for cluster in &self.clusters {
            include(cluster.center, cluster.radius);
        }
        rect
    }
}

/// Base radius before hover/focus deltas.
pub fn node_radius(node: &Node, mode: LayoutMode) -> f32 {
    match mode {
        LayoutMode::Radial => match node.degree {
            Some(0) => 30.0,
            Some(1) => 20.0,
            _ => 15.0,
        },
        LayoutMode::Clusters if node.is_hub => 8.0 + node.hub_score.min(4) as f32,
        LayoutMode::Clusters => 5.0,
    }
}

pub fn compute(graph: &Graph, mode: LayoutMode, config: &LayoutConfig) -> Layout {
    if graph.is_empty() {
        return Layout {
            mode,
            ..Layout::default()
        };
    }

    let started = Instant::now();
    let radii = graph
        .nodes()
        .iter()
        .map(|node| node_radius(node, mode))
        .collect::<Vec<_>>();

    let layout = match mode {
        LayoutMode::Radial => {
            let placement = radial::place(graph, &radii, config);
            Layout {
                mode,
                positions: placement.positions,
                radii,
                slots: placement.slots,
                pinned: placement.pinned,
                clusters: Vec::new(),
            }
        }
        LayoutMode::Clusters => {
            let placement = cluster::place(graph, &radii, config);
            Layout {
                mode,
                positions: placement.positions,
                pinned: vec![false; radii.len()],
                radii,
                slots: placement.slots,
                clusters: placement.clusters,
            }
        }
    };

    debug!(
        mode = mode.label(),
        nodes = layout.len(),
        clusters = layout.clusters.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "computed layout"
    );
    layout
}
