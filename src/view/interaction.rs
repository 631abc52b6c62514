use std::collections::HashSet;

use eframe::egui::{Pos2, Vec2};

use crate::graph::{Graph, Node, NodeIndex};
use crate::layout::{Layout, LayoutMode};

/// World units added to hovered, focused and selected nodes.
pub const EMPHASIS_RADIUS_DELTA: f32 = 5.0;
/// Peak relative growth of the ego radius during a pulse.
pub const EGO_PULSE_GROWTH: f32 = 0.08;

/// A node being dragged by the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeDrag {
    pub index: NodeIndex,
    /// World offset from the pointer to the node center at grab time.
    pub grab_offset: Vec2,
}

/// Pointer press that has not been released yet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Press {
    pub origin: Pos2,
    pub moved: bool,
}

/// Per-view UI state, owned by the viewport and read by the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interaction {
    pub hovered: Option<NodeIndex>,
    pub focused: Option<NodeIndex>,
    pub selected: Option<NodeIndex>,
    /// Lowercased keyword whose holders stay lit while everything else dims.
    pub highlighted_keyword: Option<String>,
    pub drag: Option<NodeDrag>,
    pub panning: bool,
}

impl Interaction {
    pub fn set_highlighted_keyword(&mut self, keyword: Option<&str>) {
        self.highlighted_keyword = keyword
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty());
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
        self.selected = None;
    }

    /// Drops indices that no longer exist after a rebuild.
    pub fn retain_valid(&mut self, len: usize) {
        let keep = |index: Option<NodeIndex>| index.filter(|&index| index < len);
        self.hovered = keep(self.hovered);
        self.focused = keep(self.focused);
        self.selected = keep(self.selected);
        if self.drag.is_some_and(|drag| drag.index >= len) {
            self.drag = None;
        }
    }

    pub fn is_dimming(&self) -> bool {
        self.focused.is_some() || self.highlighted_keyword.is_some()
    }

    pub fn matches_keyword(&self, node: &Node) -> bool {
        self.highlighted_keyword.as_deref().is_some_and(|keyword| {
            node.keywords
                .iter()
                .any(|candidate| candidate.to_lowercase() == keyword)
        })
    }

    /// Nodes sharing any edge with the focused node.
    pub fn focus_neighbors(&self, graph: &Graph) -> HashSet<NodeIndex> {
        let Some(focused) = self.focused else {
            return HashSet::new();
        };
        graph
            .edges_of(focused)
            .filter_map(|edge| edge.other(focused))
            .collect()
    }

    pub fn is_emphasized(&self, index: NodeIndex) -> bool {
        self.hovered == Some(index) || self.focused == Some(index) || self.selected == Some(index)
    }
}

/// World radius a node is painted at. `pulse` is the ego pulse phase in `0..=1`.
pub fn drawn_radius(
    layout: &Layout,
    index: NodeIndex,
    node: &Node,
    interaction: &Interaction,
    pulse: f32,
) -> f32 {
    let mut radius = layout.radius(index);
    if layout.mode == LayoutMode::Radial && node.degree == Some(0) {
        radius *= 1.0 + EGO_PULSE_GROWTH * pulse.clamp(0.0, 1.0);
    }
    if interaction.is_emphasized(index) {
        radius += EMPHASIS_RADIUS_DELTA;
    }
    radius
}

/// Paint order: unrelated nodes, then the focus neighbourhood, then the focus.
pub fn draw_order(graph: &Graph, interaction: &Interaction) -> Vec<NodeIndex> {
    let neighbors = interaction.focus_neighbors(graph);
    let mut order = Vec::with_capacity(graph.len());

    order.extend(
        (0..graph.len())
            .filter(|index| Some(*index) != interaction.focused && !neighbors.contains(index)),
    );
    order.extend(
        (0..graph.len())
            .filter(|index| Some(*index) != interaction.focused && neighbors.contains(index)),
    );
    order.extend(interaction.focused.filter(|&index| index < graph.len()));
    order
}
