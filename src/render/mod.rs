use std::collections::HashSet;
use std::f32::consts::TAU;

use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2, vec2};

use crate::graph::{Edge, Graph, Node, NodeIndex};
use crate::layout::{Layout, LayoutMode, Slot};
use crate::people::RelationKind;
use crate::util::{initial_letter, truncate_label};
use crate::view::{Interaction, Transform, ViewportController, draw_order, drawn_radius};

#[cfg(test)]
mod recorder;
pub mod style;
mod surface;

pub use surface::{LineStyle, PainterSurface, Surface, circle_points};

const FLOW_SPEED: f32 = 30.0;
const FLOW_DASH: f32 = 3.0;
const FLOW_GAP: f32 = 12.0;
const PULSE_HZ: f32 = 0.8;
const GLOW_RINGS: usize = 4;
const MIN_INITIAL_RADIUS: f32 = 8.0;

/// Time input for cosmetic animation; everything drawn is a pure function of it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    pub elapsed: f32,
}

impl FrameClock {
    pub fn at(elapsed: f32) -> Self {
        Self { elapsed }
    }

    /// Offset into the flow dash pattern for edges near the focus.
    pub fn dash_offset(self) -> f32 {
        (self.elapsed * FLOW_SPEED).rem_euclid(FLOW_DASH + FLOW_GAP)
    }

    /// Smooth 0..=1 wave driving the ego pulse.
    pub fn pulse(self) -> f32 {
        0.5 + 0.5 * (self.elapsed * TAU * PULSE_HZ).sin()
    }
}

pub struct Frame<'a> {
    pub graph: &'a Graph,
    pub layout: &'a Layout,
    pub viewport: &'a ViewportController,
    pub clock: FrameClock,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub show_grid: bool,
    /// Control-point offset of cross-cluster curves, relative to their length.
    pub curve_bend: f32,
    pub curve_segments: usize,
    /// Gap between a node's rim and its label center.
    pub label_gap: f32,
    pub empty_message: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_grid: true,
            curve_bend: 0.15,
            curve_segments: 16,
            label_gap: 16.0,
            empty_message: "No connections to show yet".to_owned(),
        }
    }
}

/// Per-frame derived state shared by the passes.
struct FrameState<'a> {
    graph: &'a Graph,
    layout: &'a Layout,
    interaction: &'a Interaction,
    clock: FrameClock,
    focus_neighbors: HashSet<NodeIndex>,
    hover_neighbors: HashSet<NodeIndex>,
    order: Vec<NodeIndex>,
}

impl<'a> FrameState<'a> {
    fn new(frame: &Frame<'a>) -> Self {
        let interaction = frame.viewport.interaction();
        let hover_neighbors: HashSet<NodeIndex> = interaction
            .hovered
            .map(|hovered| {
                frame
                    .graph
                    .edges_of(hovered)
                    .filter_map(|edge| edge.other(hovered))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            graph: frame.graph,
            layout: frame.layout,
            interaction,
            clock: frame.clock,
            focus_neighbors: interaction.focus_neighbors(frame.graph),
            hover_neighbors,
            order: draw_order(frame.graph, interaction),
        }
    }

    fn center(&self, index: NodeIndex) -> Option<Pos2> {
        self.layout.position(index).map(|position| Pos2::ZERO + position)
    }

    fn is_active_edge(&self, edge: &Edge) -> bool {
        [self.interaction.focused, self.interaction.hovered]
            .into_iter()
            .flatten()
            .any(|index| edge.touches(index))
    }

    fn is_lit(&self, index: NodeIndex, node: &Node) -> bool {
        !self.interaction.is_dimming()
            || self.interaction.is_emphasized(index)
            || self.focus_neighbors.contains(&index)
            || self.interaction.matches_keyword(node)
    }

    fn is_ego(&self, node: &Node) -> bool {
        self.layout.mode == LayoutMode::Radial && node.degree == Some(0)
    }

    fn wants_label(&self, index: NodeIndex) -> bool {
        self.interaction.hovered == Some(index)
            || self.interaction.focused == Some(index)
            || self.focus_neighbors.contains(&index)
    }
}

/// Stateless painter for one graph view.
#[derive(Clone, Debug, Default)]
pub struct RenderEngine {
    config: RenderConfig,
}

impl RenderEngine {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn draw(&self, surface: &mut dyn Surface, frame: &Frame<'_>) {
        let size = surface.size();
        surface.fill_rect(Rect::from_min_size(Pos2::ZERO, size), 0.0, style::BACKGROUND);
        if self.config.show_grid {
            draw_grid(surface, frame.viewport.transform());
        }

        if frame.graph.is_empty() || frame.layout.is_empty() {
            surface.text(
                Pos2::ZERO + size * 0.5,
                Align2::CENTER_CENTER,
                &self.config.empty_message,
                14.0,
                style::MUTED_TEXT,
            );
            return;
        }

        let state = FrameState::new(frame);
        surface.save();
        surface.set_transform(frame.viewport.transform());

        if state.layout.mode == LayoutMode::Clusters {
            self.draw_clusters(surface, &state);
        }
        self.draw_edges(surface, &state);
        self.draw_nodes(surface, &state);
        self.draw_labels(surface, &state);

        surface.restore();
    }

    fn draw_clusters(&self, surface: &mut dyn Surface, state: &FrameState<'_>) {
        for cluster in &state.layout.clusters {
            let center = Pos2::ZERO + cluster.center;
            let color = style::category_color(cluster.category);

            surface.fill_circle(center, cluster.radius * 1.3, style::with_alpha(color, 0.04));
            surface.fill_circle(center, cluster.radius, style::with_alpha(color, 0.08));
            surface.stroke_circle(
                center,
                cluster.radius,
                Stroke::new(1.0, style::with_alpha(color, 0.35)),
                LineStyle::Dashed {
                    dash: 4.0,
                    gap: 4.0,
                    offset: 0.0,
                },
            );

            draw_pill(
                surface,
                center - vec2(0.0, cluster.radius + 16.0),
                cluster.category.label(),
                12.0,
                color,
            );
            draw_pill(
                surface,
                center + vec2(0.0, cluster.radius + 14.0),
                &cluster.members.len().to_string(),
                10.0,
                style::MUTED_TEXT,
            );
        }
    }

    fn draw_edges(&self, surface: &mut dyn Surface, state: &FrameState<'_>) {
        let mut active = Vec::new();
        for edge in state.graph.edges() {
            if state.is_active_edge(edge) {
                active.push(edge);
            } else {
                self.draw_edge(surface, state, edge, false);
            }
        }

        for edge in active {
            self.draw_edge(surface, state, edge, true);
        }
    }

    fn draw_edge(&self, surface: &mut dyn Surface, state: &FrameState<'_>, edge: &Edge, active: bool) {
        let (Some(from), Some(to)) = (state.center(edge.a), state.center(edge.b)) else {
            return;
        };

        let path = if self.crosses_clusters(state, edge) {
            quadratic_curve(from, to, self.config.curve_bend, self.config.curve_segments)
        } else {
            vec![from, to]
        };

        let base = style::edge_color(edge.kind);
        let (width, color) = if active {
            (2.5, base)
        } else if state.interaction.is_dimming() {
            (1.0, style::with_alpha(base, 0.1))
        } else if edge.kind.is_derived() {
            (1.0, style::with_alpha(base, 0.3))
        } else {
            (1.0, style::with_alpha(base, 0.4))
        };

        let line = match style::edge_dashes(edge.kind) {
            Some((dash, gap)) => LineStyle::Dashed {
                dash,
                gap,
                offset: 0.0,
            },
            None => LineStyle::Solid,
        };
        surface.stroke_path(&path, Stroke::new(width, color), line);

        if active {
            surface.stroke_path(
                &path,
                Stroke::new(1.5, style::FLOW),
                LineStyle::Dashed {
                    dash: FLOW_DASH,
                    gap: FLOW_GAP,
                    offset: state.clock.dash_offset(),
                },
            );
        }
    }

    fn crosses_clusters(&self, state: &FrameState<'_>, edge: &Edge) -> bool {
        if edge.kind != RelationKind::SharedAffiliation {
            return false;
        }
        matches!(
            (state.layout.slots.get(edge.a), state.layout.slots.get(edge.b)),
            (Some(Slot::Cluster(a)), Some(Slot::Cluster(b))) if a != b
        )
    }

    fn display_radius(&self, state: &FrameState<'_>, index: NodeIndex, node: &Node) -> f32 {
        drawn_radius(state.layout, index, node, state.interaction, state.clock.pulse())
    }

    fn draw_nodes(&self, surface: &mut dyn Surface, state: &FrameState<'_>) {
        let clusters = state.layout.mode == LayoutMode::Clusters;

        for &index in &state.order {
            let (Some(node), Some(center)) = (state.graph.node(index), state.center(index)) else {
                continue;
            };

            let radius = self.display_radius(state, index, node);
            let emphasized = state.interaction.is_emphasized(index);
            let focused = state.interaction.focused == Some(index);
            let hovered = state.interaction.hovered == Some(index);
            let hub = clusters && node.is_hub;

            let base = if clusters {
                style::category_color(node.category)
            } else {
                style::degree_color(node.degree)
            };
            let mut fill = if focused {
                style::blend_color(base, style::FOCUS, 0.5)
            } else if state.interaction.matches_keyword(node) {
                style::blend_color(base, style::HUB, 0.4)
            } else {
                base
            };
            let lit = state.is_lit(index, node);
            if !lit {
                fill = style::dim_color(fill, style::DIM_FACTOR);
            }

            if lit && (emphasized || state.is_ego(node) || hub) {
                let glow = if focused || hub { style::FOCUS } else { base };
                draw_glow(surface, center, radius, glow);
            }

            surface.fill_circle(center, radius, fill);

            let border = if focused {
                Stroke::new(3.0, style::FOCUS)
            } else if hovered {
                Stroke::new(2.0, Color32::WHITE)
            } else if hub {
                Stroke::new(1.5, style::HUB)
            } else {
                Stroke::new(1.0, style::NODE_BORDER)
            };
            surface.stroke_circle(center, radius, border, LineStyle::Solid);

            if node.photo_ref.is_none() && radius >= MIN_INITIAL_RADIUS {
                let color = if lit {
                    style::LABEL_TEXT
                } else {
                    style::dim_color(style::MUTED_TEXT, style::DIM_FACTOR)
                };
                surface.text(
                    center,
                    Align2::CENTER_CENTER,
                    &initial_letter(&node.name),
                    radius * 0.9,
                    color,
                );
            }
        }
    }

    fn draw_labels(&self, surface: &mut dyn Surface, state: &FrameState<'_>) {
        for &index in &state.order {
            if !state.wants_label(index) {
                continue;
            }
            let (Some(node), Some(center)) = (state.graph.node(index), state.center(index)) else {
                continue;
            };

            let radius = self.display_radius(state, index, node);
            let label = truncate_label(&node.name);
            let anchor = center + vec2(0.0, radius + self.config.label_gap);
            let text_size = surface.measure_text(&label, style::LABEL_FONT_SIZE);
            surface.fill_rect(
                Rect::from_center_size(anchor, text_size + vec2(8.0, 4.0)),
                4.0,
                style::LABEL_BACKING,
            );

            let color = if state.hover_neighbors.contains(&index) {
                style::HUB
            } else {
                style::LABEL_TEXT
            };
            surface.text(anchor, Align2::CENTER_CENTER, &label, style::LABEL_FONT_SIZE, color);
        }
    }
}

fn draw_grid(surface: &mut dyn Surface, transform: Transform) {
    let size = surface.size();
    let step = (56.0 * transform.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = Pos2::ZERO + size * 0.5 + transform.offset;
    let stroke = Stroke::new(1.0, style::GRID);

    let mut x = origin.x.rem_euclid(step);
    while x < size.x {
        surface.stroke_path(&[Pos2::new(x, 0.0), Pos2::new(x, size.y)], stroke, LineStyle::Solid);
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < size.y {
        surface.stroke_path(&[Pos2::new(0.0, y), Pos2::new(size.x, y)], stroke, LineStyle::Solid);
        y += step;
    }
}

/// Soft halo approximated by stacked translucent discs.
fn draw_glow(surface: &mut dyn Surface, center: Pos2, radius: f32, color: Color32) {
    let reach = radius * (style::GLOW_REACH - 1.0);
    for ring in (1..=GLOW_RINGS).rev() {
        let t = ring as f32 / GLOW_RINGS as f32;
        surface.fill_circle(
            center,
            radius + reach * t,
            style::with_alpha(color, 0.04 + 0.1 * (1.0 - t)),
        );
    }
}

fn draw_pill(surface: &mut dyn Surface, center: Pos2, text: &str, size: f32, color: Color32) {
    let text_size = surface.measure_text(text, size);
    let pill = Rect::from_center_size(center, text_size + vec2(12.0, 6.0));
    surface.fill_rect(pill, pill.height() * 0.5, Color32::from_rgba_premultiplied(12, 15, 21, 230));
    surface.text(center, Align2::CENTER_CENTER, text, size, color);
}

/// Samples the bowed curve used for cross-cluster edges.
fn quadratic_curve(from: Pos2, to: Pos2, bend: f32, segments: usize) -> Vec<Pos2> {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON || segments < 2 {
        return vec![from, to];
    }

    let normal = Vec2::new(-delta.y, delta.x) / length;
    let control = from + delta * 0.5 + normal * (length * bend);

    (0..=segments)
        .map(|step| {
            let t = step as f32 / segments as f32;
            let inverse = 1.0 - t;
            Pos2::ZERO
                + from.to_vec2() * (inverse * inverse)
                + control.to_vec2() * (2.0 * inverse * t)
                + to.to_vec2() * (t * t)
        })
        .collect()
}
