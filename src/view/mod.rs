use eframe::egui::{Pos2, Rect, Vec2};
use tracing::trace;

use crate::graph::{Graph, NodeIndex};
use crate::layout::Layout;

mod interaction;
mod observer;
mod transform;

pub use interaction::{
    EGO_PULSE_GROWTH, EMPHASIS_RADIUS_DELTA, Interaction, NodeDrag, draw_order, drawn_radius,
};
pub use observer::{GraphEvent, GraphObserver};
pub use transform::Transform;

use interaction::Press;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub zoom_in_step: f32,
    pub zoom_out_step: f32,
    /// Extra screen pixels around a node that still count as a hit.
    pub hit_slop: f32,
    /// Exponential approach rate of the focus animation, per second.
    pub focus_rate: f32,
    /// Offset distance (px) under which the animation snaps to its target.
    pub snap_epsilon: f32,
    /// Pointer travel (px) after which a press is a drag rather than a click.
    pub click_slop: f32,
    pub scroll_sensitivity: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 3.0,
            zoom_in_step: 1.2,
            zoom_out_step: 0.8,
            hit_slop: 8.0,
            focus_rate: 8.0,
            snap_epsilon: 0.5,
            click_slop: 4.0,
            scroll_sensitivity: 0.0018,
        }
    }
}

/// Pan/zoom state, hit-testing and pointer handling for one canvas.
///
/// Screen coordinates are relative to the surface's top-left corner.
#[derive(Clone, Debug)]
pub struct ViewportController {
    config: ViewportConfig,
    transform: Transform,
    target: Option<Transform>,
    size: Vec2,
    interaction: Interaction,
    pointer: Option<Pos2>,
    press: Option<Press>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl ViewportController {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            transform: Transform::IDENTITY,
            target: None,
            size: Vec2::ZERO,
            interaction: Interaction::default(),
            pointer: None,
            press: None,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut Interaction {
        &mut self.interaction
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn center(&self) -> Pos2 {
        Pos2::ZERO + (self.size * 0.5)
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    pub fn set_size(&mut self, size: Vec2) {
        if size != self.size {
            trace!(width = size.x, height = size.y, "viewport resized");
            self.size = size;
        }
    }

    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        self.transform.world_to_screen(self.center(), world)
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        self.transform.screen_to_world(self.center(), screen)
    }

    /// Drops any pending focus animation, leaving the transform where it is.
    pub fn cancel_animation(&mut self) {
        self.target = None;
    }

    fn set_transform(&mut self, transform: Transform, observer: &mut dyn GraphObserver) {
        self.target = None;
        if transform != self.transform {
            self.transform = transform;
            observer.viewport_changed(transform);
        }
    }

    pub fn pan(&mut self, delta: Vec2, observer: &mut dyn GraphObserver) {
        let mut transform = self.transform;
        transform.offset += delta;
        self.set_transform(transform, observer);
    }

    /// Zooms by `factor` keeping the world point under `anchor` in place.
    pub fn zoom(&mut self, factor: f32, anchor: Pos2, observer: &mut dyn GraphObserver) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let transform = self.transform.zoomed_at(
            self.center(),
            anchor,
            factor,
            self.config.min_scale,
            self.config.max_scale,
        );
        self.set_transform(transform, observer);
    }

    pub fn zoom_in(&mut self, observer: &mut dyn GraphObserver) {
        self.zoom(self.config.zoom_in_step, self.center(), observer);
    }

    pub fn zoom_out(&mut self, observer: &mut dyn GraphObserver) {
        self.zoom(self.config.zoom_out_step, self.center(), observer);
    }

    pub fn reset(&mut self, observer: &mut dyn GraphObserver) {
        self.set_transform(Transform::IDENTITY, observer);
    }

    /// Scale and offset that fit `bounds` (world space) inside the surface.
    pub fn fit(&mut self, bounds: Rect, margin: f32, observer: &mut dyn GraphObserver) {
        let available = (self.size - Vec2::splat(margin * 2.0)).max(Vec2::splat(1.0));
        let extent = bounds.size().max(Vec2::splat(1.0));
        let scale = (available.x / extent.x)
            .min(available.y / extent.y)
            .clamp(self.config.min_scale, self.config.max_scale);
        self.set_transform(Transform::centered_on(bounds.center().to_vec2(), scale), observer);
    }

    /// Topmost node under `screen`, honouring paint order. Nodes are as large
    /// as they are ever drawn, ego pulse peak included.
    pub fn hit_test(&self, screen: Pos2, graph: &Graph, layout: &Layout) -> Option<NodeIndex> {
        draw_order(graph, &self.interaction)
            .into_iter()
            .rev()
            .find(|&index| {
                let (Some(world), Some(node)) = (layout.position(index), graph.node(index)) else {
                    return false;
                };
                let radius = drawn_radius(layout, index, node, &self.interaction, 1.0);
                let reach = radius * self.transform.scale + self.config.hit_slop;
                self.world_to_screen(world).distance(screen) <= reach
            })
    }

    /// Starts easing toward `index` at the current scale and marks it focused.
    pub fn focus_on(&mut self, index: NodeIndex, layout: &Layout) {
        let Some(world) = layout.position(index) else {
            return;
        };
        self.interaction.focused = Some(index);
        self.interaction.selected = Some(index);
        self.target = Some(Transform::centered_on(world, self.transform.scale));
    }

    /// Advances the focus animation by `dt` seconds. Returns whether it is
    /// still running.
    pub fn advance(&mut self, dt: f32, observer: &mut dyn GraphObserver) -> bool {
        let Some(target) = self.target else {
            return false;
        };

        let t = 1.0 - (-self.config.focus_rate * dt.max(0.0)).exp();
        let next = self.transform.lerp(target, t);
        if next.close_to(target, self.config.snap_epsilon) {
            self.transform = target;
            self.target = None;
        } else {
            self.transform = next;
        }
        observer.viewport_changed(self.transform);
        self.target.is_some()
    }

    pub fn pointer_moved(
        &mut self,
        screen: Pos2,
        graph: &Graph,
        layout: &Layout,
        observer: &mut dyn GraphObserver,
    ) {
        self.pointer = Some(screen);
        if self.interaction.drag.is_some() || self.interaction.panning {
            return;
        }

        let hovered = self.hit_test(screen, graph, layout);
        if hovered != self.interaction.hovered {
            self.interaction.hovered = hovered;
            observer.node_hovered(hovered);
        }
    }

    pub fn pointer_left(&mut self, observer: &mut dyn GraphObserver) {
        self.pointer = None;
        if self.interaction.hovered.take().is_some() {
            observer.node_hovered(None);
        }
    }

    /// Grabs the node under the pointer, or starts a background pan.
    pub fn pointer_pressed(&mut self, screen: Pos2, graph: &Graph, layout: &Layout) {
        self.pointer = Some(screen);
        self.press = Some(Press {
            origin: screen,
            moved: false,
        });

        match self.hit_test(screen, graph, layout) {
            Some(index) => {
                let world = layout.position(index).unwrap_or_default();
                self.interaction.drag = Some(NodeDrag {
                    index,
                    grab_offset: world - self.screen_to_world(screen),
                });
            }
            None => self.interaction.panning = true,
        }
    }

    pub fn pointer_dragged(
        &mut self,
        screen: Pos2,
        layout: &mut Layout,
        observer: &mut dyn GraphObserver,
    ) {
        let previous = self.pointer.unwrap_or(screen);
        self.pointer = Some(screen);

        let Some(press) = self.press.as_mut() else {
            return;
        };
        if !press.moved && press.origin.distance(screen) <= self.config.click_slop {
            return;
        }
        press.moved = true;

        if let Some(drag) = self.interaction.drag {
            layout.place(drag.index, self.screen_to_world(screen) + drag.grab_offset);
        } else if self.interaction.panning {
            self.pan(screen - previous, observer);
        }
    }

    /// Ends a drag or pan; a press that never moved counts as a click.
    pub fn pointer_released(
        &mut self,
        screen: Pos2,
        graph: &Graph,
        layout: &mut Layout,
        observer: &mut dyn GraphObserver,
    ) {
        let press = self.press.take();
        if let Some(drag) = self.interaction.drag.take()
            && press.is_some_and(|press| press.moved)
        {
            layout.place(drag.index, self.screen_to_world(screen) + drag.grab_offset);
            trace!(node = drag.index, "node dropped");
        }
        self.interaction.panning = false;
        self.pointer = Some(screen);

        if press.is_some_and(|press| !press.moved) {
            self.clicked(screen, graph, layout, observer);
        }
    }

    /// Focuses and selects the node under `screen`; background clears focus.
    pub fn clicked(
        &mut self,
        screen: Pos2,
        graph: &Graph,
        layout: &Layout,
        observer: &mut dyn GraphObserver,
    ) {
        match self.hit_test(screen, graph, layout) {
            Some(index) => {
                self.focus_on(index, layout);
                if let Some(node) = graph.node(index) {
                    observer.node_selected(index, node);
                }
            }
            None => {
                self.interaction.clear_focus();
                observer.background_clicked();
            }
        }
    }

    pub fn scrolled(&mut self, delta: f32, anchor: Pos2, observer: &mut dyn GraphObserver) {
        if delta.abs() <= f32::EPSILON {
            return;
        }
        let factor = (1.0 + (delta * self.config.scroll_sensitivity)).clamp(0.85, 1.15);
        self.zoom(factor, anchor, observer);
    }
}
