use eframe::egui::{Pos2, Vec2};

/// Pan/zoom mapping: `screen = center + offset + world * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub offset: Vec2,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn world_to_screen(&self, center: Pos2, world: Vec2) -> Pos2 {
        center + self.offset + (world * self.scale)
    }

    pub fn screen_to_world(&self, center: Pos2, screen: Pos2) -> Vec2 {
        (screen - center - self.offset) / self.scale
    }

    /// Rescales around `anchor` so the world point under it stays put.
    pub fn zoomed_at(self, center: Pos2, anchor: Pos2, factor: f32, min: f32, max: f32) -> Self {
        let world = self.screen_to_world(center, anchor);
        let scale = (self.scale * factor).clamp(min, max);
        Self {
            offset: anchor - center - (world * scale),
            scale,
        }
    }

    /// Transform that puts `world` at the surface center at `scale`.
    pub fn centered_on(world: Vec2, scale: f32) -> Self {
        Self {
            offset: -world * scale,
            scale,
        }
    }

    pub fn lerp(self, target: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            offset: self.offset + (target.offset - self.offset) * t,
            scale: self.scale + (target.scale - self.scale) * t,
        }
    }

    pub fn close_to(self, other: Self, epsilon: f32) -> bool {
        (self.offset - other.offset).length() <= epsilon
            && (self.scale - other.scale).abs() <= epsilon * 0.01
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn identity_maps_origin_to_center() {
        let center = pos2(400.0, 300.0);
        assert_eq!(Transform::IDENTITY.world_to_screen(center, Vec2::ZERO), center);
    }

    #[test]
    fn zoom_is_clamped() {
        let center = pos2(100.0, 100.0);
        let zoomed = Transform::IDENTITY.zoomed_at(center, center, 100.0, 0.2, 3.0);
        assert_eq!(zoomed.scale, 3.0);
        let zoomed = zoomed.zoomed_at(center, center, 0.0001, 0.2, 3.0);
        assert_eq!(zoomed.scale, 0.2);
    }

    #[test]
    fn centered_on_puts_point_at_center() {
        let center = pos2(320.0, 240.0);
        let transform = Transform::centered_on(vec2(80.0, -40.0), 1.5);
        let screen = transform.world_to_screen(center, vec2(80.0, -40.0));
        assert!((screen - center).length() < 1e-4);
    }

    proptest! {
        #[test]
        fn screen_world_round_trip(
            ox in -2_000.0f32..2_000.0,
            oy in -2_000.0f32..2_000.0,
            scale in 0.2f32..3.0,
            wx in -5_000.0f32..5_000.0,
            wy in -5_000.0f32..5_000.0,
        ) {
            let transform = Transform { offset: vec2(ox, oy), scale };
            let center = pos2(640.0, 360.0);
            let world = vec2(wx, wy);
            let back = transform.screen_to_world(center, transform.world_to_screen(center, world));
            prop_assert!((back - world).length() < 0.05, "{world:?} came back as {back:?}");
        }

        #[test]
        fn zoom_keeps_anchor_fixed(
            factor in 0.5f32..2.0,
            ax in 0.0f32..1280.0,
            ay in 0.0f32..720.0,
        ) {
            let center = pos2(640.0, 360.0);
            let anchor = pos2(ax, ay);
            let before = Transform { offset: vec2(30.0, -12.0), scale: 1.0 };
            let world = before.screen_to_world(center, anchor);
            let after = before.zoomed_at(center, anchor, factor, 0.2, 3.0);
            prop_assert!((after.world_to_screen(center, world) - anchor).length() < 0.05);
        }
    }
}
