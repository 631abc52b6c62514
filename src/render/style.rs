use eframe::egui::Color32;

use crate::people::{Category, RelationKind};

pub const BACKGROUND: Color32 = Color32::from_rgb(13, 17, 23);
pub const GRID: Color32 = Color32::from_rgba_premultiplied(23, 27, 32, 70);
pub const EGO: Color32 = Color32::from_rgb(0, 229, 255);
pub const FIRST_DEGREE: Color32 = Color32::from_rgb(124, 77, 255);
pub const FAR_DEGREE: Color32 = Color32::from_rgb(45, 55, 72);
pub const UNREACHED: Color32 = Color32::from_rgb(60, 64, 72);
pub const FOCUS: Color32 = Color32::from_rgb(255, 184, 0);
pub const HUB: Color32 = Color32::from_rgb(255, 215, 0);
pub const NODE_BORDER: Color32 = Color32::from_rgb(33, 38, 45);
pub const LABEL_TEXT: Color32 = Color32::from_rgb(255, 255, 255);
pub const LABEL_BACKING: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 191);
pub const FLOW: Color32 = Color32::from_rgba_premultiplied(153, 153, 153, 153);
pub const MUTED_TEXT: Color32 = Color32::from_rgb(139, 148, 158);

/// Glow halo reach as a multiple of the node radius.
pub const GLOW_REACH: f32 = 2.5;
pub const LABEL_FONT_SIZE: f32 = 12.0;
pub const DIM_FACTOR: f32 = 0.3;

pub fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let [r, g, b, _] = color.to_array();
    Color32::from_rgba_unmultiplied(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

pub fn degree_color(degree: Option<u32>) -> Color32 {
    match degree {
        Some(0) => EGO,
        Some(1) => FIRST_DEGREE,
        Some(_) => FAR_DEGREE,
        None => UNREACHED,
    }
}

pub fn category_color(category: Category) -> Color32 {
    match category {
        Category::Healthcare => Color32::from_rgb(255, 107, 107),
        Category::Investment => Color32::from_rgb(78, 205, 196),
        Category::Startup => Color32::from_rgb(69, 183, 209),
        Category::Legal => Color32::from_rgb(150, 206, 180),
        Category::Media => Color32::from_rgb(255, 234, 167),
        Category::Academia => Color32::from_rgb(221, 160, 221),
        Category::Government => Color32::from_rgb(152, 216, 200),
        Category::Corporate => Color32::from_rgb(247, 220, 111),
        Category::Uncategorized => Color32::from_rgb(149, 165, 166),
    }
}

pub fn edge_color(kind: RelationKind) -> Color32 {
    match kind {
        RelationKind::Direct => EGO,
        RelationKind::SharedAffiliation => HUB,
        RelationKind::SharedKeyword => FIRST_DEGREE,
    }
}

/// Dash and gap lengths for derived relations; `None` is a solid line.
pub fn edge_dashes(kind: RelationKind) -> Option<(f32, f32)> {
    match kind {
        RelationKind::Direct => None,
        RelationKind::SharedAffiliation => Some((4.0, 6.0)),
        RelationKind::SharedKeyword => Some((5.0, 5.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints_are_the_inputs() {
        assert_eq!(blend_color(EGO, FOCUS, 0.0), EGO);
        assert_eq!(blend_color(EGO, FOCUS, 1.0), FOCUS);
    }

    #[test]
    fn dimming_darkens_and_fades() {
        let dimmed = dim_color(FIRST_DEGREE, DIM_FACTOR);
        assert!(dimmed.r() < FIRST_DEGREE.r());
        assert!(dimmed.a() < FIRST_DEGREE.a());
    }

    #[test]
    fn only_direct_edges_are_solid() {
        assert!(edge_dashes(RelationKind::Direct).is_none());
        assert!(edge_dashes(RelationKind::SharedAffiliation).is_some());
        assert!(edge_dashes(RelationKind::SharedKeyword).is_some());
    }
}
