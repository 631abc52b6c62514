use std::f32::consts::TAU;

use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use crate::view::Transform;

const CIRCLE_SEGMENTS: usize = 48;
const MIN_READABLE_FONT: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineStyle {
    Solid,
    /// Dash pattern in current drawing units; `offset` shifts it along the path.
    Dashed { dash: f32, gap: f32, offset: f32 },
}

/// 2D drawing target for one frame.
///
/// Coordinates start out as surface pixels with the origin at the top-left.
/// `set_transform` switches to world units, scaling lengths, widths and font
/// sizes with the transform until the matching `restore`.
pub trait Surface {
    fn size(&self) -> Vec2;

    fn save(&mut self);

    fn restore(&mut self);

    fn set_transform(&mut self, transform: Transform);

    fn fill_rect(&mut self, rect: Rect, corner_radius: f32, color: Color32);

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32);

    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: Stroke, style: LineStyle);

    fn stroke_path(&mut self, points: &[Pos2], stroke: Stroke, style: LineStyle);

    fn text(&mut self, position: Pos2, align: Align2, text: &str, size: f32, color: Color32);

    fn measure_text(&self, text: &str, size: f32) -> Vec2;
}

pub fn circle_points(center: Pos2, radius: f32, segments: usize) -> Vec<Pos2> {
    (0..=segments)
        .map(|step| {
            let angle = step as f32 / segments as f32 * TAU;
            center + Vec2::angled(angle) * radius
        })
        .collect()
}

#[derive(Clone, Copy, Debug)]
struct Mapping {
    origin: Pos2,
    scale: f32,
}

impl Mapping {
    fn point(self, point: Pos2) -> Pos2 {
        self.origin + point.to_vec2() * self.scale
    }

    fn length(self, length: f32) -> f32 {
        length * self.scale
    }

    fn stroke(self, stroke: Stroke) -> Stroke {
        Stroke::new(self.length(stroke.width), stroke.color)
    }
}

/// [`Surface`] over an egui painter clipped to `rect`.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
    mapping: Mapping,
    stack: Vec<Mapping>,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self {
            painter,
            rect,
            mapping: Mapping {
                origin: rect.min,
                scale: 1.0,
            },
            stack: Vec::new(),
        }
    }

    fn stroke_mapped(&self, points: Vec<Pos2>, stroke: Stroke, style: LineStyle) {
        let stroke = self.mapping.stroke(stroke);
        match style {
            LineStyle::Solid => {
                self.painter.add(Shape::line(points, stroke));
            }
            LineStyle::Dashed { dash, gap, offset } => {
                self.painter.extend(Shape::dashed_line_with_offset(
                    &points,
                    stroke,
                    &[self.mapping.length(dash).max(0.5)],
                    &[self.mapping.length(gap).max(0.5)],
                    self.mapping.length(offset),
                ));
            }
        }
    }
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> Vec2 {
        self.rect.size()
    }

    fn save(&mut self) {
        self.stack.push(self.mapping);
    }

    fn restore(&mut self) {
        if let Some(mapping) = self.stack.pop() {
            self.mapping = mapping;
        }
    }

    fn set_transform(&mut self, transform: Transform) {
        self.mapping = Mapping {
            origin: self.rect.center() + transform.offset,
            scale: transform.scale,
        };
    }

    fn fill_rect(&mut self, rect: Rect, corner_radius: f32, color: Color32) {
        let mapped = Rect::from_min_max(self.mapping.point(rect.min), self.mapping.point(rect.max));
        self.painter
            .rect_filled(mapped, self.mapping.length(corner_radius), color);
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.painter.circle_filled(
            self.mapping.point(center),
            self.mapping.length(radius),
            color,
        );
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: Stroke, style: LineStyle) {
        match style {
            LineStyle::Solid => {
                self.painter.circle_stroke(
                    self.mapping.point(center),
                    self.mapping.length(radius),
                    self.mapping.stroke(stroke),
                );
            }
            LineStyle::Dashed { .. } => {
                let points = circle_points(center, radius, CIRCLE_SEGMENTS)
                    .into_iter()
                    .map(|point| self.mapping.point(point))
                    .collect();
                self.stroke_mapped(points, stroke, style);
            }
        }
    }

    fn stroke_path(&mut self, points: &[Pos2], stroke: Stroke, style: LineStyle) {
        if points.len() < 2 {
            return;
        }
        let points = points.iter().map(|&point| self.mapping.point(point)).collect();
        self.stroke_mapped(points, stroke, style);
    }

    fn text(&mut self, position: Pos2, align: Align2, text: &str, size: f32, color: Color32) {
        let size = self.mapping.length(size);
        if size < MIN_READABLE_FONT {
            return;
        }
        self.painter.text(
            self.mapping.point(position),
            align,
            text,
            FontId::proportional(size),
            color,
        );
    }

    fn measure_text(&self, text: &str, size: f32) -> Vec2 {
        self.painter
            .layout_no_wrap(text.to_owned(), FontId::proportional(size), Color32::WHITE)
            .size()
    }
}
