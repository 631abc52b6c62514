use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2, vec2};

use crate::view::Transform;

use super::{LineStyle, Surface};

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Save,
    Restore,
    SetTransform(Transform),
    Rect {
        rect: Rect,
        color: Color32,
    },
    Circle {
        center: Pos2,
        radius: f32,
        color: Color32,
    },
    CircleStroke {
        center: Pos2,
        radius: f32,
        stroke: Stroke,
        style: LineStyle,
    },
    Path {
        points: Vec<Pos2>,
        stroke: Stroke,
        style: LineStyle,
    },
    Text {
        position: Pos2,
        text: String,
        size: f32,
        color: Color32,
    },
}

/// Surface that keeps every call so tests can inspect a frame.
pub struct Recorder {
    size: Vec2,
    pub commands: Vec<Command>,
}

impl Recorder {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    /// Commands issued while a world transform was active.
    fn in_world(&self) -> impl Iterator<Item = &Command> {
        let mut depth = 0usize;
        let mut world = false;
        self.commands.iter().filter(move |command| match command {
            Command::Save => {
                depth += 1;
                false
            }
            Command::Restore => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    world = false;
                }
                false
            }
            Command::SetTransform(_) => {
                world = true;
                false
            }
            _ => world,
        })
    }

    pub fn world_paths(&self) -> Vec<Vec<Pos2>> {
        self.in_world()
            .filter_map(|command| match command {
                Command::Path { points, .. } => Some(points.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn world_path_styles(&self) -> Vec<LineStyle> {
        self.in_world()
            .filter_map(|command| match command {
                Command::Path { style, .. } => Some(*style),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// World-space texts longer than a single initial.
    pub fn labels(&self) -> Vec<String> {
        self.in_world()
            .filter_map(|command| match command {
                Command::Text { text, .. } if text.chars().count() > 1 => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for Recorder {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn save(&mut self) {
        self.commands.push(Command::Save);
    }

    fn restore(&mut self) {
        self.commands.push(Command::Restore);
    }

    fn set_transform(&mut self, transform: Transform) {
        self.commands.push(Command::SetTransform(transform));
    }

    fn fill_rect(&mut self, rect: Rect, _corner_radius: f32, color: Color32) {
        self.commands.push(Command::Rect { rect, color });
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.commands.push(Command::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, stroke: Stroke, style: LineStyle) {
        self.commands.push(Command::CircleStroke {
            center,
            radius,
            stroke,
            style,
        });
    }

    fn stroke_path(&mut self, points: &[Pos2], stroke: Stroke, style: LineStyle) {
        self.commands.push(Command::Path {
            points: points.to_vec(),
            stroke,
            style,
        });
    }

    fn text(&mut self, position: Pos2, _align: Align2, text: &str, size: f32, color: Color32) {
        self.commands.push(Command::Text {
            position,
            text: text.to_owned(),
            size,
            color,
        });
    }

    fn measure_text(&self, text: &str, size: f32) -> Vec2 {
        vec2(text.chars().count() as f32 * size * 0.6, size)
    }
}
