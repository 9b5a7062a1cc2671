use egui::emath::TSTransform;
use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Shape, Stroke};

use super::{DrawSurface, SurfaceFactory};

/// Surface that records `egui` shapes in world space
///
/// Shapes are painted through a [`TSTransform`] so the same recording can be
/// shown at any camera offset and zoom without being rebuilt.
#[derive(Debug, Clone)]
pub struct ShapeSurface {
    label: String,
    shapes: Vec<Shape>,
    visible: bool,
    destroyed: bool,
}

impl ShapeSurface {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            shapes: Vec::new(),
            visible: true,
            destroyed: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn push(&mut self, shape: Shape) {
        if !self.destroyed {
            self.shapes.push(shape);
        }
    }

    /// Paint with `world_to_screen`; hidden or destroyed surfaces paint nothing
    pub fn paint(&self, painter: &Painter, world_to_screen: TSTransform) {
        if !self.visible || self.destroyed {
            return;
        }
        painter.extend(self.shapes.iter().cloned().map(|mut shape| {
            shape.transform(world_to_screen);
            shape
        }));
    }
}

impl DrawSurface for ShapeSurface {
    fn fill_polygon(&mut self, points: &[Pos2], color: Color32) {
        if points.len() < 3 {
            return;
        }
        self.push(Shape::convex_polygon(points.to_vec(), color, Stroke::NONE));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.push(Shape::rect_filled(rect, CornerRadius::ZERO, color));
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color32) {
        let radius = CornerRadius::same(radius.round().clamp(0.0, 255.0) as u8);
        self.push(Shape::rect_filled(rect, radius, color));
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.push(Shape::circle_filled(center, radius, color));
    }

    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        self.push(Shape::line_segment([from, to], Stroke::new(width, color)));
    }

    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible && !self.destroyed
    }

    fn destroy(&mut self) {
        self.shapes = Vec::new();
        self.visible = false;
        self.destroyed = true;
    }
}

/// Creates [`ShapeSurface`]s and counts them
#[derive(Debug, Default)]
pub struct ShapeSurfaceFactory {
    created: usize,
}

impl ShapeSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.created
    }
}

impl SurfaceFactory for ShapeSurfaceFactory {
    type Surface = ShapeSurface;

    fn create_surface(&mut self, label: &str) -> ShapeSurface {
        self.created += 1;
        ShapeSurface::new(label)
    }
}
