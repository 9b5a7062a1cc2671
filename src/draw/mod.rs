//! Drawing collaborator boundary
//!
//! Terrain pre-renders into persistent surfaces, one per chunk plus one for
//! the ocean. Coordinates are world units; the surface owner maps them to the
//! screen.
//!
//! # Main types
//! - [`DrawSurface`][]: primitive draw calls plus visibility
//! - [`SurfaceFactory`][]: hands out fresh surfaces
//! - [`ShapeSurface`][]: records `egui::Shape`s and paints them with a transform

pub mod color;
mod shape_surface;

pub use shape_surface::{ShapeSurface, ShapeSurfaceFactory};

use egui::{Color32, Pos2, Rect};

/// Persistent drawable owned by one chunk (or the ocean)
pub trait DrawSurface {
    /// Convex polygon fill
    fn fill_polygon(&mut self, points: &[Pos2], color: Color32);

    fn fill_rect(&mut self, rect: Rect, color: Color32);

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color32);

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32);

    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32);

    /// Drop everything drawn so far
    fn clear(&mut self);

    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;

    /// Release the surface; later draw calls are ignored
    fn destroy(&mut self);
}

pub trait SurfaceFactory {
    type Surface: DrawSurface;

    fn create_surface(&mut self, label: &str) -> Self::Surface;
}
