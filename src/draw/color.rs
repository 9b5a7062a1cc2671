//! Small colour helpers shared by the chunk and ocean renderers

use egui::Color32;

pub fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

pub fn lerp(a: Color32, b: Color32, t: f32) -> Color32 {
    let clamped = t.clamp(0.0, 1.0);
    let channel = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * clamped).round() as u8;
    Color32::from_rgb(
        channel(a.r(), b.r()),
        channel(a.g(), b.g()),
        channel(a.b(), b.b()),
    )
}

/// Scale toward black; `factor` 1.0 keeps the colour
pub fn darken(c: Color32, factor: f32) -> Color32 {
    lerp(Color32::BLACK, c, factor)
}

/// Same colour, different opacity
pub fn with_alpha(c: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), alpha)
}
