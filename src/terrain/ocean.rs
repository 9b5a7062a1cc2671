//! Ocean surface renderer
//!
//! Two modes, re-selected every frame from the performance preset:
//! - Animated: phase advances, the whole surface is redrawn each frame
//! - Static: one flat rectangle drawn once, later frames do nothing until the
//!   mode flips back

use egui::{Color32, Pos2, Rect};

use super::config::{OceanStyle, TerrainConfig};
use super::heightfield::{HeightField, WaterEdge};
use crate::draw::color::{lerp, rgb, with_alpha};
use crate::draw::DrawSurface;

/// 性能预设: 是否开启海浪
pub trait PerformancePreset {
    fn ocean_waves_enabled(&self) -> bool;
}

impl PerformancePreset for bool {
    fn ocean_waves_enabled(&self) -> bool {
        *self
    }
}

/// 当前污染程度, 取值 `[0, 1]`
pub trait PollutionSource {
    fn pollution_level(&self) -> f32;
}

impl PollutionSource for f32 {
    fn pollution_level(&self) -> f32 {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OceanMode {
    Animated,
    Static,
}

impl OceanMode {
    pub fn from_preset(preset: &impl PerformancePreset) -> Self {
        if preset.ocean_waves_enabled() {
            Self::Animated
        } else {
            Self::Static
        }
    }
}

/// 按污染程度把颜色拉向 `target`
pub fn tint(color: Color32, target: Color32, pollution: f32) -> Color32 {
    let p = if pollution.is_finite() {
        pollution.clamp(0.0, 1.0)
    } else {
        0.0
    };
    lerp(color, target, p)
}

#[derive(Debug)]
pub struct OceanRenderer<S> {
    surface: S,
    start_x: f32,
    end_x: f32,
    surface_y: f32,
    floor_y: f32,
    edges: [WaterEdge; 2],
    style: OceanStyle,
    phase: f32,
    mode: Option<OceanMode>,
    redraws: usize,
}

impl<S: DrawSurface> OceanRenderer<S> {
    /// 没有海域时返回 `None`
    pub fn new(surface: S, field: &HeightField, config: &TerrainConfig) -> Option<Self> {
        let (start_x, end_x) = field.water_bounds()?;
        let edges = field.water_edges()?;
        Some(Self {
            surface,
            start_x,
            end_x,
            surface_y: field.ocean_y(),
            floor_y: config.world_height,
            edges,
            style: config.ocean.clone(),
            phase: 0.0,
            mode: None,
            redraws: 0,
        })
    }

    pub fn mode(&self) -> Option<OceanMode> {
        self.mode
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// 创建以来的重绘次数
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.start_x, self.end_x)
    }

    /// 每帧调用
    pub fn update(&mut self, dt: f32, mode: OceanMode, pollution: f32) {
        let changed = self.mode != Some(mode);
        self.mode = Some(mode);
        match mode {
            OceanMode::Animated => {
                if dt.is_finite() && dt > 0.0 {
                    self.phase += dt;
                }
                self.draw_animated(pollution);
            }
            OceanMode::Static => {
                if changed {
                    self.draw_static(pollution);
                }
            }
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.surface.set_visible(visible);
    }

    pub fn destroy(&mut self) {
        self.surface.destroy();
    }

    fn draw_static(&mut self, pollution: f32) {
        self.surface.clear();
        let base = tint(rgb(self.style.base_color), rgb(self.style.polluted_color), pollution);
        let rect = self.water_rect();
        self.surface.fill_rect(rect, base);
        self.draw_walls();
        self.redraws += 1;
    }

    fn draw_animated(&mut self, pollution: f32) {
        self.surface.clear();
        let target = rgb(self.style.polluted_color);
        let base = tint(rgb(self.style.base_color), target, pollution);
        let rect = self.water_rect();
        self.surface.fill_rect(rect, base);

        let step = self.style.wave_step.max(1.0);
        for (k, wave) in self.style.waves.iter().enumerate() {
            let color = tint(rgb(wave.color), target, pollution);
            let top_offset = k as f32 * 10.0;
            let band = 18.0 + k as f32 * 6.0;
            let crest = |x: f32| {
                self.surface_y
                    + top_offset
                    + wave.amplitude * (x * wave.frequency + self.phase * wave.speed).sin()
            };
            let mut x = self.start_x;
            while x < self.end_x {
                let nx = (x + step).min(self.end_x);
                let (ya, yb) = (crest(x), crest(nx));
                self.surface.fill_polygon(
                    &[
                        Pos2::new(x, ya),
                        Pos2::new(nx, yb),
                        Pos2::new(nx, yb + band),
                        Pos2::new(x, ya + band),
                    ],
                    color,
                );
                x = nx;
            }
        }

        let foam = with_alpha(tint(rgb(self.style.foam_color), target, pollution), 180);
        let width = self.end_x - self.start_x;
        let first = &self.style.waves[0];
        for i in 0..self.style.foam_patches {
            // golden-ratio spread, drifting with the phase
            let t = (i as f32 * 0.618_034 + self.phase * 0.02).fract();
            let x = self.start_x + t * width;
            let y = self.surface_y
                + first.amplitude * (x * first.frequency + self.phase * first.speed).sin();
            let r = 2.5 + (i % 4) as f32;
            self.surface.fill_circle(Pos2::new(x, y), r, foam);
            self.surface
                .fill_circle(Pos2::new(x + r * 1.4, y + 1.0), r * 0.7, foam);
        }

        self.draw_walls();
        self.redraws += 1;
    }

    fn water_rect(&self) -> Rect {
        Rect::from_two_pos(
            Pos2::new(self.start_x, self.surface_y),
            Pos2::new(self.end_x, self.floor_y),
        )
    }

    /// 海墙 (仅绘制, 与物理墙无关)
    fn draw_walls(&mut self) {
        let color = rgb(self.style.wall_color);
        let half = self.style.wall_width / 2.0;
        for edge in self.edges {
            let rect = Rect::from_two_pos(
                Pos2::new(edge.x - half, edge.land_y),
                Pos2::new(edge.x + half, self.floor_y),
            );
            self.surface.fill_rect(rect, color);
            // capstone
            let cap = Rect::from_center_size(
                Pos2::new(edge.x, edge.land_y),
                egui::vec2(half * 2.0 + 4.0, 6.0),
            );
            self.surface
                .fill_rounded_rect(cap, 3.0, lerp(color, Color32::BLACK, 0.3));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::ShapeSurface;
    use crate::layout::{Region, RegionLayout};
    use egui::Shape;

    fn ocean() -> OceanRenderer<ShapeSurface> {
        let config = TerrainConfig::with_world(0.0, 4000.0);
        let layout = RegionLayout::new(
            vec![
                Region::new("Land", 0.0, [0, 0, 0]),
                Region::new("Ocean", 1000.0, [0, 0, 0]),
                Region::new("Shore", 3000.0, [0, 0, 0]),
            ],
            4000.0,
        )
        .with_water("Ocean");
        let field = HeightField::generate(&config, &layout);
        OceanRenderer::new(ShapeSurface::new("ocean"), &field, &config).unwrap()
    }

    #[test]
    fn static_mode_draws_once() {
        let mut ocean = ocean();
        for _ in 0..10 {
            ocean.update(1.0 / 60.0, OceanMode::Static, 0.0);
        }
        assert_eq!(ocean.redraw_count(), 1);
        assert_eq!(ocean.phase(), 0.0);
        // flat rect plus two walls (rect + cap each)
        assert_eq!(ocean.surface().shapes().len(), 5);
    }

    #[test]
    fn animated_mode_redraws_every_frame() {
        let mut ocean = ocean();
        for _ in 0..10 {
            ocean.update(0.1, OceanMode::Animated, 0.0);
        }
        assert_eq!(ocean.redraw_count(), 10);
        assert!((ocean.phase() - 1.0).abs() < 1e-5);
        assert!(ocean.surface().shapes().len() > 5);
    }

    #[test]
    fn switching_modes_redraws() {
        let mut ocean = ocean();
        ocean.update(0.1, OceanMode::Static, 0.0);
        ocean.update(0.1, OceanMode::Animated, 0.0);
        ocean.update(0.1, OceanMode::Static, 0.0);
        ocean.update(0.1, OceanMode::Static, 0.0);
        assert_eq!(ocean.redraw_count(), 3);
        assert_eq!(ocean.mode(), Some(OceanMode::Static));
    }

    #[test]
    fn pollution_darkens_base_colour() {
        let mut ocean = ocean();
        ocean.update(0.0, OceanMode::Static, 1.0);
        let polluted = rgb(OceanStyle::default().polluted_color);
        match &ocean.surface().shapes()[0] {
            Shape::Rect(rect) => assert_eq!(rect.fill, polluted),
            other => panic!("expected the base rect first, got {other:?}"),
        }
    }

    #[test]
    fn tint_clamps_and_ignores_nan() {
        let a = Color32::from_rgb(0, 0, 200);
        let b = Color32::from_rgb(40, 40, 0);
        assert_eq!(tint(a, b, 0.0), a);
        assert_eq!(tint(a, b, 5.0), b);
        assert_eq!(tint(a, b, f32::NAN), a);
        assert_eq!(tint(a, b, 0.5), Color32::from_rgb(20, 20, 100));
    }

    #[test]
    fn preset_selects_mode() {
        assert_eq!(OceanMode::from_preset(&true), OceanMode::Animated);
        assert_eq!(OceanMode::from_preset(&false), OceanMode::Static);
    }
}
