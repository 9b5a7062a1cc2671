//! Per-biome ground layers and decoration passes
//!
//! Everything here draws into a chunk surface once, at build time.

use egui::{Color32, Pos2};
use rand::Rng;

use super::config::GroundStyle;
use crate::draw::color::{darken, lerp, rgb};
use crate::draw::DrawSurface;
use crate::layout::{Decoration, Region};

/// 区域的三层地面颜色
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPalette {
    pub grass: Color32,
    pub dirt: Color32,
    pub rock: Color32,
}

impl GroundPalette {
    pub fn for_region(region: &Region) -> Self {
        let top = rgb(region.color);
        let earth = Color32::from_rgb(110, 80, 50);
        Self {
            grass: top,
            dirt: lerp(darken(top, 0.75), earth, 0.5),
            rock: lerp(darken(top, 0.45), Color32::from_rgb(60, 55, 50), 0.4),
        }
    }
}

/// 折线下的岩层、土层和草层, 每段一个凸四边形
pub fn draw_ground<S: DrawSurface>(
    surface: &mut S,
    line: &[Pos2],
    palette: &GroundPalette,
    style: &GroundStyle,
    floor: f32,
) {
    let down = |p: Pos2, d: f32| Pos2::new(p.x, p.y + d);
    for pair in line.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        surface.fill_polygon(
            &[
                down(a, style.dirt_depth),
                down(b, style.dirt_depth),
                Pos2::new(b.x, floor.max(b.y + style.dirt_depth)),
                Pos2::new(a.x, floor.max(a.y + style.dirt_depth)),
            ],
            palette.rock,
        );
        surface.fill_polygon(
            &[
                down(a, style.grass_depth),
                down(b, style.grass_depth),
                down(b, style.dirt_depth),
                down(a, style.dirt_depth),
            ],
            palette.dirt,
        );
        surface.fill_polygon(
            &[a, b, down(b, style.grass_depth), down(a, style.grass_depth)],
            palette.grass,
        );
    }
}

/// 折线在 `x` 处的高度 (超出两端取端点)
fn line_y(line: &[Pos2], x: f32) -> Option<f32> {
    let i = line.partition_point(|p| p.x <= x);
    match (line.get(i.wrapping_sub(1)), line.get(i)) {
        (Some(a), Some(b)) if b.x > a.x => Some(a.y + (b.y - a.y) * (x - a.x) / (b.x - a.x)),
        (Some(a), _) => Some(a.y),
        (None, Some(b)) => Some(b.y),
        (None, None) => None,
    }
}

/// 按区域给 `line` 加装饰
pub fn decorate<S: DrawSurface>(
    surface: &mut S,
    line: &[Pos2],
    decoration: Decoration,
    palette: &GroundPalette,
    style: &GroundStyle,
    rng: &mut impl Rng,
) {
    let (Some(first), Some(last)) = (line.first(), line.last()) else {
        return;
    };
    let (from, to) = (first.x, last.x);

    match decoration {
        Decoration::None => {}
        Decoration::GrassTufts => {
            let blade = lerp(palette.grass, Color32::from_rgb(40, 90, 30), 0.35);
            let mut x = from + rng.random_range(0.0..style.tuft_spacing.max(1.0));
            while x < to {
                if let Some(y) = line_y(line, x) {
                    let h = rng.random_range(4.0..9.0);
                    for lean in [-2.5f32, 0.0, 2.5] {
                        surface.line(Pos2::new(x, y), Pos2::new(x + lean, y - h), 1.2, blade);
                    }
                }
                x += style.tuft_spacing.max(1.0) * rng.random_range(0.6..1.4);
            }
        }
        Decoration::Bushes => {
            let leaf = lerp(palette.grass, Color32::from_rgb(30, 70, 25), 0.5);
            let mut x = from + rng.random_range(0.0..style.bush_spacing.max(1.0));
            while x < to {
                if let Some(y) = line_y(line, x) {
                    let r = rng.random_range(6.0..11.0);
                    surface.fill_circle(Pos2::new(x - r * 0.7, y - r * 0.5), r * 0.8, leaf);
                    surface.fill_circle(Pos2::new(x + r * 0.7, y - r * 0.5), r * 0.8, leaf);
                    surface.fill_circle(Pos2::new(x, y - r), r, lerp(leaf, Color32::WHITE, 0.1));
                }
                x += style.bush_spacing.max(1.0) * rng.random_range(0.5..1.5);
            }
        }
        Decoration::SnowCaps => {
            let snow = rgb(style.snow_color);
            for pair in line.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if a.y < style.snow_line && b.y < style.snow_line {
                    // caps thicken toward the summit
                    let depth_a = style.snow_depth * (1.0 + (style.snow_line - a.y) / 200.0);
                    let depth_b = style.snow_depth * (1.0 + (style.snow_line - b.y) / 200.0);
                    surface.fill_polygon(
                        &[a, b, Pos2::new(b.x, b.y + depth_b), Pos2::new(a.x, a.y + depth_a)],
                        snow,
                    );
                }
            }
        }
    }
}
