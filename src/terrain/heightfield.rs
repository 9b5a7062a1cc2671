// 高度场生成
//
// Build order is fixed: raw profile -> smoothing -> landing pads -> plateaus
// -> global clamp -> ocean band. Each later stage overwrites the earlier ones
// where they overlap, so the ocean always wins inside the water band.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::config::TerrainConfig;
use super::noise::HeightSampler;
use super::smoothing::smooth;
use crate::layout::{LandingPad, RegionLayout};

/// 地面折线的顶点 (y 向下增长)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainVertex {
    pub x: f32,
    pub y: f32,
}

/// 压平的高台, 留给建筑
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatArea {
    pub center_x: f32,
    pub width: f32,
    pub y: f32,
}

/// 海域一侧的边界与岸上高度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterEdge {
    pub x: f32,
    pub land_y: f32,
}

/// 生成后的高度场
#[derive(Debug, Clone)]
pub struct HeightField {
    vertices: Vec<TerrainVertex>,
    flat_areas: Vec<FlatArea>,
    water: Option<(f32, f32)>,
    mountain: Option<(f32, f32)>,
    default_height: f32,
    ocean_y: f32,
}

/// 海域与山地的 `[start, end)` 边界
fn special_bounds(
    config: &TerrainConfig,
    layout: &RegionLayout,
) -> (Option<(f32, f32)>, Option<(f32, f32)>) {
    let water = layout
        .water_region
        .as_deref()
        .map(|name| layout.bounds_or(name, config.fallback_water_bounds));
    let mountain = layout
        .mountain
        .as_ref()
        .map(|m| layout.bounds_or(&m.region, config.fallback_mountain_bounds));
    (water, mountain)
}

fn in_span(x: f32, span: Option<(f32, f32)>) -> bool {
    span.is_some_and(|(start, end)| x >= start && x < end)
}

fn overlaps(a: (f32, f32), b: (f32, f32)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// 等距 x 坐标, 末点固定为 `world_end`
pub fn grid_positions(config: &TerrainConfig) -> Vec<f32> {
    let n = config.vertex_count();
    (0..n)
        .map(|i| (config.world_start + i as f32 * config.segment_width).min(config.world_end))
        .collect()
}

/// 平滑后、区域覆盖前的剖面
pub fn smoothed_profile(config: &TerrainConfig, layout: &RegionLayout) -> Vec<TerrainVertex> {
    let (_, mountain_bounds) = special_bounds(config, layout);
    let mountain = layout.mountain.as_ref().zip(mountain_bounds);
    let sampler = HeightSampler::new(config, mountain);

    let xs = grid_positions(config);
    let raw = sampler.sample_all(&xs);
    let smoothed = smooth(&raw, config.smoothing_radius);

    xs.into_iter()
        .zip(smoothed)
        .map(|(x, y)| TerrainVertex { x, y })
        .collect()
}

impl HeightField {
    /// 执行完整生成流程, 结果只取决于输入
    pub fn generate(config: &TerrainConfig, layout: &RegionLayout) -> Self {
        let (water, mountain) = special_bounds(config, layout);

        // ====== 阶段 1: raw profile + smoothing ======
        let mut vertices = smoothed_profile(config, layout);

        // ====== 阶段 2: landing pads ======
        for pad in &layout.pads {
            flatten_pad(&mut vertices, pad, config);
        }

        // ====== 阶段 3: plateaus ======
        let flat_areas = place_plateaus(&mut vertices, config, &layout.pads, water, mountain);

        // ====== 阶段 4: global clamp, mountain exempt ======
        for v in vertices.iter_mut() {
            if !in_span(v.x, mountain) {
                v.y = v.y.clamp(config.clamp_min, config.clamp_max);
            }
        }

        // ====== 阶段 5: ocean band ======
        if let Some((start, end)) = water {
            for v in vertices.iter_mut().filter(|v| v.x >= start && v.x <= end) {
                v.y = config.ocean_y;
            }
        }

        log::debug!(
            "height field: {} vertices, {} plateaus, water {:?}, mountain {:?}",
            vertices.len(),
            flat_areas.len(),
            water,
            mountain
        );

        Self {
            vertices,
            flat_areas,
            water,
            mountain,
            default_height: config.default_height,
            ocean_y: config.ocean_y,
        }
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn flat_areas(&self) -> &[FlatArea] {
        &self.flat_areas
    }

    pub fn water_bounds(&self) -> Option<(f32, f32)> {
        self.water
    }

    pub fn mountain_bounds(&self) -> Option<(f32, f32)> {
        self.mountain
    }

    pub fn ocean_y(&self) -> f32 {
        self.ocean_y
    }

    pub fn is_water(&self, x: f32) -> bool {
        self.water.is_some_and(|(start, end)| x >= start && x <= end)
    }

    pub fn in_mountain(&self, x: f32) -> bool {
        in_span(x, self.mountain)
    }

    /// `[first.x, last.x]`, 空高度场为 `None`
    pub fn x_range(&self) -> Option<(f32, f32)> {
        Some((self.vertices.first()?.x, self.vertices.last()?.x))
    }

    /// 包住 `x` 的相邻顶点索引
    fn bracket(&self, x: f32) -> Option<(usize, usize)> {
        let (first, last) = self.x_range()?;
        if !(x >= first && x <= last) {
            return None;
        }
        let i = self.vertices.partition_point(|v| v.x <= x);
        if i >= self.vertices.len() {
            // exactly on the last vertex
            let last = self.vertices.len() - 1;
            return Some((last, last));
        }
        Some((i - 1, i))
    }

    /// 插值高度, 范围外返回 `default_height`
    pub fn height_at(&self, x: f32) -> f32 {
        let Some((i, j)) = self.bracket(x) else {
            return self.default_height;
        };
        let (a, b) = (self.vertices[i], self.vertices[j]);
        let dx = b.x - a.x;
        if dx <= 0.0 {
            return b.y;
        }
        let t = (x - a.x) / dx;
        a.y + (b.y - a.y) * t
    }

    /// `x` 所在线段的 dy/dx, 范围外为 0
    pub fn slope_at(&self, x: f32) -> f32 {
        match self.bracket(x) {
            Some((i, j)) if self.vertices[j].x > self.vertices[i].x => {
                let (a, b) = (self.vertices[i], self.vertices[j]);
                (b.y - a.y) / (b.x - a.x)
            }
            _ => 0.0,
        }
    }

    /// 海域左右边界及岸上高度
    pub fn water_edges(&self) -> Option<[WaterEdge; 2]> {
        let (start, end) = self.water?;
        let first = self.vertices.iter().position(|v| v.x >= start)?;
        let last = self.vertices.iter().rposition(|v| v.x <= end)?;
        let left_y = first
            .checked_sub(1)
            .map_or(self.ocean_y, |i| self.vertices[i].y);
        let right_y = self.vertices.get(last + 1).map_or(self.ocean_y, |v| v.y);
        Some([
            WaterEdge {
                x: start,
                land_y: left_y,
            },
            WaterEdge {
                x: end,
                land_y: right_y,
            },
        ])
    }

    /// 全部顶点的 (最小 y, 最大 y)
    pub fn y_extent(&self) -> (f32, f32) {
        self.vertices
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v.y), hi.max(v.y))
            })
    }
}

/// 把区间外扩到包住它的顶点, 返回闭区间索引
///
/// 插值在区间两端也落在同一高度上。
fn snap_span(vertices: &[TerrainVertex], lo: f32, hi: f32) -> Option<(usize, usize)> {
    if vertices.is_empty() || !(lo <= hi) {
        return None;
    }
    let first = vertices.partition_point(|v| v.x <= lo).saturating_sub(1);
    let last = vertices
        .partition_point(|v| v.x < hi)
        .min(vertices.len() - 1);
    Some((first, last.max(first)))
}

fn mean_y(vertices: &[TerrainVertex]) -> Option<f32> {
    if vertices.is_empty() {
        return None;
    }
    let sum: f64 = vertices.iter().map(|v| v.y as f64).sum();
    Some((sum / vertices.len() as f64) as f32)
}

/// 着陆平台: 取精确占地的平均高度, 写到含边距的占地上
fn flatten_pad(vertices: &mut [TerrainVertex], pad: &LandingPad, config: &TerrainConfig) {
    let (left, right) = (pad.left(), pad.right());
    let exact: Vec<TerrainVertex> = vertices
        .iter()
        .filter(|v| v.x >= left && v.x <= right)
        .copied()
        .collect();

    let flat_y = match mean_y(&exact) {
        Some(y) => y,
        // pad narrower than a segment: use the nearest vertex
        None => match vertices
            .iter()
            .min_by(|a, b| (a.x - pad.x).abs().total_cmp(&(b.x - pad.x).abs()))
        {
            Some(v) => v.y,
            None => return,
        },
    };

    let lo = left - config.pad_margin_left;
    let hi = right + config.pad_margin_right;
    if let Some((first, last)) = snap_span(vertices, lo, hi) {
        for v in &mut vertices[first..=last] {
            v.y = flat_y;
        }
    }
}

/// 随机高台: 按抖动步长扫描, 把空闲窗口压平
fn place_plateaus(
    vertices: &mut [TerrainVertex],
    config: &TerrainConfig,
    pads: &[LandingPad],
    water: Option<(f32, f32)>,
    mountain: Option<(f32, f32)>,
) -> Vec<FlatArea> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut flat_areas = Vec::new();
    let width = config.plateau_width;
    if width <= 0.0 {
        return flat_areas;
    }

    let near_pad = |window: (f32, f32)| {
        pads.iter().any(|pad| {
            let guarded = (
                pad.left() - config.pad_margin_left - config.plateau_pad_clearance,
                pad.right() + config.pad_margin_right + config.plateau_pad_clearance,
            );
            overlaps(window, guarded)
        })
    };

    let mut x = config.world_start + config.plateau_spacing;
    while x + width < config.world_end {
        if let Some((first, last)) = snap_span(vertices, x, x + width) {
            // the snapped extent is what actually ends up flat
            let window = (vertices[first].x, vertices[last].x);
            let blocked = water.is_some_and(|w| overlaps(window, w))
                || mountain.is_some_and(|m| overlaps(window, m))
                || near_pad(window);

            if !blocked && last > first {
                if let Some(mean) = mean_y(&vertices[first..=last]) {
                    let y = mean.clamp(config.plateau_min_y, config.plateau_max_y);
                    for v in &mut vertices[first..=last] {
                        v.y = y;
                    }
                    flat_areas.push(FlatArea {
                        center_x: (window.0 + window.1) / 2.0,
                        width: window.1 - window.0,
                        y,
                    });
                }
            }
        }

        let jitter = if config.plateau_jitter > 0.0 {
            rng.random_range(0.0..config.plateau_jitter)
        } else {
            0.0
        };
        x += (config.plateau_spacing + jitter).max(config.segment_width.max(1.0));
    }

    flat_areas
}
