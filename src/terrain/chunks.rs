//! Chunked terrain drawables
//!
//! The world is cut into fixed-width chunks, each pre-rendered once into its
//! own surface. Per frame only the visibility flags change, so the cost of a
//! frame does not depend on how much terrain was drawn.

use egui::Pos2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::config::TerrainConfig;
use super::decoration::{decorate, draw_ground, GroundPalette};
use super::heightfield::HeightField;
use crate::draw::{DrawSurface, SurfaceFactory};
use crate::layout::RegionLayout;

/// 预渲染的一段地形
#[derive(Debug)]
pub struct Chunk<S> {
    pub index: usize,
    pub start_x: f32,
    pub end_x: f32,
    pub surface: S,
}

impl<S> Chunk<S> {
    /// 是否与闭区间 `[left, right]` 相交
    pub fn intersects(&self, left: f32, right: f32) -> bool {
        self.start_x <= right && self.end_x >= left
    }
}

/// 按 `width` 切分 `[start, end)`, 最后一块截断到 `end`
pub fn partition(start: f32, end: f32, width: f32) -> Vec<(f32, f32)> {
    if end <= start || width <= 0.0 {
        return Vec::new();
    }
    let count = ((end - start) / width).ceil() as usize;
    (0..count)
        .map(|i| {
            let s = start + i as f32 * width;
            let e = (start + (i + 1) as f32 * width).min(end);
            (s, e)
        })
        .collect()
}

/// `[from, to]` 上的地面折线, 两端用插值补点
fn clip_line(field: &HeightField, from: f32, to: f32) -> Vec<Pos2> {
    let mut line = vec![Pos2::new(from, field.height_at(from))];
    line.extend(
        field
            .vertices()
            .iter()
            .filter(|v| v.x > from && v.x < to)
            .map(|v| Pos2::new(v.x, v.y)),
    );
    line.push(Pos2::new(to, field.height_at(to)));
    line
}

/// 全部分块, 按位置索引
#[derive(Debug)]
pub struct ChunkSet<S> {
    chunks: Vec<Chunk<S>>,
    origin: f32,
    chunk_width: f32,
    cull_margin: f32,
}

impl<S: DrawSurface> ChunkSet<S> {
    /// 切分并预渲染每个分块
    pub fn build<F>(
        field: &HeightField,
        layout: &RegionLayout,
        config: &TerrainConfig,
        surfaces: &mut F,
    ) -> Self
    where
        F: SurfaceFactory<Surface = S>,
    {
        let (origin, end) = field.x_range().unwrap_or((config.world_start, config.world_start));
        let chunks: Vec<Chunk<S>> = partition(origin, end, config.chunk_width)
            .into_iter()
            .enumerate()
            .map(|(index, (start_x, end_x))| {
                let mut surface = surfaces.create_surface(&format!("terrain-chunk-{index}"));
                render_chunk(&mut surface, index, start_x, end_x, field, layout, config);
                Chunk {
                    index,
                    start_x,
                    end_x,
                    surface,
                }
            })
            .collect();

        log::debug!(
            "chunks: {} x {} units over [{}, {}]",
            chunks.len(),
            config.chunk_width,
            origin,
            end
        );

        Self {
            chunks,
            origin,
            chunk_width: config.chunk_width,
            cull_margin: config.cull_margin,
        }
    }

    /// 只显示与扩展视口相交的分块, 返回可见数量
    pub fn update_visibility(&mut self, camera_x: f32, viewport_width: f32) -> usize {
        let left = camera_x - self.cull_margin;
        let right = camera_x + viewport_width + self.cull_margin;
        let mut visible = 0;
        for chunk in &mut self.chunks {
            let show = chunk.intersects(left, right);
            if show != chunk.surface.is_visible() {
                chunk.surface.set_visible(show);
            }
            visible += show as usize;
        }
        visible
    }

    pub fn visible_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.surface.is_visible()).count()
    }

    pub fn destroy(&mut self) {
        for chunk in &mut self.chunks {
            chunk.surface.destroy();
        }
    }
}

impl<S> ChunkSet<S> {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk<S>> {
        self.chunks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Chunk<S>> {
        self.chunks.get(index)
    }

    /// `x` 所在的分块
    pub fn chunk_at(&self, x: f32) -> Option<&Chunk<S>> {
        if !(x >= self.origin) || self.chunk_width <= 0.0 {
            return None;
        }
        // the world end belongs to the last chunk
        let index = (((x - self.origin) / self.chunk_width).floor() as usize)
            .min(self.chunks.len().checked_sub(1)?);
        self.chunks.get(index).filter(|c| x <= c.end_x)
    }
}

fn render_chunk<S: DrawSurface>(
    surface: &mut S,
    index: usize,
    start_x: f32,
    end_x: f32,
    field: &HeightField,
    layout: &RegionLayout,
    config: &TerrainConfig,
) {
    let (world_lo, world_hi) = field.x_range().unwrap_or((start_x, end_x));
    let draw_from = (start_x - config.chunk_overlap).max(world_lo);
    let draw_to = (end_x + config.chunk_overlap).min(world_hi);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed ^ (index as u64).wrapping_mul(0x9e37_79b9));

    let water = layout.water_region.as_deref();
    for (region, region_start, region_end) in layout.regions_overlapping(draw_from, draw_to) {
        if Some(region.name.as_str()) == water {
            continue;
        }
        let from = region_start.max(draw_from);
        let to = region_end.min(draw_to);
        if to <= from {
            continue;
        }
        let line = clip_line(field, from, to);
        let palette = GroundPalette::for_region(region);
        draw_ground(surface, &line, &palette, &config.ground, config.world_height);
        decorate(surface, &line, region.decoration, &palette, &config.ground, &mut rng);
    }
}
