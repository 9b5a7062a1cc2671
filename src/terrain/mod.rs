// 地形子系统
//
// 生成顺序: 原始剖面 -> 平滑 -> 着陆平台 -> 随机高台 -> 全局限幅 -> 海洋压平
// 之后注册碰撞体、预渲染分块、创建海洋。

pub mod chunks;
pub mod collision;
pub mod config;
pub mod decoration;
pub mod heightfield;
pub mod noise;
pub mod ocean;
pub mod smoothing;

pub use chunks::*;
pub use collision::*;
pub use config::*;
pub use heightfield::*;
pub use ocean::*;

use serde::Serialize;

use crate::draw::{DrawSurface, SurfaceFactory};
use crate::layout::{Region, RegionLayout};
use crate::physics::PhysicsWorld;

/// 当前帧的信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// 视口左边缘的世界 x
    pub camera_x: f32,
    pub viewport_width: f32,
    /// 距上一帧的秒数
    pub dt: f32,
}

/// 地形统计
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerrainStats {
    pub vertices: usize,
    pub flat_areas: usize,
    pub bodies: usize,
    pub skipped_bodies: usize,
    pub chunks: usize,
    pub visible_chunks: usize,
    pub has_ocean: bool,
    pub min_y: f32,
    pub max_y: f32,
}

/// 地形: 高度场, 碰撞体, 绘制对象
pub struct Terrain<H, S> {
    config: TerrainConfig,
    layout: RegionLayout,
    field: HeightField,
    collision: CollisionSet<H>,
    chunks: ChunkSet<S>,
    ocean: Option<OceanRenderer<S>>,
    destroyed: bool,
}

impl<H: Copy + std::fmt::Debug, S: DrawSurface> Terrain<H, S> {
    /// 生成高度场, 注册碰撞体, 预渲染
    pub fn build<P, F>(
        config: TerrainConfig,
        layout: RegionLayout,
        physics: &mut P,
        surfaces: &mut F,
    ) -> Self
    where
        P: PhysicsWorld<Handle = H>,
        F: SurfaceFactory<Surface = S>,
    {
        if let Err(err) = layout.validate() {
            log::warn!("region layout: {err}; continuing with fallbacks");
        }

        let field = HeightField::generate(&config, &layout);
        let collision = CollisionSet::build(&field, &config, physics);
        let chunks = ChunkSet::build(&field, &layout, &config, surfaces);
        let ocean = if field.water_bounds().is_some() {
            OceanRenderer::new(surfaces.create_surface("ocean"), &field, &config)
        } else {
            None
        };

        let (min_y, max_y) = field.y_extent();
        log::info!(
            "terrain built: {} vertices, {} bodies ({} skipped), {} chunks, y in [{:.1}, {:.1}]",
            field.vertices().len(),
            collision.len(),
            collision.skipped(),
            chunks.len(),
            min_y,
            max_y
        );

        Self {
            config,
            layout,
            field,
            collision,
            chunks,
            ocean,
            destroyed: false,
        }
    }

    /// 每帧更新: 分块裁剪与海洋
    pub fn update(
        &mut self,
        frame: &FrameContext,
        preset: &impl PerformancePreset,
        pollution: &impl PollutionSource,
    ) {
        if self.destroyed {
            return;
        }
        self.chunks
            .update_visibility(frame.camera_x, frame.viewport_width);

        if let Some(ocean) = &mut self.ocean {
            let left = frame.camera_x - self.config.cull_margin;
            let right = frame.camera_x + frame.viewport_width + self.config.cull_margin;
            let (start, end) = ocean.bounds();
            ocean.set_visible(start <= right && end >= left);
            ocean.update(
                frame.dt,
                OceanMode::from_preset(preset),
                pollution.pollution_level(),
            );
        }
    }

    /// 移除全部刚体并释放绘制对象, 可重复调用
    pub fn destroy<P>(&mut self, physics: &mut P)
    where
        P: PhysicsWorld<Handle = H>,
    {
        if self.destroyed {
            return;
        }
        self.collision.remove_all(physics);
        self.chunks.destroy();
        if let Some(ocean) = &mut self.ocean {
            ocean.destroy();
        }
        self.destroyed = true;
        log::debug!("terrain destroyed");
    }

    pub fn stats(&self) -> TerrainStats {
        let (min_y, max_y) = self.field.y_extent();
        TerrainStats {
            vertices: self.field.vertices().len(),
            flat_areas: self.field.flat_areas().len(),
            bodies: self.collision.len(),
            skipped_bodies: self.collision.skipped(),
            chunks: self.chunks.len(),
            visible_chunks: self.chunks.visible_count(),
            has_ocean: self.ocean.is_some(),
            min_y,
            max_y,
        }
    }
}

impl<H, S> Terrain<H, S> {
    pub fn height_at(&self, x: f32) -> f32 {
        self.field.height_at(x)
    }

    pub fn slope_at(&self, x: f32) -> f32 {
        self.field.slope_at(x)
    }

    pub fn is_water(&self, x: f32) -> bool {
        self.field.is_water(x)
    }

    pub fn region_at(&self, x: f32) -> Option<&Region> {
        self.layout.region_at(x)
    }

    pub fn vertices(&self) -> &[TerrainVertex] {
        self.field.vertices()
    }

    pub fn flat_areas(&self) -> &[FlatArea] {
        self.field.flat_areas()
    }

    /// 世界水平范围 `[world_start, world_end]`
    pub fn world_bounds(&self) -> (f32, f32) {
        (self.config.world_start, self.config.world_end)
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn layout(&self) -> &RegionLayout {
        &self.layout
    }

    pub fn chunks(&self) -> &ChunkSet<S> {
        &self.chunks
    }

    pub fn ocean(&self) -> Option<&OceanRenderer<S>> {
        self.ocean.as_ref()
    }

    pub fn body_handles(&self) -> &[H] {
        self.collision.handles()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl<H, S> Drop for Terrain<H, S> {
    fn drop(&mut self) {
        if !self.destroyed && !self.collision.is_empty() {
            log::warn!(
                "terrain dropped with {} physics bodies still registered; call destroy() first",
                self.collision.len()
            );
        }
    }
}
