// 碰撞体构建
//
// One thin static strip per vertex pair instead of a filled polygon: steep
// terrain never produces self-intersecting shapes this way. The strip's top
// face follows the drawn line exactly.

use egui::{Pos2, Vec2};

use super::config::TerrainConfig;
use super::heightfield::{HeightField, TerrainVertex};
use crate::physics::{BodyKind, CollisionFilter, PhysicsWorld, StaticBodyDesc};

/// 线段 `v1 -> v2` 下方的刚体
pub fn segment_body(v1: TerrainVertex, v2: TerrainVertex, config: &TerrainConfig) -> StaticBodyDesc {
    let dx = v2.x - v1.x;
    let dy = v2.y - v1.y;
    let thickness = config.body_thickness;
    StaticBodyDesc {
        kind: BodyKind::Segment,
        position: Pos2::new((v1.x + v2.x) / 2.0, (v1.y + v2.y) / 2.0 + thickness / 2.0),
        size: Vec2::new(dx, thickness),
        rotation: dy.atan2(dx),
        material: config.terrain_material,
        filter: CollisionFilter::terrain(),
    }
}

/// 从 `land_y` 到世界底部的竖墙
pub fn wall_body(x: f32, land_y: f32, config: &TerrainConfig) -> StaticBodyDesc {
    let floor = config.world_height;
    let height = (floor - land_y).abs().max(config.wall_thickness);
    StaticBodyDesc {
        kind: BodyKind::Wall,
        position: Pos2::new(x, (land_y + floor) / 2.0),
        size: Vec2::new(config.wall_thickness, height),
        rotation: 0.0,
        material: config.wall_material,
        filter: CollisionFilter::terrain(),
    }
}

/// 地形需要的全部刚体, 先线段后墙
pub fn body_descs(field: &HeightField, config: &TerrainConfig) -> Vec<StaticBodyDesc> {
    let mut descs: Vec<StaticBodyDesc> = field
        .vertices()
        .windows(2)
        .map(|pair| segment_body(pair[0], pair[1], config))
        .collect();

    if let Some(edges) = field.water_edges() {
        descs.extend(edges.iter().map(|edge| wall_body(edge.x, edge.land_y, config)));
    }
    descs
}

/// 已注册刚体的句柄
#[derive(Debug)]
pub struct CollisionSet<H> {
    handles: Vec<H>,
    skipped: usize,
}

impl<H: Copy + std::fmt::Debug> CollisionSet<H> {
    /// 注册全部刚体, 被拒绝的跳过并计数
    pub fn build<P>(field: &HeightField, config: &TerrainConfig, physics: &mut P) -> Self
    where
        P: PhysicsWorld<Handle = H>,
    {
        let descs = body_descs(field, config);
        let mut handles = Vec::with_capacity(descs.len());
        let mut skipped = 0;

        for desc in &descs {
            match physics.create_static_body(desc) {
                Some(handle) => handles.push(handle),
                None => {
                    skipped += 1;
                    log::warn!(
                        "physics refused {:?} body at ({:.1}, {:.1}); collision gap left in place",
                        desc.kind,
                        desc.position.x,
                        desc.position.y
                    );
                }
            }
        }

        log::debug!(
            "collision: {} bodies registered, {} skipped",
            handles.len(),
            skipped
        );
        Self { handles, skipped }
    }

    /// 从物理世界移除全部刚体
    pub fn remove_all<P>(&mut self, physics: &mut P)
    where
        P: PhysicsWorld<Handle = H>,
    {
        for handle in self.handles.drain(..) {
            physics.remove_body(handle);
        }
    }
}

impl<H> CollisionSet<H> {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }
}
