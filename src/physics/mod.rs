//! Physics collaborator boundary
//!
//! The terrain only ever creates static bodies and removes them again, so the
//! engine is reduced to those two calls.
//!
//! # Main types
//! - [`PhysicsWorld`][]: the narrow engine interface
//! - [`StaticBodyStore`][]: in-memory world used by the viewer and tests
//! - `RapierWorld` (feature `rapier`): rapier2d-backed world

mod store;

#[cfg(feature = "rapier")]
mod rapier;

pub use store::{BodyId, StaticBodyStore};

#[cfg(feature = "rapier")]
pub use rapier::RapierWorld;

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// 碰撞类别位
pub mod category {
    pub const TERRAIN: u32 = 0x0001;
    pub const SHUTTLE: u32 = 0x0002;
    pub const PROJECTILE: u32 = 0x0004;
    pub const PICKUP: u32 = 0x0008;
    pub const ALL: u32 = u32::MAX;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMaterial {
    pub friction: f32,
    pub restitution: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFilter {
    /// 自身类别
    pub category: u32,
    /// 可碰撞的类别
    pub mask: u32,
}

impl CollisionFilter {
    pub fn terrain() -> Self {
        Self {
            category: category::TERRAIN,
            mask: category::ALL & !category::TERRAIN,
        }
    }

    pub fn collides_with(&self, other: &CollisionFilter) -> bool {
        self.mask & other.category != 0 && other.mask & self.category != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// 地形线段下的斜条
    Segment,
    /// 海域边缘的竖墙
    Wall,
}

/// 静态旋转矩形的描述
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBodyDesc {
    pub kind: BodyKind,
    /// 中心
    pub position: Pos2,
    /// 宽和高
    pub size: Vec2,
    /// 弧度, 从 +x 逆时针
    pub rotation: f32,
    pub material: BodyMaterial,
    pub filter: CollisionFilter,
}

impl StaticBodyDesc {
    /// 拒绝无法创建的形状
    pub fn is_degenerate(&self) -> bool {
        !(self.position.x.is_finite()
            && self.position.y.is_finite()
            && self.rotation.is_finite()
            && self.size.x.is_finite()
            && self.size.y.is_finite())
            || self.size.x <= 0.0
            || self.size.y <= 0.0
    }

    /// 四个角点, 用于调试叠加
    pub fn corners(&self) -> [Pos2; 4] {
        let (sin, cos) = self.rotation.sin_cos();
        let hx = self.size.x / 2.0;
        let hy = self.size.y / 2.0;
        [(-hx, -hy), (hx, -hy), (hx, hy), (-hx, hy)].map(|(dx, dy)| {
            Pos2::new(
                self.position.x + dx * cos - dy * sin,
                self.position.y + dx * sin + dy * cos,
            )
        })
    }
}

/// 物理引擎的静态刚体接口
pub trait PhysicsWorld {
    type Handle: Copy + std::fmt::Debug;

    /// 返回 `None` 表示引擎拒绝了该刚体
    fn create_static_body(&mut self, desc: &StaticBodyDesc) -> Option<Self::Handle>;

    fn remove_body(&mut self, handle: Self::Handle);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(width: f32) -> StaticBodyDesc {
        StaticBodyDesc {
            kind: BodyKind::Segment,
            position: Pos2::new(10.0, 20.0),
            size: Vec2::new(width, 10.0),
            rotation: 0.0,
            material: BodyMaterial {
                friction: 0.5,
                restitution: 0.1,
            },
            filter: CollisionFilter::terrain(),
        }
    }

    #[test]
    fn terrain_does_not_collide_with_itself() {
        let terrain = CollisionFilter::terrain();
        let shuttle = CollisionFilter {
            category: category::SHUTTLE,
            mask: category::ALL,
        };
        assert!(!terrain.collides_with(&terrain));
        assert!(terrain.collides_with(&shuttle));
    }

    #[test]
    fn degenerate_shapes_are_flagged() {
        assert!(!desc(20.0).is_degenerate());
        assert!(desc(0.0).is_degenerate());
        assert!(desc(f32::NAN).is_degenerate());
    }

    #[test]
    fn corners_follow_rotation() {
        let mut d = desc(20.0);
        d.rotation = std::f32::consts::FRAC_PI_2;
        let corners = d.corners();
        // rotated a quarter turn the long side is vertical
        let height = (corners[1].y - corners[0].y).abs();
        assert!((height - 20.0).abs() < 1e-4);
    }
}
