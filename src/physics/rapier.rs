//! rapier2d backend for terrain bodies
//!
//! World axes are passed through untouched; the game decides which way
//! gravity points.

use rapier2d::prelude::*;

use super::{PhysicsWorld, StaticBodyDesc};

#[derive(Default)]
pub struct RapierWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub islands: IslandManager,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
}

impl RapierWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl PhysicsWorld for RapierWorld {
    type Handle = RigidBodyHandle;

    fn create_static_body(&mut self, desc: &StaticBodyDesc) -> Option<RigidBodyHandle> {
        if desc.is_degenerate() {
            return None;
        }
        let body = RigidBodyBuilder::fixed()
            .translation(vector![desc.position.x, desc.position.y])
            .rotation(desc.rotation)
            .build();
        let handle = self.bodies.insert(body);

        let groups = InteractionGroups::new(
            Group::from_bits_truncate(desc.filter.category),
            Group::from_bits_truncate(desc.filter.mask),
        );
        let collider = ColliderBuilder::cuboid(desc.size.x / 2.0, desc.size.y / 2.0)
            .friction(desc.material.friction)
            .restitution(desc.material.restitution)
            .collision_groups(groups)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        Some(handle)
    }

    fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }
}
