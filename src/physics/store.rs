use std::collections::BTreeMap;

use super::{PhysicsWorld, StaticBodyDesc};

/// [`StaticBodyStore`] 的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

/// 内存中的静态刚体世界
///
/// 保存全部刚体描述, 供查看器叠加显示。可设容量上限。
#[derive(Debug, Default)]
pub struct StaticBodyStore {
    bodies: BTreeMap<BodyId, StaticBodyDesc>,
    next_id: u32,
    capacity: Option<usize>,
    rejected: usize,
}

impl StaticBodyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 存活数达到 `capacity` 后拒绝新刚体
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// 被拒绝的刚体数
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn get(&self, id: BodyId) -> Option<&StaticBodyDesc> {
        self.bodies.get(&id)
    }

    /// 按创建顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &StaticBodyDesc)> {
        self.bodies.iter().map(|(id, desc)| (*id, desc))
    }
}

impl PhysicsWorld for StaticBodyStore {
    type Handle = BodyId;

    fn create_static_body(&mut self, desc: &StaticBodyDesc) -> Option<BodyId> {
        let full = self.capacity.is_some_and(|cap| self.bodies.len() >= cap);
        if full || desc.is_degenerate() {
            self.rejected += 1;
            return None;
        }
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, *desc);
        Some(id)
    }

    fn remove_body(&mut self, handle: BodyId) {
        if self.bodies.remove(&handle).is_none() {
            log::debug!("remove_body: {:?} was not alive", handle);
        }
    }
}
