//! Object pooling service.
//!
//! Pools are keyed by `(category, name)`. Producers ask the pool for a free entity and
//! the owner of the entity's "inactive" invariants pushes it back when done.
//!
//! The pool is a plain `Resource`: systems that need it take `ResMut<ObjectPool>`,
//! there is no global instance.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub category: String,
    pub name: String,
}

impl PoolKey {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }
}

/// Attached to every pooled entity so recycling systems know which free list it returns to.
#[derive(Component, Debug, Clone)]
pub struct Pooled(pub PoolKey);

#[derive(Resource, Debug, Default)]
pub struct ObjectPool {
    free: HashMap<PoolKey, Vec<Entity>>,
}

impl ObjectPool {
    /// Pop a free entity registered under `name` in `category`.
    ///
    /// `None` means the pool is exhausted (or was never filled): a capacity decision,
    /// callers drop their request.
    pub fn get_pooled_object(&mut self, name: &str, category: &str) -> Option<Entity> {
        let key = PoolKey::new(category, name);
        self.pop_free(&key)
    }

    pub fn pop_free(&mut self, key: &PoolKey) -> Option<Entity> {
        self.free.get_mut(key)?.pop()
    }

    pub fn release(&mut self, key: &PoolKey, entity: Entity) {
        match self.free.get_mut(key) {
            Some(list) => list.push(entity),
            None => {
                self.free.insert(key.clone(), vec![entity]);
            }
        }
    }

    pub fn free_count(&self, key: &PoolKey) -> usize {
        self.free.get(key).map_or(0, Vec::len)
    }

    pub fn clear(&mut self, key: &PoolKey) {
        if let Some(list) = self.free.get_mut(key) {
            list.clear();
        }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<ObjectPool>();
}
