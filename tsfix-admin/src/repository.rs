use crate::model::Entity;
use std::sync::{Mutex, MutexGuard};

/// Storage port for one collection.
pub trait Repository<T: Entity>: Send + Sync {
    /// Every entry in insertion order.
    fn all(&self) -> Vec<T>;
    fn get(&self, id: u64) -> Option<T>;
    /// Stores `item` under the next free id (`max + 1`) and returns it.
    fn insert(&self, item: T) -> T;
    /// Replaces the entry with the same id; `None` when there is none.
    fn replace(&self, item: T) -> Option<T>;
    fn remove(&self, id: u64) -> Option<T>;
}

/// Process-lifetime collection behind a mutex.
#[derive(Debug, Default)]
pub struct InMemoryRepository<T> {
    items: Mutex<Vec<T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    fn all(&self) -> Vec<T> {
        self.lock().clone()
    }

    fn get(&self, id: u64) -> Option<T> {
        self.lock().iter().find(|i| i.id() == id).cloned()
    }

    fn insert(&self, mut item: T) -> T {
        let mut items = self.lock();
        let next = items.iter().map(Entity::id).max().unwrap_or(0) + 1;
        item.set_id(next);
        items.push(item.clone());
        item
    }

    fn replace(&self, item: T) -> Option<T> {
        let mut items = self.lock();
        let slot = items.iter_mut().find(|i| i.id() == item.id())?;
        Some(std::mem::replace(slot, item))
    }

    fn remove(&self, id: u64) -> Option<T> {
        let mut items = self.lock();
        let idx = items.iter().position(|i| i.id() == id)?;
        Some(items.remove(idx))
    }
}
