//! The entity [`Registry`]: single owner of the population.
//!
//! Entities live in one `Vec` behind a reader/writer lock. Nothing hands
//! out references that outlive a critical section: callers either get
//! clones, or run a closure against the locked slice via
//! [`read`](Registry::read) / [`write`](Registry::write) and address
//! entities by [`EntityId`].
//!
//! The registry only grows (seeding) or is replaced wholesale (load).
//! Death is a flag on the entity, never a removal, so ids stay valid.

use std::sync::{PoisonError, RwLock};

use brawl_core::{Entity, EntityId, KindCounts};

/// Shared, synchronized entity collection.
#[derive(Debug, Default)]
pub struct Registry {
    entities: RwLock<Vec<Entity>>,
}

// Compile-time assertion: Registry must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Registry>();
};

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with `entities`, in order.
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        Self {
            entities: RwLock::new(entities),
        }
    }

    /// Run `f` against the population under a shared lock.
    pub fn read<R>(&self, f: impl FnOnce(&[Entity]) -> R) -> R {
        let guard = self.entities.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run `f` against the population under the exclusive lock.
    ///
    /// The slice cannot grow or shrink; only entity state changes.
    pub fn write<R>(&self, f: impl FnOnce(&mut [Entity]) -> R) -> R {
        let mut guard = self
            .entities
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Append an entity, returning its id.
    ///
    /// Entities outside the world bounds are not added.
    pub fn push(&self, entity: Entity) -> Option<EntityId> {
        if !entity.position().in_bounds() {
            tracing::debug!(
                name = entity.name(),
                x = entity.x(),
                y = entity.y(),
                "rejected out-of-bounds entity"
            );
            return None;
        }
        let mut guard = self
            .entities
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let id = EntityId(guard.len() as u32);
        guard.push(entity);
        Some(id)
    }

    /// Replace the whole population. Used by load.
    pub fn replace_all(&self, entities: Vec<Entity>) {
        *self
            .entities
            .write()
            .unwrap_or_else(PoisonError::into_inner) = entities;
    }

    /// Total number of entities, living or dead.
    pub fn len(&self) -> usize {
        self.read(|e| e.len())
    }

    /// Whether the registry holds no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of living entities.
    pub fn alive_count(&self) -> usize {
        self.read(|e| e.iter().filter(|e| e.is_alive()).count())
    }

    /// Ids of living entities in registry order.
    pub fn living_ids(&self) -> Vec<EntityId> {
        self.read(|entities| {
            entities
                .iter()
                .enumerate()
                .filter(|(_, e)| e.is_alive())
                .map(|(i, _)| EntityId(i as u32))
                .collect()
        })
    }

    /// Clone of one entity.
    pub fn get(&self, id: EntityId) -> Option<Entity> {
        self.read(|e| e.get(id.index()).cloned())
    }

    /// Clone of the whole population.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.read(|e| e.to_vec())
    }

    /// Clone of the living population.
    pub fn survivors(&self) -> Vec<Entity> {
        self.read(|e| e.iter().filter(|e| e.is_alive()).cloned().collect())
    }

    /// Living entities tallied by kind.
    pub fn kind_counts(&self) -> KindCounts {
        self.read(|entities| {
            let mut counts = KindCounts::default();
            for e in entities.iter().filter(|e| e.is_alive()) {
                counts.add(e.kind());
            }
            counts
        })
    }
}
