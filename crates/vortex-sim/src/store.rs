//! Type-indexed entity store with deferred structural mutation.
//!
//! Entities are created in the hecs world immediately (so their components
//! can be inspected and tuned), but they only join the live, kind-indexed
//! lists at the next [`ObjectStore::maintain`]. Likewise a killed entity
//! keeps its slot until maintenance removes it and every child it owns.
//! Systems therefore never observe insertions or removals mid-pass.

use std::collections::HashSet;

use hecs::{Component, Entity, EntityBuilder, World};

use vortex_core::components::Body;
use vortex_core::enums::EntityKind;

use crate::links::Children;

/// Counts from one maintenance pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Maintenance {
    pub added: usize,
    pub removed: usize,
}

pub struct ObjectStore {
    world: World,
    /// Live entities per kind, in insertion order.
    live: [Vec<Entity>; EntityKind::COUNT],
    /// Live entities of physical kinds, in insertion order.
    physical: Vec<Entity>,
    pending_add: Vec<Entity>,
    pending_remove: Vec<Entity>,
    live_set: HashSet<Entity>,
    removal_buffer: HashSet<Entity>,
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            live: std::array::from_fn(|_| Vec::new()),
            physical: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            live_set: HashSet::new(),
            removal_buffer: HashSet::new(),
        }
    }

    /// Create an entity of `kind`. It becomes live at the next maintenance.
    pub fn spawn(&mut self, kind: EntityKind, builder: &mut EntityBuilder) -> Entity {
        builder.add(kind);
        let entity = self.world.spawn(builder.build());
        self.pending_add.push(entity);
        entity
    }

    /// Mark an entity dead. Removal happens at the next maintenance.
    /// Returns false when it was already dead or never existed.
    pub fn kill(&mut self, entity: Entity) -> bool {
        let newly_dead = self
            .update::<Body, _>(entity, |body| !std::mem::replace(&mut body.dead, true))
            .unwrap_or(false);
        if newly_dead {
            self.pending_remove.push(entity);
        }
        newly_dead
    }

    /// Dead, disposed, or never spawned.
    pub fn is_dead(&self, entity: Entity) -> bool {
        self.get::<Body>(entity).map_or(true, |body| body.dead)
    }

    /// Present in the live lists (may still be flagged dead this tick).
    pub fn is_live(&self, entity: Entity) -> bool {
        self.live_set.contains(&entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn kind(&self, entity: Entity) -> Option<EntityKind> {
        self.get::<EntityKind>(entity)
    }

    /// Live entities of one kind.
    pub fn live(&self, kind: EntityKind) -> &[Entity] {
        &self.live[kind.index()]
    }

    /// Live entities of physical kinds.
    pub fn physical(&self) -> &[Entity] {
        &self.physical
    }

    /// Entities created since the last maintenance, optionally filtered.
    pub fn pending(&self, kind: EntityKind) -> Vec<Entity> {
        self.pending_add
            .iter()
            .copied()
            .filter(|&e| self.kind(e) == Some(kind))
            .collect()
    }

    /// Live or pending entities of `kind` not flagged dead.
    pub fn count_active(&self, kind: EntityKind) -> usize {
        let live = self.live(kind).iter().filter(|&&e| !self.is_dead(e)).count();
        let pending = self
            .pending_add
            .iter()
            .filter(|&&e| self.kind(e) == Some(kind) && !self.is_dead(e))
            .count();
        live + pending
    }

    pub fn live_count(&self) -> usize {
        self.live_set.len()
    }

    /// Copy of one component.
    pub fn get<T: Component + Copy>(&self, entity: Entity) -> Option<T> {
        self.world.get::<&T>(entity).ok().map(|c| *c)
    }

    /// Mutate one component in place. The borrow ends before this returns.
    pub fn update<T: Component, R>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let mut component = self.world.get::<&mut T>(entity).ok()?;
        Some(f(&mut *component))
    }

    pub fn set<T: Component>(&mut self, entity: Entity, value: T) -> bool {
        self.update::<T, _>(entity, |c| *c = value).is_some()
    }

    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.world
            .entity(entity)
            .map(|e| e.has::<T>())
            .unwrap_or(false)
    }

    /// Add or replace a component after spawn.
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) -> bool {
        self.world.insert_one(entity, value).is_ok()
    }

    /// Register `child` for disposal together with `parent`.
    pub fn adopt(&mut self, parent: Entity, child: Entity) {
        let added = self
            .update::<Children, _>(parent, |children| children.0.push(child))
            .is_some();
        if !added {
            let _ = self.world.insert_one(parent, Children(vec![child]));
        }
    }

    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        self.world
            .get::<&Children>(entity)
            .map(|c| c.0.clone())
            .unwrap_or_default()
    }

    /// Read-only world access for hosts and snapshots.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Apply deferred removals (cascading to children), then deferred adds.
    pub fn maintain(&mut self) -> Maintenance {
        let removed = self.remove_dead();

        let mut added = 0;
        for entity in std::mem::take(&mut self.pending_add) {
            // Disposed before it ever went live (e.g. a parent died).
            let Some(kind) = self.kind(entity) else {
                continue;
            };
            self.live[kind.index()].push(entity);
            if kind.is_physical() {
                self.physical.push(entity);
            }
            self.live_set.insert(entity);
            added += 1;
        }

        Maintenance { added, removed }
    }

    /// Dispose of killed and dead-flagged entities (cascading to children)
    /// and drop them from every list. Pending adds stay queued.
    pub fn remove_dead(&mut self) -> usize {
        let mut removals = std::mem::take(&mut self.pending_remove);
        for (entity, body) in self.world.query_mut::<&Body>() {
            if body.dead {
                removals.push(entity);
            }
        }

        let mut removed = std::mem::take(&mut self.removal_buffer);
        removed.clear();
        for entity in removals {
            self.dispose(entity, &mut removed);
        }
        if !removed.is_empty() {
            for list in self.live.iter_mut() {
                list.retain(|e| !removed.contains(e));
            }
            self.physical.retain(|e| !removed.contains(e));
            for entity in &removed {
                self.live_set.remove(entity);
            }
        }
        let count = removed.len();
        self.removal_buffer = removed;
        count
    }

    fn dispose(&mut self, entity: Entity, removed: &mut HashSet<Entity>) {
        if !self.world.contains(entity) || !removed.insert(entity) {
            return;
        }
        for child in self.children(entity) {
            self.dispose(child, removed);
        }
        let _ = self.world.despawn(entity);
    }

    /// Drop everything, including queued adds and removals.
    pub fn clear(&mut self) {
        self.world.clear();
        for list in self.live.iter_mut() {
            list.clear();
        }
        self.physical.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
        self.live_set.clear();
    }
}
