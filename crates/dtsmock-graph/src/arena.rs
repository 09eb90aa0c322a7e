//! Entity arena.

use crate::entity::{Entity, EntityId, EntityKind};
use crate::registry::FileId;
use dtsmock_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use std::ops::{Index, IndexMut};

/// Owns every entity of a run. Entities are never removed.
#[derive(Debug, Default)]
pub struct EntityArena {
    entities: Vec<Entity>,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, key: impl Into<String>, kind: EntityKind, file: FileId) -> EntityId {
        self.push(Entity::new(key, kind, file))
    }

    pub fn push(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(entity);
        id
    }

    /// Allocate a `Value` entity whose synthesized text is fixed up front.
    pub fn alloc_value(&mut self, key: impl Into<String>, value: String, file: FileId) -> EntityId {
        let mut entity = Entity::new(key, EntityKind::Value, file);
        entity.value = Some(value);
        self.push(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Keys from the outermost ancestor down to `id`, inclusive.
    pub fn key_path(&self, id: EntityId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let Some(entity) = self.get(cur) else {
                break;
            };
            path.push(entity.key.clone());
            current = entity.parent;
            if path.len() > MAX_SCOPE_WALK_ITERATIONS {
                break;
            }
        }
        path.reverse();
        path
    }

    /// Snapshot of a member map's entries, for walks that mutate the arena.
    pub fn member_entries(&self, id: EntityId) -> Vec<(String, EntityId)> {
        self[id]
            .members
            .iter()
            .map(|(name, &member)| (name.clone(), member))
            .collect()
    }
}

impl Index<EntityId> for EntityArena {
    type Output = Entity;

    fn index(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }
}

impl IndexMut<EntityId> for EntityArena {
    fn index_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.index()]
    }
}
