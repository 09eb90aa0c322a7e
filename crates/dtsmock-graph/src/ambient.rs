//! Process-wide table of ambient (`declare`) names.

use crate::entity::{EntityId, FxIndexMap};

/// Ambient name -> first declaration. Later declarations of the same name are
/// chained onto the first one's `same_declares` by the graph.
#[derive(Debug, Default)]
pub struct AmbientTable {
    entries: FxIndexMap<String, EntityId>,
}

impl AmbientTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` under `name`. Returns the earlier declaration when the
    /// name was already taken; the table is left unchanged in that case.
    pub fn declare(&mut self, name: &str, id: EntityId) -> Option<EntityId> {
        if let Some(&first) = self.entries.get(name) {
            return Some(first);
        }
        self.entries.insert(name.to_string(), id);
        None
    }

    pub fn get(&self, name: &str) -> Option<EntityId> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, EntityId)> {
        self.entries.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
