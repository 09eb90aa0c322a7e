//! Computed member key normalization.
//!
//! An `Expression` member (`[Symbol.iterator]() {}`) is rewritten in place:
//! its key becomes the synthesized operand text and its kind becomes
//! `Function` under a class, `Property` anywhere else.

use crate::error::SynthError;
use crate::session::Session;
use dtsmock_graph::{EntityFlags, EntityId, EntityKind, FileId};
use rustc_hash::FxHashSet;

impl Session {
    /// Normalize every computed member reachable from a file's root.
    pub fn normalize_file(&mut self, file: FileId) -> Result<(), SynthError> {
        let Some(root) = self.graph.file_root(file) else {
            return Ok(());
        };
        let mut visited = FxHashSet::default();
        let mut stack = vec![root];
        while let Some(owner) = stack.pop() {
            if !visited.insert(owner) {
                continue;
            }
            self.normalize_members(owner, owner)?;
            stack.extend(self.graph.arena[owner].members.values().copied());
        }
        Ok(())
    }

    /// Normalize the direct `Expression` members of `owner`. Already
    /// normalized members are left alone.
    pub(crate) fn normalize_members(
        &mut self,
        owner: EntityId,
        root: EntityId,
    ) -> Result<(), SynthError> {
        let as_function = matches!(self.graph.arena[owner].kind, EntityKind::Class);
        let members: Vec<EntityId> = self.graph.arena[owner].members.values().copied().collect();
        for member in members {
            let EntityKind::Expression { operands } = &self.graph.arena[member].kind else {
                continue;
            };
            let operands = operands.clone();
            let key = self.synth_joined(operands, root, " ")?;

            let entity = &mut self.graph.arena[member];
            entity.key = key;
            entity.kind = if as_function {
                EntityKind::Function
            } else {
                EntityKind::Property
            };
            entity.value = None;
            entity.flags |= EntityFlags::COMPUTED_KEY;
        }
        Ok(())
    }
}
