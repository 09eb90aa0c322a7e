//! Heritage merge for classes and interfaces.

use crate::error::SynthError;
use crate::session::Session;
use dtsmock_graph::{EntityFlags, EntityId, EntityKind};
use tracing::debug;

impl Session {
    /// Copy the supertype's members into `id` where `id` has no member of the
    /// same name. Own members always win.
    ///
    /// Copies are fresh entities: marking one mocked during global emission
    /// never affects the supertype.
    pub(crate) fn merge_heritage(
        &mut self,
        id: EntityId,
        root: EntityId,
    ) -> Result<(), SynthError> {
        let Some(heritage) = self.graph.arena[id].heritage else {
            return Ok(());
        };
        let resolution = self.resolve(heritage, root)?;
        let base = self.entity_along_chain(resolution.entity, resolution.remaining);
        if base == id || !self.graph.arena[base].kind.is_container() {
            return Ok(());
        }
        // Settles the supertype's own heritage and computed keys.
        self.synth(base, root, None)?;

        let mut copied = 0usize;
        for (slot, member) in self.graph.arena.member_entries(base) {
            let computed = match &self.graph.arena[member].kind {
                EntityKind::Expression { operands } => Some(operands.clone()),
                _ => None,
            };
            let slot = match &computed {
                Some(operands) => self.synth_joined(operands.iter().copied(), root, " ")?,
                None => slot,
            };
            if self.graph.arena[id].members.contains_key(&slot) {
                continue;
            }

            let mut copy = self.graph.arena[member].clone();
            copy.flags.remove(EntityFlags::MOCKED);
            copy.parent = Some(id);
            if computed.is_some() {
                copy.key = slot.clone();
                copy.kind = EntityKind::Property;
                copy.value = None;
                copy.flags |= EntityFlags::COMPUTED_KEY;
            }
            let copy = self.graph.arena.push(copy);
            self.graph.arena[id].members.insert(slot, copy);
            copied += 1;
        }
        debug!(
            derived = %self.graph.arena[id].key,
            base = %self.graph.arena[base].key,
            copied,
            "merged heritage"
        );
        Ok(())
    }
}
