//! Declaration graph builder.
//!
//! The extraction collaborator drives these methods (directly or through a
//! [`crate::FileDump`]) to build one entity forest per file. Every method that
//! takes an owner id wires the new entity's `parent` and `file` from it.

use crate::ambient::AmbientTable;
use crate::arena::EntityArena;
use crate::entity::{Entity, EntityFlags, EntityId, EntityKind};
use crate::registry::{FileId, FileRegistry};
use tracing::debug;

/// Which accessor half a member is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accessor {
    Get,
    Set,
}

impl Accessor {
    pub fn slot(self, name: &str) -> String {
        match self {
            Accessor::Get => format!("get {name}"),
            Accessor::Set => format!("set {name}"),
        }
    }

    fn flag(self) -> EntityFlags {
        match self {
            Accessor::Get => EntityFlags::GETTER,
            Accessor::Set => EntityFlags::SETTER,
        }
    }
}

/// Entity arena, file registry and ambient-name table for one run.
#[derive(Debug, Default)]
pub struct DeclarationGraph {
    pub arena: EntityArena,
    pub files: FileRegistry,
    pub ambient: AmbientTable,
}

impl DeclarationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and allocate its `File` root. The root's key is the raw
    /// path, so key paths of nested entities start with the file.
    pub fn add_file(
        &mut self,
        raw_path: impl Into<String>,
        output_path: impl Into<String>,
    ) -> (FileId, EntityId) {
        let raw_path = raw_path.into();
        let file = self.files.next_id();
        let root = self.arena.alloc(raw_path.clone(), EntityKind::File, file);
        let registered = self.files.register(raw_path, output_path, root);
        debug_assert_eq!(file, registered);
        (file, root)
    }

    fn child(&mut self, owner: EntityId, key: &str, kind: EntityKind) -> EntityId {
        let file = self.arena[owner].file;
        let mut entity = Entity::new(key, kind, file);
        entity.parent = Some(owner);
        self.arena.push(entity)
    }

    /// Add a member under its own key.
    ///
    /// A second function with the key of an existing function member becomes
    /// an overload: it is appended to the first one's `same_name` list and
    /// not inserted into the member map.
    pub fn add_member(&mut self, owner: EntityId, key: &str, kind: EntityKind) -> EntityId {
        let is_function = kind.is_function();
        let id = self.child(owner, key, kind);
        self.insert_member(owner, key.to_string(), id, is_function);
        id
    }

    /// Add a getter or setter. Both halves of a pair share the entity key and
    /// live under distinct `get name` / `set name` slots.
    pub fn add_accessor(&mut self, owner: EntityId, key: &str, accessor: Accessor) -> EntityId {
        let id = self.child(owner, key, EntityKind::Function);
        self.arena[id].flags |= accessor.flag();
        self.insert_member(owner, accessor.slot(key), id, false);
        id
    }

    fn insert_member(&mut self, owner: EntityId, slot: String, id: EntityId, is_function: bool) {
        let existing = self.arena[owner].members.get(&slot).copied();
        match existing {
            Some(first) if is_function && self.arena[first].kind.is_function() => {
                self.arena[first].same_name.push(id);
            }
            _ => {
                self.arena[owner].members.insert(slot, id);
            }
        }
    }

    pub fn add_type_parameter(&mut self, owner: EntityId, key: &str, kind: EntityKind) -> EntityId {
        let id = self.child(owner, key, kind);
        self.arena[owner].type_parameters.insert(key.to_string(), id);
        id
    }

    pub fn add_param(&mut self, owner: EntityId, key: &str, kind: EntityKind) -> EntityId {
        let id = self.child(owner, key, kind);
        self.arena[owner].params.insert(key.to_string(), id);
        id
    }

    pub fn add_constraint(&mut self, owner: EntityId, key: &str, kind: EntityKind) -> EntityId {
        let id = self.child(owner, key, kind);
        self.arena[owner].constraint.insert(key.to_string(), id);
        id
    }

    /// Append an operand to an `Expression` entity.
    pub fn add_operand(&mut self, owner: EntityId, key: &str, kind: EntityKind) -> EntityId {
        let id = self.child(owner, key, kind);
        if let EntityKind::Expression { operands } = &mut self.arena[owner].kind {
            operands.push(id);
        }
        id
    }

    /// Add a member whose synthesized text is fixed (enum values, literal
    /// initializers).
    pub fn add_value_member(&mut self, owner: EntityId, key: &str, value: &str) -> EntityId {
        let id = self.add_member(owner, key, EntityKind::Value);
        self.arena[id].value = Some(value.to_string());
        id
    }

    /// Set the supertype reference of a class or interface.
    pub fn set_heritage(&mut self, owner: EntityId, key: &str) -> EntityId {
        let id = self.child(owner, key, EntityKind::Reference);
        self.arena[owner].heritage = Some(id);
        id
    }

    /// Append one step to `owner`'s property chain (`A.b.c` is `A` with steps
    /// `b` then `c`).
    pub fn push_property(&mut self, owner: EntityId, key: &str) -> EntityId {
        let mut tail = owner;
        while let Some(next) = self.arena[tail].property {
            tail = next;
        }
        let id = self.child(tail, key, EntityKind::Reference);
        self.arena[tail].property = Some(id);
        id
    }

    pub fn set_flags(&mut self, id: EntityId, flags: EntityFlags) {
        self.arena[id].flags |= flags;
    }

    /// Flag `id` ambient and register it. A name declared before becomes a
    /// duplicate of its first declaration.
    pub fn declare_global(&mut self, id: EntityId) {
        self.arena[id].flags |= EntityFlags::GLOBAL_DECLARE;
        let key = self.arena[id].key.clone();
        if let Some(first) = self.ambient.declare(&key, id) {
            if first != id {
                debug!(name = %key, first = first.0, duplicate = id.0, "duplicate ambient declaration");
                self.arena[first].same_declares.push(id);
            }
        }
    }

    /// Root entity of a registered file.
    pub fn file_root(&self, file: FileId) -> Option<EntityId> {
        self.files.get(file).map(|f| f.root)
    }

    /// Raw path of the file an entity was declared in.
    pub fn raw_path_of(&self, id: EntityId) -> &str {
        self.files.raw_path(self.arena[id].file)
    }

    /// Whether the entity was declared in a platform module file.
    pub fn is_platform_entity(&self, id: EntityId) -> bool {
        self.files
            .get(self.arena[id].file)
            .is_some_and(|f| f.is_platform_module())
    }

    /// `.b.c` for a property chain starting at `step`.
    pub fn property_suffix(&self, mut step: Option<EntityId>) -> String {
        let mut out = String::new();
        while let Some(id) = step {
            out.push('.');
            out.push_str(&self.arena[id].key);
            step = self.arena[id].property;
        }
        out
    }
}
