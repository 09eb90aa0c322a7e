//! JSON form of an extracted entity forest.
//!
//! ```json
//! {
//!   "rawPath": "api/@ohos.demo.d.ts",
//!   "outputPath": "mock/ohos_demo.js",
//!   "root": { "key": "api/@ohos.demo.d.ts", "kind": "file", "members": [
//!     { "key": "Color", "kind": "enum", "export": true, "members": [
//!       { "key": "RED", "kind": "value", "value": "0" }
//!     ] }
//!   ] }
//! }
//! ```

use crate::entity::{EntityFlags, EntityId, EntityKind, ImportBinding, ImportSpec};
use crate::graph::{Accessor, DeclarationGraph};
use crate::registry::FileId;
use serde::Deserialize;
use tracing::debug;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDump {
    pub raw_path: String,
    pub output_path: String,
    pub root: EntityDump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KindDump {
    Class,
    Module,
    Interface,
    Enum,
    Function,
    Variable,
    Property,
    Reference,
    Import,
    Export,
    Intersection,
    Expression,
    Value,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportBindingDump {
    Default,
    Namespace,
    Named,
}

impl From<ImportBindingDump> for ImportBinding {
    fn from(value: ImportBindingDump) -> Self {
        match value {
            ImportBindingDump::Default => ImportBinding::Default,
            ImportBindingDump::Namespace => ImportBinding::Namespace,
            ImportBindingDump::Named => ImportBinding::Named,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessorDump {
    Get,
    Set,
}

/// One entity. Ordered lists keep declaration order; a repeated function key
/// in `members` is an overload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDump {
    pub key: String,
    pub kind: KindDump,
    #[serde(default)]
    pub members: Vec<EntityDump>,
    #[serde(default)]
    pub type_parameters: Vec<EntityDump>,
    #[serde(default)]
    pub params: Vec<EntityDump>,
    #[serde(default)]
    pub constraint: Vec<EntityDump>,
    #[serde(default)]
    pub operands: Vec<EntityDump>,
    #[serde(default)]
    pub heritage: Option<Box<EntityDump>>,
    /// Property chain steps, outermost first.
    #[serde(default)]
    pub property: Vec<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub module_path: Option<String>,
    #[serde(default)]
    pub import_binding: Option<ImportBindingDump>,
    #[serde(default)]
    pub raw_name: Option<String>,
    #[serde(default)]
    pub specifier: Option<String>,
    #[serde(default)]
    pub accessor: Option<AccessorDump>,
    #[serde(default)]
    pub global_declare: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub export: bool,
    #[serde(default = "default_true")]
    pub need_mock: bool,
    #[serde(default)]
    pub arrow_function: bool,
}

impl EntityDump {
    fn entity_kind(&self) -> EntityKind {
        match self.kind {
            KindDump::Class => EntityKind::Class,
            KindDump::Module => EntityKind::Module,
            KindDump::Interface => EntityKind::Interface,
            KindDump::Enum => EntityKind::Enum,
            KindDump::Function => EntityKind::Function,
            KindDump::Variable => EntityKind::Variable,
            KindDump::Property => EntityKind::Property,
            KindDump::Reference => EntityKind::Reference,
            KindDump::Import => EntityKind::Import(ImportSpec {
                module_path: self.module_path.clone().unwrap_or_default(),
                binding: self
                    .import_binding
                    .map_or(ImportBinding::Named, ImportBinding::from),
                raw_name: self.raw_name.clone(),
            }),
            KindDump::Export => EntityKind::Export {
                specifier: self.specifier.clone().unwrap_or_else(|| self.key.clone()),
            },
            KindDump::Intersection => EntityKind::Intersection,
            KindDump::Expression => EntityKind::Expression {
                operands: Vec::new(),
            },
            KindDump::Value => EntityKind::Value,
            KindDump::File => EntityKind::File,
        }
    }

    fn flags(&self) -> EntityFlags {
        let mut flags = EntityFlags::empty();
        flags.set(EntityFlags::STATIC, self.is_static);
        flags.set(EntityFlags::DEFAULT, self.default);
        flags.set(EntityFlags::EXPORT, self.export);
        flags.set(EntityFlags::NEED_MOCK, self.need_mock);
        flags.set(EntityFlags::ARROW_FUNCTION, self.arrow_function);
        flags
    }
}

#[derive(Clone, Copy)]
enum Slot {
    Member,
    TypeParameter,
    Param,
    Constraint,
    Operand,
}

impl DeclarationGraph {
    /// Parse and load one file dump.
    pub fn load_json(&mut self, json: &str) -> serde_json::Result<FileId> {
        let dump: FileDump = serde_json::from_str(json)?;
        Ok(self.load_file_dump(&dump))
    }

    /// Allocate a dumped forest, register its file, and register every root
    /// member flagged global into the ambient table.
    pub fn load_file_dump(&mut self, dump: &FileDump) -> FileId {
        let (file, root) = self.add_file(dump.raw_path.clone(), dump.output_path.clone());
        self.arena[root].flags = dump.root.flags();
        self.load_children(root, &dump.root);

        let globals: Vec<EntityId> = dump
            .root
            .members
            .iter()
            .filter(|member| member.global_declare)
            .filter_map(|member| self.find_loaded_member(root, member))
            .collect();
        for id in globals {
            self.declare_global(id);
        }
        debug!(
            raw_path = %dump.raw_path,
            entities = self.arena.len(),
            ambient = self.ambient.len(),
            "loaded declaration dump"
        );
        file
    }

    /// Loaded id of a dumped root member. Overloads are not separately global.
    fn find_loaded_member(&self, root: EntityId, member: &EntityDump) -> Option<EntityId> {
        let slot = match member.accessor {
            Some(AccessorDump::Get) => Accessor::Get.slot(&member.key),
            Some(AccessorDump::Set) => Accessor::Set.slot(&member.key),
            None => member.key.clone(),
        };
        self.arena[root].member(&slot)
    }

    fn load_children(&mut self, owner: EntityId, dump: &EntityDump) {
        for member in &dump.members {
            self.load_entity(owner, member, Slot::Member);
        }
        for param in &dump.type_parameters {
            self.load_entity(owner, param, Slot::TypeParameter);
        }
        for param in &dump.params {
            self.load_entity(owner, param, Slot::Param);
        }
        for item in &dump.constraint {
            self.load_entity(owner, item, Slot::Constraint);
        }
        for operand in &dump.operands {
            self.load_entity(owner, operand, Slot::Operand);
        }
        if let Some(heritage) = &dump.heritage {
            let id = self.set_heritage(owner, &heritage.key);
            self.fill(id, heritage);
        }
        for step in &dump.property {
            self.push_property(owner, step);
        }
    }

    fn load_entity(&mut self, owner: EntityId, dump: &EntityDump, slot: Slot) -> EntityId {
        let kind = dump.entity_kind();
        let id = match (slot, dump.accessor) {
            (Slot::Member, Some(AccessorDump::Get)) => {
                self.add_accessor(owner, &dump.key, Accessor::Get)
            }
            (Slot::Member, Some(AccessorDump::Set)) => {
                self.add_accessor(owner, &dump.key, Accessor::Set)
            }
            (Slot::Member, None) => self.add_member(owner, &dump.key, kind),
            (Slot::TypeParameter, _) => self.add_type_parameter(owner, &dump.key, kind),
            (Slot::Param, _) => self.add_param(owner, &dump.key, kind),
            (Slot::Constraint, _) => self.add_constraint(owner, &dump.key, kind),
            (Slot::Operand, _) => self.add_operand(owner, &dump.key, kind),
        };
        self.fill(id, dump);
        id
    }

    fn fill(&mut self, id: EntityId, dump: &EntityDump) {
        let accessor_flags = self.arena[id].flags & (EntityFlags::GETTER | EntityFlags::SETTER);
        self.arena[id].flags = dump.flags() | accessor_flags;
        if let Some(value) = &dump.value {
            self.arena[id].value = Some(value.clone());
        }
        self.load_children(id, dump);
    }
}
