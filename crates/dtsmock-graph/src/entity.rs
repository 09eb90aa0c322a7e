//! Entity node types.

use crate::registry::FileId;
use bitflags::bitflags;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Ordered name -> entity mapping. Insertion order is emission order.
pub type Members = FxIndexMap<String, EntityId>;

/// Stable handle to an entity in the [`crate::EntityArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How an import binds the exporting file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportBinding {
    /// `import X from 'm'`
    Default,
    /// `import * as X from 'm'`
    Namespace,
    /// `import { X } from 'm'` / `import { Y as X } from 'm'`
    Named,
}

/// Target of an `Import` entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSpec {
    /// Raw or output path of the exporting file, as known to the registry.
    pub module_path: String,
    pub binding: ImportBinding,
    /// Exported name when the local name is an alias (`{ Y as X }` -> `Y`).
    pub raw_name: Option<String>,
}

impl ImportSpec {
    pub fn named(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            binding: ImportBinding::Named,
            raw_name: None,
        }
    }

    pub fn default_import(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            binding: ImportBinding::Default,
            raw_name: None,
        }
    }

    pub fn namespace(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            binding: ImportBinding::Namespace,
            raw_name: None,
        }
    }
}

/// Entity kind. Variants carry the data only that kind needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Class,
    Module,
    Interface,
    Enum,
    Function,
    Variable,
    Property,
    Reference,
    Import(ImportSpec),
    /// `export * from '<specifier>'`
    Export {
        specifier: String,
    },
    Intersection,
    /// Computed member name such as `[Symbol.iterator]`; `operands` are joined
    /// into the normalized key.
    Expression {
        operands: Vec<EntityId>,
    },
    Value,
    File,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Class => "class",
            EntityKind::Module => "module",
            EntityKind::Interface => "interface",
            EntityKind::Enum => "enum",
            EntityKind::Function => "function",
            EntityKind::Variable => "variable",
            EntityKind::Property => "property",
            EntityKind::Reference => "reference",
            EntityKind::Import(_) => "import",
            EntityKind::Export { .. } => "export",
            EntityKind::Intersection => "intersection",
            EntityKind::Expression { .. } => "expression",
            EntityKind::Value => "value",
            EntityKind::File => "file",
        }
    }

    /// Kinds that own a member shell: back references to them become
    /// `this`/global paths, and the global emitter pre-declares them.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            EntityKind::Class | EntityKind::Module | EntityKind::Interface
        )
    }

    pub fn is_function(&self) -> bool {
        matches!(self, EntityKind::Function)
    }
}

bitflags! {
    /// Declaration and bookkeeping flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct EntityFlags: u16 {
        const GLOBAL_DECLARE = 1 << 0;
        const STATIC = 1 << 1;
        const DEFAULT = 1 << 2;
        const EXPORT = 1 << 3;
        const NEED_MOCK = 1 << 4;
        /// Set once the global emitter has written this member.
        const MOCKED = 1 << 5;
        const ARROW_FUNCTION = 1 << 6;
        /// Key was rewritten from a computed `Expression` name.
        const COMPUTED_KEY = 1 << 7;
        /// `get name()` accessor; stored under the member slot `get name`.
        const GETTER = 1 << 8;
        /// `set name(v)` accessor; stored under the member slot `set name`.
        const SETTER = 1 << 9;
    }
}

/// One declaration or sub-expression.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Display/identifier name. Rewritten when a computed key is normalized.
    pub key: String,
    pub kind: EntityKind,
    /// File the entity was declared in.
    pub file: FileId,
    pub members: Members,
    pub type_parameters: Members,
    /// Call parameters (functions), operands (intersections) or constructor
    /// arguments (references to host intrinsics).
    pub params: Members,
    pub constraint: Members,
    /// Other overloads of the same callable name.
    pub same_name: Vec<EntityId>,
    /// Duplicate ambient declarations of the same global name.
    pub same_declares: Vec<EntityId>,
    pub heritage: Option<EntityId>,
    /// Next step of an explicit property chain (`A.b.c`).
    pub property: Option<EntityId>,
    /// Lexically enclosing entity. Never followed for emission.
    pub parent: Option<EntityId>,
    /// Ambient entities referenced by this entity's synthesized body.
    pub depend_on_globals: FxIndexSet<EntityId>,
    /// Memoized synthesized text; write-once.
    pub value: Option<String>,
    pub flags: EntityFlags,
}

impl Entity {
    pub fn new(key: impl Into<String>, kind: EntityKind, file: FileId) -> Self {
        Self {
            key: key.into(),
            kind,
            file,
            members: Members::default(),
            type_parameters: Members::default(),
            params: Members::default(),
            constraint: Members::default(),
            same_name: Vec::new(),
            same_declares: Vec::new(),
            heritage: None,
            property: None,
            parent: None,
            depend_on_globals: FxIndexSet::default(),
            value: None,
            flags: EntityFlags::NEED_MOCK,
        }
    }

    #[inline]
    pub fn is_global_declare(&self) -> bool {
        self.flags.contains(EntityFlags::GLOBAL_DECLARE)
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(EntityFlags::STATIC)
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.flags.contains(EntityFlags::DEFAULT)
    }

    #[inline]
    pub fn is_need_mock(&self) -> bool {
        self.flags.contains(EntityFlags::NEED_MOCK)
    }

    #[inline]
    pub fn is_mocked(&self) -> bool {
        self.flags.contains(EntityFlags::MOCKED)
    }

    #[inline]
    pub fn has_computed_key(&self) -> bool {
        self.flags.contains(EntityFlags::COMPUTED_KEY)
    }

    #[inline]
    pub fn is_accessor(&self) -> bool {
        self.flags.intersects(EntityFlags::GETTER | EntityFlags::SETTER)
    }

    pub fn member(&self, name: &str) -> Option<EntityId> {
        self.members.get(name).copied()
    }
}
