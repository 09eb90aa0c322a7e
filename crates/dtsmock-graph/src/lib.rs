//! Declaration graph for the dtsmock mock synthesizer.
//!
//! One [`Entity`] per parsed declaration or sub-expression, stored in an
//! [`EntityArena`] and addressed by [`EntityId`]. Within a file the `parent`
//! edges form a tree rooted at a `File` entity; heritage, property-chain,
//! import and global-dependency edges cross that tree and may form cycles,
//! which is why every cross reference is a handle rather than a pointer.

pub mod ambient;
pub mod arena;
pub mod dump;
pub mod entity;
pub mod graph;
pub mod registry;

pub use ambient::AmbientTable;
pub use arena::EntityArena;
pub use dump::{AccessorDump, EntityDump, FileDump, ImportBindingDump, KindDump};
pub use entity::{
    Entity, EntityFlags, EntityId, EntityKind, FxIndexMap, FxIndexSet, ImportBinding, ImportSpec,
    Members,
};
pub use graph::{Accessor, DeclarationGraph};
pub use registry::{FileId, FileRegistry, SourceFile};
