//! File Registry - one record per input declaration file.

use crate::entity::EntityId;
use rustc_hash::FxHashMap;

/// Unique identifier for a registered file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A registered input file and the root of its entity tree.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub id: FileId,
    /// Path of the declaration file as discovered.
    pub raw_path: String,
    /// Path the mock module will be written to.
    pub output_path: String,
    /// The `File` entity owning every top-level declaration.
    pub root: EntityId,
}

impl SourceFile {
    /// File name without directories, for either separator style.
    pub fn base_name(&self) -> &str {
        self.raw_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.raw_path.as_str())
    }

    /// Platform modules (`@ohos.xxx.d.ts`, `@system.xxx.d.ts`, ...) carry the
    /// truly global declarations; other files only declare locally ambient
    /// names.
    pub fn is_platform_module(&self) -> bool {
        self.base_name().starts_with('@')
    }
}

/// All registered files, in registration order.
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: Vec<SourceFile>,
    by_path: FxHashMap<String, FileId>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next registered file will receive.
    pub fn next_id(&self) -> FileId {
        FileId(self.files.len() as u32)
    }

    /// Register a file. Both its raw and output paths become lookup keys.
    pub fn register(
        &mut self,
        raw_path: impl Into<String>,
        output_path: impl Into<String>,
        root: EntityId,
    ) -> FileId {
        let id = self.next_id();
        let raw_path = raw_path.into();
        let output_path = output_path.into();
        self.by_path.insert(raw_path.clone(), id);
        self.by_path.insert(output_path.clone(), id);
        self.files.push(SourceFile {
            id,
            raw_path,
            output_path,
            root,
        });
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    /// Find a file by raw or output path.
    pub fn lookup(&self, path: &str) -> Option<&SourceFile> {
        self.by_path.get(path).and_then(|&id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = FileId> + use<> {
        (0..self.files.len() as u32).map(FileId)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Raw path for diagnostics; unknown ids render as `<unknown>`.
    pub fn raw_path(&self, id: FileId) -> &str {
        self.get(id).map_or("<unknown>", |f| f.raw_path.as_str())
    }
}
