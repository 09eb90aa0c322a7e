//! Synthesis session: the graph plus all mutable state of one run.

use crate::options::SynthOptions;
use dtsmock_common::Diagnostic;
use dtsmock_graph::{DeclarationGraph, EntityId, FileDump, FileId, FxIndexSet};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{info, warn};

/// Counters for the synthesis walk.
#[derive(Clone, Debug, Default)]
pub struct SynthStats {
    /// Kind-specific branches executed (memo hits excluded).
    pub dispatches: u64,
    pub memo_hits: u64,
    pub back_references: u64,
    pub by_kind: FxHashMap<&'static str, u64>,
}

impl SynthStats {
    pub fn dispatches_of(&self, kind: &str) -> u64 {
        self.by_kind.get(kind).copied().unwrap_or(0)
    }
}

/// One synthesis run.
///
/// Memoized text and `MOCKED` flags live on the entities themselves, so the
/// session must be driven from a single thread.
pub struct Session {
    pub graph: DeclarationGraph,
    pub options: SynthOptions,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) ignored_files: FxIndexSet<String>,
    pub(crate) stats: SynthStats,
    /// Entities currently being synthesized, outermost first.
    pub(crate) path: SmallVec<[EntityId; 16]>,
    /// Shallowest path index a `this` back reference pointed at in the
    /// subtree being synthesized; `usize::MAX` when there was none.
    pub(crate) back_reference_floor: usize,
    /// Ambient declarations whose full emission finished.
    pub(crate) emitted_globals: FxHashSet<EntityId>,
    /// Ambient declarations whose emission is in progress.
    pub(crate) emitting_globals: FxHashSet<EntityId>,
    /// Assignment targets (`Name_temp.prototype.key`) already written.
    pub(crate) emitted_members: FxHashSet<String>,
}

impl Session {
    pub fn new(options: SynthOptions) -> Self {
        Self::with_graph(DeclarationGraph::new(), options)
    }

    pub fn with_graph(graph: DeclarationGraph, options: SynthOptions) -> Self {
        Self {
            graph,
            options,
            diagnostics: Vec::new(),
            ignored_files: FxIndexSet::default(),
            stats: SynthStats::default(),
            path: SmallVec::new(),
            back_reference_floor: usize::MAX,
            emitted_globals: FxHashSet::default(),
            emitting_globals: FxHashSet::default(),
            emitted_members: FxHashSet::default(),
        }
    }

    pub fn load_file_dump(&mut self, dump: &FileDump) -> FileId {
        self.graph.load_file_dump(dump)
    }

    pub fn load_json(&mut self, json: &str) -> serde_json::Result<FileId> {
        self.graph.load_json(json)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Output paths of files that produced no mock text.
    pub fn ignored_files(&self) -> impl Iterator<Item = &str> {
        self.ignored_files.iter().map(String::as_str)
    }

    pub fn is_ignored(&self, output_path: &str) -> bool {
        self.ignored_files.contains(output_path)
    }

    pub fn stats(&self) -> &SynthStats {
        &self.stats
    }

    /// Record a diagnostic against the file `at` was declared in. Returns the
    /// formatted message.
    pub(crate) fn report(&mut self, at: EntityId, code: u32, args: &[&str]) -> String {
        let file = self.graph.raw_path_of(at).replace('\\', "/");
        let diagnostic = Diagnostic::from_code(file, code, args);
        if diagnostic.is_error() {
            warn!(code, file = %diagnostic.file, "{}", diagnostic.message_text);
        } else if code == dtsmock_common::diagnostic_codes::EMPTY_OUTPUT {
            info!(file = %diagnostic.file, "{}", diagnostic.message_text);
        } else {
            warn!(code, "{}", diagnostic.message_text);
        }
        let message = diagnostic.message_text.clone();
        self.diagnostics.push(diagnostic);
        message
    }

    /// Report and return the message as a single-quoted string literal, the
    /// stand-in value for whatever could not be synthesized.
    pub(crate) fn placeholder(&mut self, at: EntityId, code: u32, args: &[&str]) -> String {
        let message = self.report(at, code, args);
        format!("'{}'", message.replace('\\', "/").replace('\'', "\\'"))
    }

    pub(crate) fn global(&self) -> &str {
        &self.options.global_object
    }
}
