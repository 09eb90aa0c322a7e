//! Synthesis options.

use dtsmock_common::limits::DEFAULT_GLOBAL_BATCH_SIZE;
use dtsmock_graph::FxIndexMap;
use rustc_hash::FxHashSet;

/// Error-shaped first argument passed to async callbacks.
pub const DEFAULT_CALLBACK_ERROR: &str = "{code: '', data: '', name: '', message: '', stack: ''}";

/// Knobs that change the emitted text. Built by the root crate's config layer.
#[derive(Clone, Debug)]
pub struct SynthOptions {
    /// Object that ambient declarations are attached to.
    pub global_object: String,
    /// Statements per global-declaration batch.
    pub batch_size: usize,
    /// Batch name prefix; batch `i` (1-based) is `{prefix}{i}`.
    pub batch_prefix: String,
    /// Functions whose overloads are discriminated by a leading string literal.
    pub fine_discrimination: FxHashSet<String>,
    /// Host-owned globals: only the `_temp` shell is written, never the alias.
    pub window_declarations: FxHashSet<String>,
    pub callback_error: String,
    /// Extra name -> stub expression entries for types the corpus never defines.
    pub stub_types: FxIndexMap<String, String>,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            global_object: "global".to_string(),
            batch_size: DEFAULT_GLOBAL_BATCH_SIZE,
            batch_prefix: "globalDeclarations".to_string(),
            fine_discrimination: ["on", "off", "once", "emit"]
                .into_iter()
                .map(String::from)
                .collect(),
            window_declarations: ["window", "document", "console", "navigator", "location"]
                .into_iter()
                .map(String::from)
                .collect(),
            callback_error: DEFAULT_CALLBACK_ERROR.to_string(),
            stub_types: FxIndexMap::default(),
        }
    }
}
