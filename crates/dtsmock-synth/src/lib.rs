//! Symbol resolution and mock synthesis over a [`dtsmock_graph::DeclarationGraph`].
//!
//! Everything runs on one [`Session`]: the resolver, the heritage merger, the
//! computed-key normalizer, the per-kind synthesizer, the per-file emitter and
//! the global declaration emitter are all `impl Session` blocks split across
//! the `session_*` modules.

pub mod error;
pub mod intrinsics;
pub mod options;
mod session;
mod session_callables;
mod session_files;
mod session_globals;
mod session_merge;
mod session_normalize;
mod session_resolve;
mod session_synth;

pub use error::SynthError;
pub use options::{DEFAULT_CALLBACK_ERROR, SynthOptions};
pub use session::{Session, SynthStats};
pub use session_globals::GlobalBatch;
pub use session_resolve::Resolution;
