//! dtsmock: mock module synthesis for ambient TypeScript declaration corpora.
//!
//! The heavy lifting lives in the workspace crates; this facade adds the run
//! configuration, tracing setup and the end-to-end pipeline.
//!
//! ```no_run
//! use dtsmock::{MemorySink, MockConfig, Session, generate};
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = MockConfig::from_file("dtsmock.json".as_ref())?.into_options()?;
//! let mut session = Session::new(options);
//! session.load_json(&std::fs::read_to_string("api/@ohos.demo.json")?)?;
//! let mut sink = MemorySink::new();
//! let report = generate(&mut session, &mut sink)?;
//! assert!(!report.has_errors());
//! # Ok(())
//! # }
//! ```

pub use dtsmock_common::{Diagnostic, DiagnosticCategory};
pub use dtsmock_graph::{DeclarationGraph, EntityId, EntityKind, FileDump, FileId};
pub use dtsmock_synth::{GlobalBatch, Session, SynthError, SynthOptions};

// Run configuration (dtsmock.json)
pub mod config;
pub use config::MockConfig;
#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;

// Tracing subscriber setup (DTSMOCK_LOG / DTSMOCK_LOG_FORMAT)
pub mod tracing_config;

// Normalize -> per-file modules -> global batches
pub mod pipeline;
pub use pipeline::{GenerateReport, MemorySink, OutputSink, generate};
#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod pipeline_tests;
