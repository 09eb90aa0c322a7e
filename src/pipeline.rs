//! End-to-end generation: normalize, per-file modules, then globals.

use anyhow::{Context, Result};
use dtsmock_common::Diagnostic;
use dtsmock_synth::{GlobalBatch, Session};
use tracing::{Level, debug, error, info, span};

/// Receives everything a run produces. Implemented by the collaborator that
/// writes mock files to disk.
pub trait OutputSink {
    fn write_file(&mut self, output_path: &str, content: &str) -> Result<()>;

    /// A file whose declarations produced no mock text.
    fn ignore_file(&mut self, output_path: &str) -> Result<()>;

    fn write_global_batch(&mut self, batch: &GlobalBatch) -> Result<()>;

    /// Import statement for the entry module that loads every batch.
    fn add_import(&mut self, statement: &str) -> Result<()>;
}

/// Keeps all output in memory, in the order it was produced.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: Vec<(String, String)>,
    pub ignored: Vec<String>,
    pub batches: Vec<GlobalBatch>,
    pub imports: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, output_path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(path, _)| path == output_path)
            .map(|(_, content)| content.as_str())
    }
}

impl OutputSink for MemorySink {
    fn write_file(&mut self, output_path: &str, content: &str) -> Result<()> {
        self.files
            .push((output_path.to_string(), content.to_string()));
        Ok(())
    }

    fn ignore_file(&mut self, output_path: &str) -> Result<()> {
        self.ignored.push(output_path.to_string());
        Ok(())
    }

    fn write_global_batch(&mut self, batch: &GlobalBatch) -> Result<()> {
        self.batches.push(batch.clone());
        Ok(())
    }

    fn add_import(&mut self, statement: &str) -> Result<()> {
        self.imports.push(statement.to_string());
        Ok(())
    }
}

/// Summary of one [`generate`] run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub files_written: usize,
    pub files_ignored: usize,
    /// Files aborted by a fatal synthesis error.
    pub files_failed: usize,
    pub batches: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerateReport {
    pub fn has_errors(&self) -> bool {
        self.files_failed > 0 || self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Run the whole pipeline over every registered file.
///
/// A fatal error in one file is recorded as an error diagnostic and the run
/// continues; a fatal error while emitting globals aborts the run.
pub fn generate(session: &mut Session, sink: &mut dyn OutputSink) -> Result<GenerateReport> {
    let _span = span!(Level::INFO, "generate").entered();
    let files: Vec<_> = session.graph.files.ids().collect();
    let mut report = GenerateReport::default();

    // Keys must be final before any member is looked up by name.
    for &file in &files {
        session
            .normalize_file(file)
            .with_context(|| format!("failed to normalize {}", session.graph.files.raw_path(file)))?;
    }

    for &file in &files {
        let Some(source) = session.graph.files.get(file) else {
            continue;
        };
        let output_path = source.output_path.clone();
        match session.generate_file(file) {
            Ok(Some(content)) => {
                sink.write_file(&output_path, &content)?;
                report.files_written += 1;
            }
            Ok(None) => {
                sink.ignore_file(&output_path)?;
                report.files_ignored += 1;
            }
            Err(err) => {
                error!(file = %output_path, "{err}");
                session.push_diagnostic(err.to_diagnostic());
                report.files_failed += 1;
            }
        }
    }

    let batches = session
        .emit_globals()
        .context("global declaration emission failed")?;
    for batch in &batches {
        sink.write_global_batch(batch)?;
        sink.add_import(&batch.import_statement)?;
    }
    report.batches = batches.len();
    report.diagnostics = session.take_diagnostics();

    info!(
        written = report.files_written,
        ignored = report.files_ignored,
        failed = report.files_failed,
        batches = report.batches,
        "generation finished"
    );
    debug!(diagnostics = report.diagnostics.len(), "diagnostics collected");
    Ok(report)
}
