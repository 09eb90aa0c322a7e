//! Per-file mock module text.

use crate::error::SynthError;
use crate::session::Session;
use dtsmock_common::diagnostic_codes;
use dtsmock_graph::{EntityKind, FileId};
use tracing::{Level, debug, span};

/// `export` statement for a synthesized top-level member. Function bodies
/// become named function declarations.
fn export_statement(name: &str, body: &str, is_function: bool) -> String {
    if is_function {
        if let Some(rest) = body.strip_prefix("function*") {
            return format!("export function* {name}{rest}");
        }
        if let Some(rest) = body.strip_prefix("function") {
            return format!("export function {name}{rest}");
        }
    }
    format!("export const {name} = {body};")
}

impl Session {
    /// Mock module text for one file, or `None` when no member needs a mock.
    /// Empty files are added to the ignore set.
    pub fn generate_file(&mut self, file: FileId) -> Result<Option<String>, SynthError> {
        let Some(source) = self.graph.files.get(file) else {
            return Ok(None);
        };
        let root = source.root;
        let output_path = source.output_path.clone();
        let raw_path = source.raw_path.replace('\\', "/");
        let _span = span!(Level::DEBUG, "generate_file", file = %raw_path).entered();

        let mut lines = Vec::new();
        for (slot, member) in self.graph.arena.member_entries(root) {
            if slot == "default" {
                continue;
            }
            let entity = &self.graph.arena[member];
            if !entity.is_need_mock() || matches!(entity.kind, EntityKind::Import(_)) {
                continue;
            }

            if matches!(entity.kind, EntityKind::Export { .. }) {
                lines.push(self.synth(member, member, None)?);
                continue;
            }

            if entity.is_global_declare() {
                let global = self.global();
                let line = if self.options.window_declarations.contains(&slot) {
                    format!("export const {slot}={global}.{slot}_temp;")
                } else {
                    format!("export const {slot}={global}.{slot};")
                };
                lines.push(line);
            } else {
                let is_function = entity.kind.is_function();
                let property = entity.property;
                let body = self.synth(member, member, property)?;
                lines.push(export_statement(&slot, &body, is_function));
            }

            if self.graph.arena[member].is_default() {
                lines.push(format!("export default {};", self.graph.arena[member].key));
            }
        }

        if lines.is_empty() {
            self.ignored_files.insert(output_path);
            self.report(root, diagnostic_codes::EMPTY_OUTPUT, &[raw_path.as_str()]);
            return Ok(None);
        }
        debug!(statements = lines.len(), "generated file");
        Ok(Some(lines.join("\n")))
    }
}
