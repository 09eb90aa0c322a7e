//! Run configuration (`dtsmock.json`).
//!
//! Every field is optional; unset fields take the synthesizer defaults. The
//! file may contain comments and trailing commas, and may `extends` a base
//! configuration whose values it overrides.

use anyhow::{Context, Result, anyhow, bail};
use dtsmock_graph::FxIndexMap;
use dtsmock_synth::SynthOptions;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MockConfig {
    /// Path of a base configuration, relative to this file.
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub batch_prefix: Option<String>,
    #[serde(default)]
    pub global_object: Option<String>,
    #[serde(default)]
    pub fine_discrimination: Option<Vec<String>>,
    #[serde(default)]
    pub window_declarations: Option<Vec<String>>,
    #[serde(default)]
    pub callback_error: Option<String>,
    #[serde(default)]
    pub stub_types: Option<FxIndexMap<String, String>>,
}

impl MockConfig {
    pub fn from_json_str(source: &str) -> Result<Self> {
        let normalized = normalize_jsonc(source);
        serde_json::from_str(&normalized).context("failed to parse dtsmock config JSON")
    }

    /// Load a config file, following `extends` chains.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut visited = FxHashSet::default();
        load_inner(path, &mut visited)
    }

    /// Resolve into synthesizer options. Later list entries are kept in
    /// order; `stubTypes` entries are added to the defaults.
    pub fn into_options(self) -> Result<SynthOptions> {
        let mut options = SynthOptions::default();

        if let Some(batch_size) = self.batch_size {
            if batch_size == 0 {
                bail!("batchSize must be at least 1");
            }
            options.batch_size = batch_size;
        }
        if let Some(prefix) = self.batch_prefix
            && !prefix.is_empty()
        {
            options.batch_prefix = prefix;
        }
        if let Some(global) = self.global_object {
            if global.trim().is_empty() {
                bail!("globalObject must not be empty");
            }
            options.global_object = global;
        }
        if let Some(names) = self.fine_discrimination {
            options.fine_discrimination = names.into_iter().collect();
        }
        if let Some(names) = self.window_declarations {
            options.window_declarations = names.into_iter().collect();
        }
        if let Some(callback_error) = self.callback_error {
            options.callback_error = callback_error;
        }
        if let Some(stub_types) = self.stub_types {
            options.stub_types.extend(stub_types);
        }
        Ok(options)
    }

    /// Overlay `self` on `base`: fields set here win.
    fn merged_over(self, base: MockConfig) -> MockConfig {
        let stub_types = match (base.stub_types, self.stub_types) {
            (Some(mut base_stubs), Some(child_stubs)) => {
                base_stubs.extend(child_stubs);
                Some(base_stubs)
            }
            (base_stubs, child_stubs) => child_stubs.or(base_stubs),
        };
        MockConfig {
            extends: None,
            batch_size: self.batch_size.or(base.batch_size),
            batch_prefix: self.batch_prefix.or(base.batch_prefix),
            global_object: self.global_object.or(base.global_object),
            fine_discrimination: self.fine_discrimination.or(base.fine_discrimination),
            window_declarations: self.window_declarations.or(base.window_declarations),
            callback_error: self.callback_error.or(base.callback_error),
            stub_types,
        }
    }
}

fn load_inner(path: &Path, visited: &mut FxHashSet<PathBuf>) -> Result<MockConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("config extends cycle detected at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = MockConfig::from_json_str(&source)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_path = resolve_extends_path(path, &extends)?;
        let base = load_inner(&base_path, visited)?;
        config = config.merged_over(base);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current
        .parent()
        .ok_or_else(|| anyhow!("config has no parent directory"))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }
    if candidate.is_absolute() {
        Ok(candidate)
    } else {
        Ok(base_dir.join(candidate))
    }
}

/// Drop `//` and `/* */` comments and trailing commas outside strings.
fn normalize_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;
    // Byte offset in `out` of the last comma not yet followed by a value.
    let mut pending_comma: Option<usize> = None;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '/' if chars.peek() == Some(&'/') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut previous = '\0';
                for skipped in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    previous = skipped;
                }
            }
            c if c.is_whitespace() => out.push(c),
            '}' | ']' => {
                if let Some(at) = pending_comma.take() {
                    out.remove(at);
                }
                out.push(ch);
            }
            ',' => {
                pending_comma = Some(out.len());
                out.push(ch);
            }
            _ => {
                pending_comma = None;
                in_string = ch == '"';
                out.push(ch);
            }
        }
    }
    out
}
