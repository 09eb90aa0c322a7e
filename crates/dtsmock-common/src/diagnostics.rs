//! Diagnostic types and message lookup for mock synthesis.
//!
//! Synthesis never stops for a recoverable condition; it records one of these
//! diagnostics and substitutes a placeholder value. Fatal conditions are
//! returned as errors by the synthesizer and mirrored here for reporting.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Message = 3,
}

/// A synthesis diagnostic attached to the file being processed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a diagnostic from a message table entry, filling its placeholders.
    ///
    /// Unknown codes produce an error diagnostic carrying the raw arguments.
    #[must_use]
    pub fn from_code(file: impl Into<String>, code: u32, args: &[&str]) -> Self {
        let (category, message_text) = match get_diagnostic_message(code) {
            Some(message) => (message.category, format_message(message.message, args)),
            None => (DiagnosticCategory::Error, args.join(" ")),
        };
        Self {
            file: file.into(),
            message_text,
            category,
            code,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.category {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Message => "message",
        };
        write!(f, "{}: {label} DM{}: {}", self.file, self.code, self.message_text)
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const UNRESOLVED_SYMBOL: u32 = 9001;
    pub const MISSING_EXPORT: u32 = 9002;
    pub const MISSING_DEFAULT_EXPORT: u32 = 9003;
    pub const UNREGISTERED_MODULE: u32 = 9004;
    pub const EMPTY_OUTPUT: u32 = 9005;
    pub const MISSING_CHAIN_MEMBER: u32 = 9006;
    pub const MISSING_PROPERTY_PATH: u32 = 9007;
    pub const INCONSISTENT_GLOBAL_DEPENDENCY: u32 = 9008;
    pub const SYNTH_DEPTH_EXCEEDED: u32 = 9009;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::UNRESOLVED_SYMBOL,
        category: DiagnosticCategory::Warning,
        message: "Cannot find type definition for {0} from file {1}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_EXPORT,
        category: DiagnosticCategory::Warning,
        message: "Not exported {0} from {1} in {2}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_DEFAULT_EXPORT,
        category: DiagnosticCategory::Warning,
        message: "The file: {0} does not contain the default export.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::UNREGISTERED_MODULE,
        category: DiagnosticCategory::Error,
        message: "Imported module {0} is not registered",
    },
    DiagnosticMessage {
        code: diagnostic_codes::EMPTY_OUTPUT,
        category: DiagnosticCategory::Message,
        message: "File {0} produced no mock output and is ignored",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_CHAIN_MEMBER,
        category: DiagnosticCategory::Warning,
        message: "Not found {0} from {1} in file {2}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_PROPERTY_PATH,
        category: DiagnosticCategory::Error,
        message: "Property {0} not found below {1}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INCONSISTENT_GLOBAL_DEPENDENCY,
        category: DiagnosticCategory::Error,
        message: "Global dependency {0} of {1} is not an ambient declaration",
    },
    DiagnosticMessage {
        code: diagnostic_codes::SYNTH_DEPTH_EXCEEDED,
        category: DiagnosticCategory::Warning,
        message: "Synthesis depth limit reached at {0}",
    },
];

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}
