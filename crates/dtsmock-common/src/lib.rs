//! Common types and utilities for the dtsmock mock synthesizer.
//!
//! This crate provides foundational types used across all dtsmock crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, message table)
//! - Synthesis limits and thresholds

// Diagnostics - message table, categories and formatting
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticMessage, diagnostic_codes, format_message,
    get_message_template,
};

// Centralized limits and thresholds
pub mod limits;
