//! Diagnostics for the sticker label composer.
//!
//! Provides [`Diagnostic`] and [`Severity`], the types used to report
//! dataset problems, recovered per-record failures, and informational notes
//! about column resolution. Diagnostic codes are defined in the [`codes`]
//! module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the run cannot produce a document.
    Error,
    /// Warning: a record was recovered with degraded output.
    Warn,
    /// Informational note.
    Info,
}

/// A diagnostic message produced while resolving columns or composing labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"STK2001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Zero-based index of the record this diagnostic relates to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<usize>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        record: Option<usize>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            record,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        record: Option<usize>,
    ) -> Self {
        Self::new(id, Severity::Error, message, record)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        record: Option<usize>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, record)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        record: Option<usize>,
    ) -> Self {
        Self::new(id, Severity::Info, message, record)
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Keys are short descriptors like `"role"`, `"column"`, `"dropped"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.record {
            Some(r) => write!(
                f,
                "{}[{}]: record {}: {}",
                self.severity,
                self.id,
                r + 1,
                self.message
            ),
            None => write!(f, "{}[{}]: {}", self.severity, self.id, self.message),
        }
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    codes::explanation(id)
}

/// Count diagnostics by severity as `(errors, warnings, infos)`.
pub fn tally(diagnostics: &[Diagnostic]) -> (usize, usize, usize) {
    diagnostics
        .iter()
        .fold((0, 0, 0), |(e, w, i), d| match d.severity {
            Severity::Error => (e + 1, w, i),
            Severity::Warn => (e, w + 1, i),
            Severity::Info => (e, w, i + 1),
        })
}
