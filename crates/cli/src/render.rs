//! Diagnostic and report rendering.
//!
//! Pretty output goes to stderr with ariadne colours so stdout stays free
//! for data; JSON output is a single document on stdout.

use std::io::{self, IsTerminal};

use ariadne::{Color, Fmt};
use serde::Serialize;
use sticker_labels_diagnostics::{Diagnostic, Severity, tally};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for reports and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured terminal output.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, else pretty for terminals and JSON for pipes.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warn => "warning",
        Severity::Info => "info",
        _ => "diagnostic",
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Print each diagnostic to stderr with its context and explanation.
///
/// Record indices are shown one-based, matching spreadsheet data rows.
pub(crate) fn render_diagnostics_pretty(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        let kind = severity_label(diag.severity).fg(severity_color(diag.severity));
        match diag.record {
            Some(record) => eprintln!(
                "{kind}[{}]: record {}: {}",
                diag.id,
                record + 1,
                diag.message
            ),
            None => eprintln!("{kind}[{}]: {}", diag.id, diag.message),
        }

        if let Some(ctx) = &diag.context {
            let note: String = ctx
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ");
            eprintln!("  = note: {note}");
        }

        if let Some(explanation) = diag.explain() {
            eprintln!("  = help: {explanation}");
        }
    }
}

// ── JSON rendering ──────────────────────────────────────────────────────

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line showing error/warning/info counts.
///
/// Example: `1 warning, 2 info`
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let (errors, warnings, infos) = tally(diagnostics);
    if errors + warnings + infos == 0 {
        return;
    }

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!(
            "{}",
            format!("{warnings} warning{s}").fg(Color::Yellow)
        ));
    }
    if infos > 0 {
        parts.push(format!("{}", format!("{infos} info").fg(Color::Blue)));
    }
    eprintln!("{}", parts.join(", "));
}
