//! Sticker label composition engine.
//!
//! Turns a tabular [`Dataset`] of inventory records into one 10 × 15 cm
//! page per record. The main entry point is [`LabelSequencer`], which ties
//! together [`resolve_columns`], [`tokenize_location`], [`build_qr_payload`]
//! and [`compose_label`]. QR encoding and document serialization are
//! supplied by the caller through the [`QrEncoder`] and [`DocumentBackend`]
//! traits.

#![warn(missing_docs)]

/// QR and document backend seams.
pub mod backend;
/// Column name heuristics.
pub mod columns;
/// Generic tabular input.
pub mod dataset;
/// Run-level errors.
pub mod error;
/// Label box tree and composer.
pub mod layout;
/// Location string tokenizer.
pub mod location;
/// Page primitives and decoration.
pub mod page;
/// Field extraction and QR payload text.
pub mod payload;
/// Record-to-page driver.
pub mod sequencer;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Input
pub use dataset::{Dataset, Record, Value};

// Column resolver
pub use columns::{ResolvedColumn, Role, RoleMap, Rule, resolve_columns};

// Tokenizer and payload
pub use location::{LocationSlots, tokenize_location};
pub use payload::{LabelFields, build_qr_payload, clean_receipt_date};

// Layout
pub use layout::{BoxRole, Label, LabelStyle, LayoutBox, compose_label, display_description};

// Pages and backends
pub use backend::{DocumentBackend, QrEncoder, QrGlyph};
pub use page::{Page, PageGeometry, Primitive, page_decoration};

// Sequencer
pub use error::{DatasetProblem, LabelError};
pub use sequencer::{BuildOutput, Composition, LabelSequencer, Progress};

// Diagnostics and geometry (re-exported from their crates)
pub use sticker_labels_diagnostics::{Diagnostic, Severity, codes};
pub use sticker_labels_profile::{GeometryError, LabelGeometry, LocationVariant};
