//! Shared test helpers for `sticker_labels_core` integration tests.

#![allow(unreachable_pub, dead_code)]

use std::fmt;

use sticker_labels_core::layout::Rect;
use sticker_labels_core::page::{Page, Primitive};
use sticker_labels_core::{Dataset, DocumentBackend, QrEncoder, QrGlyph, Record, Value};

// ─── Stub capabilities ───────────────────────────────────────────────────────

/// Error returned by the stub capabilities.
#[derive(Debug)]
pub struct StubError(pub &'static str);

impl fmt::Display for StubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for StubError {}

/// QR encoder that returns a 21×21 checkerboard, or fails for payloads
/// containing `fail_on`.
#[derive(Debug, Default)]
pub struct StubQr {
    pub fail_on: Option<&'static str>,
}

impl QrEncoder for StubQr {
    type Error = StubError;

    fn encode(&self, payload: &str) -> Result<QrGlyph, StubError> {
        if self.fail_on.is_some_and(|needle| payload.contains(needle)) {
            return Err(StubError("data too long"));
        }
        let modules = (0..21 * 21).map(|i| (i / 21 + i % 21) % 2 == 0).collect();
        Ok(QrGlyph::from_modules(21, modules))
    }
}

/// Backend that remembers the pages it was given.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub pages: Vec<Page>,
    pub calls: usize,
}

impl DocumentBackend for RecordingBackend {
    type Error = StubError;

    fn render(&mut self, pages: &[Page]) -> Result<Vec<u8>, StubError> {
        self.calls += 1;
        self.pages = pages.to_vec();
        Ok(format!("{} pages", pages.len()).into_bytes())
    }
}

/// Backend that always fails.
#[derive(Debug, Default)]
pub struct FailingBackend;

impl DocumentBackend for FailingBackend {
    type Error = StubError;

    fn render(&mut self, _pages: &[Page]) -> Result<Vec<u8>, StubError> {
        Err(StubError("disk full"))
    }
}

// ─── Data helpers ────────────────────────────────────────────────────────────

/// Build a dataset from string cells.
pub fn dataset(columns: &[&str], rows: &[&[&str]]) -> Dataset {
    let records = rows
        .iter()
        .map(|row| Record::new(row.iter().map(|c| Value::from(*c)).collect()))
        .collect();
    Dataset::new(columns.iter().map(|c| c.to_string()).collect(), records)
}

// ─── Page inspection ─────────────────────────────────────────────────────────

/// Cell rect of the first text primitive equal to `text`.
pub fn text_rect(page: &Page, text: &str) -> Option<Rect> {
    page.primitives.iter().find_map(|p| match p {
        Primitive::Text { rect, block } if block.text == text => Some(*rect),
        _ => None,
    })
}

/// Number of QR primitives on the page.
pub fn qr_count(page: &Page) -> usize {
    page.primitives
        .iter()
        .filter(|p| matches!(p, Primitive::Qr { .. }))
        .count()
}
