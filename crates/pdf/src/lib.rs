//! Concrete capabilities for the sticker label composer: QR symbols via
//! the `qrcode` crate and PDF output via `lopdf`.
//!
//! ```no_run
//! use std::ops::ControlFlow;
//! use sticker_labels_core::{Dataset, LabelGeometry, LabelSequencer};
//! use sticker_labels_pdf::{PdfBackend, QrCodeEncoder};
//!
//! # fn run(dataset: &Dataset) -> Result<(), Box<dyn std::error::Error>> {
//! let sequencer = LabelSequencer::new(LabelGeometry::default(), QrCodeEncoder::new())?;
//! let out = sequencer.build(dataset, &mut PdfBackend::new(), |_| ControlFlow::Continue(()))?;
//! std::fs::write("labels.pdf", &out.bytes)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod metrics;
mod qr;
mod writer;

pub use qr::QrCodeEncoder;
pub use writer::PdfBackend;

/// A payload could not be turned into a QR symbol.
#[derive(Debug, thiserror::Error)]
#[error("QR encoding failed: {0}")]
pub struct QrError(#[from] qrcode::types::QrError);

/// PDF serialization failures.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// There were no pages to write.
    #[error("document has no pages")]
    NoPages,

    /// A content stream could not be encoded.
    #[error("failed to encode content stream for page {page}: {source}")]
    Content {
        /// One-based page number.
        page: usize,
        /// The underlying `lopdf` error.
        #[source]
        source: lopdf::Error,
    },

    /// Writing the document bytes failed.
    #[error("failed to write PDF: {0}")]
    Write(#[source] lopdf::Error),
}
