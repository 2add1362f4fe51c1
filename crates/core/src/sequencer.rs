//! Label sequencer: one page per record, in input order.
//!
//! Column resolution runs once per dataset. Each record then goes through
//! field extraction, location tokenizing, QR payload encoding and layout,
//! and the resulting label is laid on a fresh page after the shared page
//! decoration. The page list is handed to a [`DocumentBackend`] only once
//! every record has been composed, so a run either yields a complete
//! document or nothing.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use serde::Serialize;
use sticker_labels_diagnostics::{Diagnostic, codes};
use sticker_labels_profile::{GeometryError, LabelGeometry};

use crate::backend::{DocumentBackend, QrEncoder};
use crate::columns::{RoleMap, resolve_columns};
use crate::dataset::Dataset;
use crate::error::LabelError;
use crate::layout::{LabelStyle, compose_label};
use crate::location::tokenize_location;
use crate::page::{Page, PageGeometry, page_decoration};
use crate::payload::{LabelFields, build_qr_payload};

/// Progress report sent after each composed label.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Labels composed so far.
    pub completed: usize,
    /// Records in the dataset.
    pub total: usize,
    /// QR encodings that failed so far.
    pub qr_failures: usize,
}

impl Progress {
    /// Completion in whole percent.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.completed * 100 / self.total
        }
    }
}

/// Every page of a run, before serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    /// One page per record, in input order.
    pub pages: Vec<Page>,
    /// How the dataset's columns were assigned to roles.
    pub roles: RoleMap,
    /// Non-fatal findings, run-level first, then per record.
    pub diagnostics: Vec<Diagnostic>,
    /// Records whose QR cell shows the placeholder.
    pub qr_failures: usize,
}

/// The serialized document plus the run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildOutput {
    /// Document bytes from the backend.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub pages: usize,
    /// How the dataset's columns were assigned to roles.
    pub roles: RoleMap,
    /// Non-fatal findings.
    pub diagnostics: Vec<Diagnostic>,
    /// Records whose QR cell shows the placeholder.
    pub qr_failures: usize,
}

/// Turns a dataset into pages, and pages into a document.
#[derive(Debug, Clone)]
pub struct LabelSequencer<Q> {
    geometry: LabelGeometry,
    style: LabelStyle,
    page: PageGeometry,
    qr: Q,
}

impl<Q: QrEncoder> LabelSequencer<Q> {
    /// Create a sequencer for the standard sticker page.
    ///
    /// Fails when `geometry` does not pass [`LabelGeometry::validate`].
    pub fn new(geometry: LabelGeometry, qr: Q) -> Result<Self, GeometryError> {
        geometry.validate()?;
        Ok(Self {
            geometry,
            style: LabelStyle::default(),
            page: PageGeometry::sticker(),
            qr,
        })
    }

    /// Replace the default typography and strokes.
    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    /// The geometry labels are composed with.
    pub fn geometry(&self) -> &LabelGeometry {
        &self.geometry
    }

    /// Compose one page per record.
    ///
    /// `on_progress` runs after every label and can return
    /// `ControlFlow::Break(())` to abandon the run, which then yields
    /// [`LabelError::Abandoned`] and no pages.
    pub fn compose<F>(&self, dataset: &Dataset, mut on_progress: F) -> Result<Composition, LabelError>
    where
        F: FnMut(Progress) -> ControlFlow<(), ()>,
    {
        dataset.ensure_usable()?;
        let roles = resolve_columns(dataset.columns(), self.geometry.variant)?;
        let mut diagnostics = roles.diagnostics();

        let decoration = page_decoration(&self.page, &self.style);
        let total = dataset.len();
        let mut pages = Vec::with_capacity(total);
        let mut qr_failures = 0;

        for (index, record) in dataset.records().iter().enumerate() {
            let fields = LabelFields::from_record(record, &roles);
            // Numeric cells (bin 101) are tokenized as displayed.
            let slots = tokenize_location(Some(fields.location.as_str()), self.geometry.slot_count());
            if slots.dropped() > 0 {
                diagnostics.push(
                    Diagnostic::info(
                        codes::LOCATION_TRUNCATED,
                        format!(
                            "location '{}' has more parts than the {} slots; {} dropped",
                            fields.location,
                            slots.len(),
                            slots.dropped()
                        ),
                        Some(index),
                    )
                    .with_context(BTreeMap::from([
                        ("slots".into(), slots.len().to_string()),
                        ("dropped".into(), slots.dropped().to_string()),
                    ])),
                );
            }

            let payload = build_qr_payload(&fields);
            let glyph = match self.qr.encode(&payload) {
                Ok(glyph) => Some(glyph),
                Err(err) => {
                    tracing::warn!(record = index, error = %err, "QR generation failed, using placeholder");
                    qr_failures += 1;
                    diagnostics.push(
                        Diagnostic::warn(
                            codes::QR_FALLBACK,
                            "QR code could not be generated; placeholder drawn",
                            Some(index),
                        )
                        .with_context(BTreeMap::from([("error".into(), err.to_string())])),
                    );
                    None
                }
            };

            let label = compose_label(&fields, &slots, glyph.as_ref(), &self.geometry, &self.style);
            pages.push(Page::from_label(&label, &self.page, &decoration));
            tracing::debug!(record = index, part_no = %fields.part_no, "composed label");

            let progress = Progress {
                completed: index + 1,
                total,
                qr_failures,
            };
            if let ControlFlow::Break(()) = on_progress(progress) {
                tracing::info!(completed = index + 1, total, "run abandoned by caller");
                return Err(LabelError::Abandoned {
                    completed: index + 1,
                    total,
                });
            }
        }

        Ok(Composition {
            pages,
            roles,
            diagnostics,
            qr_failures,
        })
    }

    /// Compose every page and serialize them with `backend`.
    ///
    /// Backend failures surface as [`LabelError::DocumentBuild`]; no bytes
    /// are returned unless every page was serialized.
    pub fn build<B, F>(
        &self,
        dataset: &Dataset,
        backend: &mut B,
        on_progress: F,
    ) -> Result<BuildOutput, LabelError>
    where
        B: DocumentBackend,
        F: FnMut(Progress) -> ControlFlow<(), ()>,
    {
        let composition = self.compose(dataset, on_progress)?;
        let bytes = backend
            .render(&composition.pages)
            .map_err(|e| LabelError::DocumentBuild {
                source: Box::new(e),
            })?;
        tracing::info!(
            pages = composition.pages.len(),
            qr_failures = composition.qr_failures,
            bytes = bytes.len(),
            "document built"
        );

        Ok(BuildOutput {
            bytes,
            pages: composition.pages.len(),
            roles: composition.roles,
            diagnostics: composition.diagnostics,
            qr_failures: composition.qr_failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::QrGlyph;
    use crate::dataset::Record;

    struct Blank;

    impl QrEncoder for Blank {
        type Error = std::convert::Infallible;

        fn encode(&self, _payload: &str) -> Result<QrGlyph, Self::Error> {
            Ok(QrGlyph::from_modules(1, vec![true]))
        }
    }

    fn dataset(rows: usize) -> Dataset {
        let columns = vec!["Part No".to_string(), "Store Location".to_string()];
        let records = (0..rows)
            .map(|i| Record::from_iter([format!("P{i}"), "A_B_C_D_E_F".to_string()]))
            .collect();
        Dataset::new(columns, records)
    }

    #[test]
    fn progress_counts_every_record() {
        let sequencer = LabelSequencer::new(LabelGeometry::default(), Blank).unwrap();
        let mut seen = Vec::new();
        let composition = sequencer
            .compose(&dataset(3), |p| {
                seen.push((p.completed, p.total, p.percent()));
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(composition.pages.len(), 3);
        assert_eq!(seen, [(1, 3, 33), (2, 3, 66), (3, 3, 100)]);
    }

    #[test]
    fn overflowing_locations_are_reported_per_record() {
        let sequencer = LabelSequencer::new(LabelGeometry::default(), Blank).unwrap();
        let composition = sequencer
            .compose(&dataset(2), |_| ControlFlow::Continue(()))
            .unwrap();
        let truncated: Vec<_> = composition
            .diagnostics
            .iter()
            .filter(|d| d.id == codes::LOCATION_TRUNCATED)
            .map(|d| d.record)
            .collect();
        assert_eq!(truncated, [Some(0), Some(1)]);
    }

    #[test]
    fn invalid_geometry_is_rejected_up_front() {
        let geometry = LabelGeometry {
            date_width_ratio: 1.0,
            ..Default::default()
        };
        assert!(LabelSequencer::new(geometry, Blank).is_err());
    }
}
