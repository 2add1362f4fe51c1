//! End-to-end tests for the label sequencer: dataset in, pages and
//! diagnostics out, through stub QR and document backends.

mod common;

use std::ops::ControlFlow;

use common::{FailingBackend, RecordingBackend, StubQr, dataset, qr_count, text_rect};
use sticker_labels_core::page::Primitive;
use sticker_labels_core::{
    Dataset, DatasetProblem, LabelError, LabelGeometry, LabelSequencer, LabelStyle,
    LocationVariant, QrEncoder, QrGlyph, Record, Role, Severity, Value, codes,
};
use sticker_labels_profile::{cm, sticker};

const EPS: f32 = 1e-3;

fn go(_: sticker_labels_core::Progress) -> ControlFlow<(), ()> {
    ControlFlow::Continue(())
}

fn three_records() -> Dataset {
    dataset(
        &["Part No", "Description", "Store Location", "Receipt Date"],
        &[
            &["P-1", "Hex bolt", "A1_B2", "2024-05-01 10:30:00"],
            &["P-2", "Washer", "C3 D4 E5", "2024-05-02"],
            &["P-3", "Nut", "F6", "nan"],
        ],
    )
}

// ─── Happy path ──────────────────────────────────────────────────────────────

#[test]
fn three_records_make_three_pages_without_grn() {
    let geometry = LabelGeometry {
        date_width_ratio: 0.4,
        ..Default::default()
    };
    let sequencer = LabelSequencer::new(geometry, StubQr::default()).unwrap();
    let mut backend = RecordingBackend::default();
    let out = sequencer.build(&three_records(), &mut backend, go).unwrap();

    assert_eq!(out.pages, 3);
    assert_eq!(out.bytes, b"3 pages");
    assert_eq!(out.qr_failures, 0);
    assert_eq!(backend.calls, 1);
    assert_eq!(backend.pages.len(), 3);
    assert!(out.roles.get(Role::GrnNumber).is_none());

    let slot_style = LabelStyle::default().slot;
    for (page, part) in backend.pages.iter().zip(["P-1", "P-2", "P-3"]) {
        let texts: Vec<&str> = page.texts().collect();
        // GRN caption, then its empty value, then the part row.
        assert_eq!(&texts[..4], ["GRN No", "", "Part No", part]);

        let slots = page
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Text { block, .. } if block.style == slot_style))
            .count();
        assert_eq!(slots, 4);
        assert_eq!(qr_count(page), 1);

        let caption = text_rect(page, "Receipt Date:").unwrap();
        let date_cell = cm(sticker::CONTENT_WIDTH_CM) * 0.4;
        assert!((caption.width - date_cell * 0.4).abs() < EPS);
        assert!(caption.bottom() <= cm(sticker::TOP_MARGIN_CM + sticker::CONTENT_BOX_HEIGHT_CM));
    }

    let dates: Vec<&str> = backend
        .pages
        .iter()
        .map(|p| p.texts().skip_while(|t| *t != "Receipt Date:").nth(1).unwrap())
        .collect();
    assert_eq!(dates, ["2024-05-01", "2024-05-02", ""]);
}

#[test]
fn every_page_starts_with_the_same_border() {
    let sequencer = LabelSequencer::new(LabelGeometry::default(), StubQr::default()).unwrap();
    let composition = sequencer.compose(&three_records(), go).unwrap();
    let border = LabelStyle::default().page_border;
    let firsts: Vec<_> = composition.pages.iter().map(|p| &p.primitives[0]).collect();
    for first in &firsts {
        assert!(matches!(first, Primitive::StrokeRect { stroke, .. } if *stroke == border));
        assert_eq!(*first, firsts[0]);
    }
}

#[test]
fn location_tokens_fill_slots_in_order() {
    let sequencer = LabelSequencer::new(LabelGeometry::default(), StubQr::default()).unwrap();
    let composition = sequencer.compose(&three_records(), go).unwrap();
    let texts: Vec<&str> = composition.pages[1].texts().collect();
    let at = texts.iter().position(|t| *t == "Store Location").unwrap();
    assert_eq!(&texts[at + 1..at + 5], ["C3", "D4", "E5", ""]);
}

#[test]
fn put_away_variant_uses_seven_slots() {
    let geometry = LabelGeometry {
        variant: LocationVariant::PutAway,
        ..Default::default()
    };
    let data = dataset(
        &["GRN No", "Part No", "Description", "Put Away Zone", "Receipt Date"],
        &[&["G-9", "P-9", "Spring", "Z1 R2 B3 L4 S5 P6 X7 Y8", "2024-06-01"]],
    );
    let sequencer = LabelSequencer::new(geometry, StubQr::default()).unwrap();
    let composition = sequencer.compose(&data, go).unwrap();
    let texts: Vec<&str> = composition.pages[0].texts().collect();
    let at = texts.iter().position(|t| *t == "Put Away Zone/Loc").unwrap();
    assert_eq!(&texts[at + 1..at + 8], ["Z1", "R2", "B3", "L4", "S5", "P6", "X7"]);

    let truncated: Vec<_> = composition
        .diagnostics
        .iter()
        .filter(|d| d.id == codes::LOCATION_TRUNCATED)
        .collect();
    assert_eq!(truncated.len(), 1);
    assert_eq!(truncated[0].record, Some(0));
}

#[test]
fn numeric_location_cell_fills_the_first_slot() {
    let data = Dataset::new(
        vec!["Part No".into(), "Store Location".into()],
        vec![Record::new(vec!["P-1".into(), Value::number(101.0)])],
    );
    let sequencer = LabelSequencer::new(LabelGeometry::default(), StubQr::default()).unwrap();
    let composition = sequencer.compose(&data, go).unwrap();
    let texts: Vec<&str> = composition.pages[0].texts().collect();
    let at = texts.iter().position(|t| *t == "Store Location").unwrap();
    assert_eq!(&texts[at + 1..at + 5], ["101", "", "", ""]);
}

// ─── Description truncation ──────────────────────────────────────────────────

#[test]
fn long_description_is_shortened_on_the_label_only() {
    let long = "Stainless steel hex head bolt with nylon lock nut, M8 x 40";
    assert!(long.chars().count() > 50);
    let data = dataset(&["Part No", "Description"], &[&["P-1", long]]);

    let payloads = std::cell::RefCell::new(Vec::new());
    struct Spy<'a>(&'a std::cell::RefCell<Vec<String>>);
    impl QrEncoder for Spy<'_> {
        type Error = common::StubError;
        fn encode(&self, payload: &str) -> Result<QrGlyph, Self::Error> {
            self.0.borrow_mut().push(payload.to_string());
            StubQr::default().encode(payload)
        }
    }

    let sequencer = LabelSequencer::new(LabelGeometry::default(), Spy(&payloads)).unwrap();
    let composition = sequencer.compose(&data, go).unwrap();

    let shown: String = long.chars().take(47).collect::<String>() + "...";
    let texts: Vec<&str> = composition.pages[0].texts().collect();
    assert!(texts.contains(&shown.as_str()));
    assert!(!texts.contains(&long));

    let payloads = payloads.borrow();
    assert!(payloads[0].contains(&format!("Description: {long}\n")));
}

// ─── Recoverable failures ────────────────────────────────────────────────────

#[test]
fn qr_failure_draws_placeholder_and_continues() {
    let qr = StubQr {
        fail_on: Some("Washer"),
    };
    let sequencer = LabelSequencer::new(LabelGeometry::default(), qr).unwrap();
    let mut backend = RecordingBackend::default();
    let out = sequencer.build(&three_records(), &mut backend, go).unwrap();

    assert_eq!(out.pages, 3);
    assert_eq!(out.qr_failures, 1);
    assert_eq!(qr_count(&backend.pages[0]), 1);
    assert_eq!(qr_count(&backend.pages[1]), 0);
    assert!(backend.pages[1].texts().any(|t| t == "QR"));

    let warning = out
        .diagnostics
        .iter()
        .find(|d| d.id == codes::QR_FALLBACK)
        .unwrap();
    assert_eq!(warning.severity, Severity::Warn);
    assert_eq!(warning.record, Some(1));
    let ctx = warning.context.as_ref().unwrap();
    assert_eq!(ctx.get("error").map(String::as_str), Some("data too long"));
}

#[test]
fn unresolved_grn_is_reported_as_info() {
    let sequencer = LabelSequencer::new(LabelGeometry::default(), StubQr::default()).unwrap();
    let composition = sequencer.compose(&three_records(), go).unwrap();
    let info = composition
        .diagnostics
        .iter()
        .find(|d| d.id == codes::ROLE_UNRESOLVED)
        .unwrap();
    assert_eq!(info.severity, Severity::Info);
    assert_eq!(info.record, None);
}

// ─── Terminal failures ───────────────────────────────────────────────────────

#[test]
fn zero_records_is_invalid_and_builds_nothing() {
    let sequencer = LabelSequencer::new(LabelGeometry::default(), StubQr::default()).unwrap();
    let mut backend = RecordingBackend::default();
    let empty = dataset(&["Part No", "Description"], &[]);
    let err = sequencer.build(&empty, &mut backend, go).unwrap_err();

    assert!(matches!(
        err,
        LabelError::InvalidDataset(DatasetProblem::NoRecords)
    ));
    assert_eq!(err.code(), Some(codes::NO_RECORDS));
    assert_eq!(backend.calls, 0);
}

#[test]
fn zero_columns_is_invalid() {
    let sequencer = LabelSequencer::new(LabelGeometry::default(), StubQr::default()).unwrap();
    let err = sequencer.compose(&dataset(&[], &[]), go).unwrap_err();
    assert!(matches!(
        err,
        LabelError::InvalidDataset(DatasetProblem::NoColumns)
    ));
}

#[test]
fn backend_failure_aborts_the_run() {
    let sequencer = LabelSequencer::new(LabelGeometry::default(), StubQr::default()).unwrap();
    let err = sequencer
        .build(&three_records(), &mut FailingBackend, go)
        .unwrap_err();
    assert!(matches!(err, LabelError::DocumentBuild { .. }));
    assert_eq!(err.code(), Some(codes::DOCUMENT_BUILD));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn breaking_from_progress_abandons_without_output() {
    let sequencer = LabelSequencer::new(LabelGeometry::default(), StubQr::default()).unwrap();
    let mut backend = RecordingBackend::default();
    let err = sequencer
        .build(&three_records(), &mut backend, |p| {
            if p.completed == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap_err();

    assert!(matches!(
        err,
        LabelError::Abandoned {
            completed: 2,
            total: 3
        }
    ));
    assert_eq!(backend.calls, 0);
}

#[test]
fn composition_serializes_to_json() {
    let sequencer = LabelSequencer::new(LabelGeometry::default(), StubQr::default()).unwrap();
    let composition = sequencer.compose(&three_records(), go).unwrap();
    let json = serde_json::to_value(&composition).unwrap();
    assert_eq!(json["pages"].as_array().unwrap().len(), 3);
    assert_eq!(json["roles"]["part_number"]["name"], "Part No");
}
