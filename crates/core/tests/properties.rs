//! Property-based tests for the column resolver, location tokenizer and
//! QR payload builder.

use proptest::prelude::*;
use sticker_labels_core::{
    LabelFields, LocationVariant, Role, build_qr_payload, resolve_columns, tokenize_location,
};

// ============================================================================
// Column resolver
// ============================================================================

const CANONICAL: [(&str, Role); 5] = [
    ("GRN_NO", Role::GrnNumber),
    ("PartNumber", Role::PartNumber),
    ("Desc", Role::Description),
    ("Store_Location", Role::Location),
    ("ReceiptDate", Role::ReceiptDate),
];

fn recase(name: &str, mask: u64) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if (mask >> (i % 64)) & 1 == 1 {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

/// Property: canonical headers resolve to their role in any order and case.
#[test]
fn proptest_resolver_ignores_order_and_case() {
    let order = Just((0..CANONICAL.len()).collect::<Vec<_>>()).prop_shuffle();
    proptest!(|(order in order, masks in prop::array::uniform5(any::<u64>()))| {
        let columns: Vec<String> = order
            .iter()
            .map(|&i| recase(CANONICAL[i].0, masks[i]))
            .collect();
        let roles = resolve_columns(&columns, LocationVariant::Store).unwrap();
        for (pos, &i) in order.iter().enumerate() {
            let resolved = roles.get(CANONICAL[i].1);
            prop_assert_eq!(resolved.map(|c| c.index), Some(pos), "{:?}", columns);
            prop_assert!(!resolved.is_some_and(|c| c.fallback));
        }
    });
}

// ============================================================================
// Location tokenizer
// ============================================================================

fn location_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_ \\t-]{0,40}"
}

/// Property: output always has exactly `slot_count` slots.
#[test]
fn proptest_tokenizer_length_is_fixed() {
    proptest!(|(raw in location_strategy(), slot_count in 0usize..10)| {
        let slots = tokenize_location(Some(&raw), slot_count);
        prop_assert_eq!(slots.len(), slot_count);
    });
}

/// Property: non-empty slots are the input tokens in order, truncated.
#[test]
fn proptest_tokenizer_preserves_tokens() {
    proptest!(|(raw in location_strategy(), slot_count in 1usize..10)| {
        let slots = tokenize_location(Some(&raw), slot_count);
        let expected: Vec<&str> = raw
            .split(|c: char| c == '_' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        let kept: Vec<&str> = slots
            .slots()
            .iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        let cut = expected.len().min(slot_count);
        prop_assert_eq!(&kept[..], &expected[..cut]);
        prop_assert_eq!(slots.dropped(), expected.len() - cut);
    });
}

/// Property: re-tokenizing the space-joined slots is a no-op.
#[test]
fn proptest_tokenizer_is_idempotent() {
    proptest!(|(raw in location_strategy(), slot_count in 0usize..10)| {
        let first = tokenize_location(Some(&raw), slot_count);
        let rejoined = first.slots().join(" ");
        let second = tokenize_location(Some(&rejoined), slot_count);
        prop_assert_eq!(first.slots(), second.slots());
        prop_assert_eq!(second.dropped(), 0);
    });
}

// ============================================================================
// QR payload builder
// ============================================================================

/// Property: identical fields give byte-identical payloads with five lines
/// when no field contains a newline.
#[test]
fn proptest_payload_is_deterministic() {
    proptest!(|(fields in prop::array::uniform5("[^\\n\\r]{0,30}"))| {
        let [grn_no, part_no, description, location, receipt_date] = fields;
        let a = LabelFields { grn_no, part_no, description, location, receipt_date };
        let b = a.clone();
        let pa = build_qr_payload(&a);
        let pb = build_qr_payload(&b);
        prop_assert_eq!(pa.as_bytes(), pb.as_bytes());
        prop_assert_eq!(pa.split('\n').count(), 5);
    });
}
