//! Per-record field extraction and the QR payload text.

use serde::Serialize;

use crate::columns::{Role, RoleMap};
use crate::dataset::{Record, Value};

/// The resolved field values of one record, as printed and encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelFields {
    /// GRN number, empty when unresolved or missing.
    pub grn_no: String,
    /// Part number.
    pub part_no: String,
    /// Full description (never truncated here).
    pub description: String,
    /// Raw location string.
    pub location: String,
    /// Receipt date after [`clean_receipt_date`].
    pub receipt_date: String,
}

impl LabelFields {
    /// Pull every role's value out of `record`.
    pub fn from_record(record: &Record, roles: &RoleMap) -> Self {
        let text = |role: Role| {
            roles
                .column(role)
                .map(|c| record.get(c).display())
                .unwrap_or_default()
        };
        let receipt_date = roles
            .column(Role::ReceiptDate)
            .map(|c| clean_receipt_date(record.get(c)))
            .unwrap_or_default();

        Self {
            grn_no: text(Role::GrnNumber),
            part_no: text(Role::PartNumber),
            description: text(Role::Description),
            location: text(Role::Location),
            receipt_date,
        }
    }
}

/// Reduce a receipt-date cell to its date part.
///
/// Missing cells, empty text and the literal `nan` give `""`. A value with
/// a space keeps only what precedes the first space (the time is dropped);
/// anything else is returned unchanged.
pub fn clean_receipt_date(raw: &Value) -> String {
    let text = raw.display();
    if text.is_empty() || text == "nan" {
        return String::new();
    }
    match text.split_once(' ') {
        Some((date, _time)) => date.to_string(),
        None => text,
    }
}

/// Serialize `fields` into the multi-line QR payload.
///
/// Five labeled lines in fixed order, joined by `\n`. Empty fields keep
/// their line. The location line reads `Store Location` for every grid
/// variant.
pub fn build_qr_payload(fields: &LabelFields) -> String {
    format!(
        "GRN No: {}\nPart No: {}\nDescription: {}\nStore Location: {}\nReceipt Date: {}",
        fields.grn_no,
        fields.part_no,
        fields.description,
        fields.location,
        fields.receipt_date,
    )
}
