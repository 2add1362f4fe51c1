//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete.
//!
//! Ranges: `STK1xxx` dataset and column resolution, `STK2xxx` per-record
//! label composition, `STK3xxx` document assembly.

/// Dataset has no columns.
pub const NO_COLUMNS: &str = "STK1001";

/// Dataset has no records.
pub const NO_RECORDS: &str = "STK1002";

/// An optional role did not resolve to any column.
pub const ROLE_UNRESOLVED: &str = "STK1101";

/// A role resolved by positional or shared-column fallback.
pub const ROLE_FALLBACK: &str = "STK1102";

/// QR generation failed; placeholder text was drawn instead.
pub const QR_FALLBACK: &str = "STK2001";

/// Location string had more tokens than the grid has slots.
pub const LOCATION_TRUNCATED: &str = "STK2002";

/// The document backend failed to serialize the composed pages.
pub const DOCUMENT_BUILD: &str = "STK3001";

/// Every known code, in ascending order.
pub const ALL: &[&str] = &[
    NO_COLUMNS,
    NO_RECORDS,
    ROLE_UNRESOLVED,
    ROLE_FALLBACK,
    QR_FALLBACK,
    LOCATION_TRUNCATED,
    DOCUMENT_BUILD,
];

pub(crate) fn explanation(id: &str) -> Option<&'static str> {
    Some(match id {
        NO_COLUMNS => {
            "The input table has no header row, so no column can be matched to \
             a label field. Nothing is generated."
        }
        NO_RECORDS => {
            "The input table has a header row but no data rows. At least one \
             record is required to produce a label page."
        }
        ROLE_UNRESOLVED => {
            "No column name looks like a GRN number or a receipt date. The \
             field is printed empty on every label and in the QR payload."
        }
        ROLE_FALLBACK => {
            "No column name matched the field by name, so a column was chosen \
             by position (or shared with another field). Rename the header \
             to make the mapping explicit."
        }
        QR_FALLBACK => {
            "The QR payload could not be encoded (usually because it is too \
             long). The label shows the text \"QR\" in place of the symbol; \
             the rest of the run is unaffected."
        }
        LOCATION_TRUNCATED => {
            "The location string splits into more tokens than the location \
             grid has slots. Trailing tokens are not printed in the grid but \
             remain in the QR payload."
        }
        DOCUMENT_BUILD => {
            "The PDF backend failed to serialize the pages. No output file \
             is written."
        }
        _ => return None,
    })
}
