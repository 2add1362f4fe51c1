//! Label layout composer.
//!
//! Builds one [`Label`] per record as a tree of [`LayoutBox`]es in page
//! coordinates:
//!
//! ```text
//! ┌──────────┬─────────────────────┐
//! │ GRN No   │ value               │  primary block, 1/3 : 2/3
//! │ Part No  │ value               │
//! │ Desc.    │ value (≤ 50 chars)  │
//! ├──────────┼────┬────┬────┬──────┤
//! │ Location │ s1 │ s2 │ s3 │ s4   │  location block, slots weighted
//! └──────────┴────┴────┴────┴──────┘
//!                                     spacer
//! ┌────────┬──────────┐
//! │ Date:  │ value    │   [ QR ]      bottom block, date_width_ratio : rest
//! └────────┴──────────┘
//! ```
//!
//! Only `date_width_ratio`, the two heights and the slot weights come from
//! [`LabelGeometry`]; every other proportion is fixed.

/// Typography and stroke settings.
pub mod style;
/// Box tree types.
pub mod tree;

use serde::Serialize;
use sticker_labels_profile::{LabelGeometry, cm, sticker};

use crate::backend::QrGlyph;
use crate::location::LocationSlots;
use crate::payload::LabelFields;

pub use style::LabelStyle;
pub use tree::{
    BoxRole, Content, Field, Font, HAlign, LayoutBox, Rect, Stroke, TextBlock, TextStyle, VAlign,
};

/// Descriptions longer than this are shortened on the label.
pub const DESCRIPTION_DISPLAY_LIMIT: usize = 50;
const DESCRIPTION_KEEP: usize = 47;

/// One record's composed label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    root: LayoutBox,
}

impl Label {
    /// The root box.
    pub fn root(&self) -> &LayoutBox {
        &self.root
    }

    /// First box with `role`.
    pub fn find(&self, role: BoxRole) -> Option<&LayoutBox> {
        self.root.find(role)
    }

    /// `true` when the QR cell shows the placeholder text instead of a symbol.
    pub fn has_qr_placeholder(&self) -> bool {
        self.find(BoxRole::QrSymbol).is_none()
    }
}

/// Shorten `description` for display: more than 50 characters become the
/// first 47 followed by `...`.
pub fn display_description(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_DISPLAY_LIMIT {
        let mut short: String = description.chars().take(DESCRIPTION_KEEP).collect();
        short.push_str("...");
        short
    } else {
        description.to_string()
    }
}

/// Area of the page holding label content: inset by the side and top
/// margins, as wide as the content width and as tall as the content box.
pub fn content_area() -> Rect {
    Rect::new(
        cm(sticker::SIDE_MARGIN_CM),
        cm(sticker::TOP_MARGIN_CM),
        cm(sticker::CONTENT_WIDTH_CM),
        cm(sticker::CONTENT_BOX_HEIGHT_CM),
    )
}

/// Compose one label.
///
/// `glyph` is `None` when QR generation failed; the QR cell then carries
/// the placeholder text "QR".
pub fn compose_label(
    fields: &LabelFields,
    slots: &LocationSlots,
    glyph: Option<&QrGlyph>,
    geometry: &LabelGeometry,
    style: &LabelStyle,
) -> Label {
    let area = content_area();
    let primary = Rect::new(
        area.x,
        area.y,
        area.width,
        cm(sticker::GRN_ROW_CM + sticker::PART_ROW_CM + sticker::DESCRIPTION_ROW_CM),
    );
    let location = Rect::new(
        area.x,
        primary.bottom(),
        area.width,
        cm(sticker::LOCATION_ROW_CM),
    );
    let bottom = Rect::new(
        area.x,
        location.bottom() + cm(sticker::SPACER_CM),
        area.width,
        cm(geometry.bottom_row_height_cm()),
    );

    let outline = Rect::new(area.x, area.y, area.width, bottom.bottom() - area.y);
    let root = LayoutBox::new(BoxRole::Label, outline).with_children(vec![
        primary_block(primary, fields, style),
        location_block(location, slots, geometry, style),
        bottom_block(bottom, &fields.receipt_date, glyph, geometry, style),
    ]);

    Label { root }
}

fn primary_block(rect: Rect, fields: &LabelFields, style: &LabelStyle) -> LayoutBox {
    let heights = [
        cm(sticker::GRN_ROW_CM),
        cm(sticker::PART_ROW_CM),
        cm(sticker::DESCRIPTION_ROW_CM),
    ];
    let rows = rect
        .split_rows(&heights)
        .into_iter()
        .zip(Field::ALL)
        .map(|(row, field)| {
            let [caption, value] = two_columns(row, &[1.0, 2.0]);
            let (text, value_style) = match field {
                Field::GrnNo => (fields.grn_no.clone(), style.field_value),
                Field::PartNo => (fields.part_no.clone(), style.field_value),
                Field::Description => {
                    (display_description(&fields.description), style.description)
                }
            };
            LayoutBox::new(BoxRole::FieldRow(field), row)
                .bordered(style.grid)
                .with_children(vec![
                    LayoutBox::new(BoxRole::FieldCaption(field), caption)
                        .bordered(style.grid)
                        .with_text(field.caption(), style.field_caption),
                    LayoutBox::new(BoxRole::FieldValue(field), value)
                        .bordered(style.grid)
                        .with_text(text, value_style),
                ])
        })
        .collect();

    LayoutBox::new(BoxRole::PrimaryBlock, rect)
        .bordered(style.grid)
        .with_children(rows)
}

fn location_block(
    rect: Rect,
    slots: &LocationSlots,
    geometry: &LabelGeometry,
    style: &LabelStyle,
) -> LayoutBox {
    let [caption, grid] = two_columns(rect, &[1.0, 2.0]);
    let cells = grid
        .split_columns(geometry.slot_weights())
        .into_iter()
        .zip(slots.slots())
        .enumerate()
        .map(|(i, (cell, token))| {
            LayoutBox::new(BoxRole::Slot(i), cell)
                .bordered(style.grid)
                .with_text(token.as_str(), style.slot)
        })
        .collect();

    LayoutBox::new(BoxRole::LocationBlock, rect)
        .bordered(style.grid)
        .with_children(vec![
            LayoutBox::new(BoxRole::LocationCaption, caption)
                .bordered(style.grid)
                .with_text(geometry.variant.caption(), style.location_caption),
            LayoutBox::new(BoxRole::LocationGrid, grid)
                .bordered(style.grid)
                .with_children(cells),
        ])
}

fn bottom_block(
    rect: Rect,
    receipt_date: &str,
    glyph: Option<&QrGlyph>,
    geometry: &LabelGeometry,
    style: &LabelStyle,
) -> LayoutBox {
    let ratio = geometry.date_width_ratio;
    let [date_cell, qr_cell] = two_columns(rect, &[ratio, 1.0 - ratio]);

    // The date table is top-aligned in its cell; the row is as tall as the
    // taller of the two configured heights.
    let date_table = Rect::new(
        date_cell.x,
        date_cell.y,
        date_cell.width,
        cm(geometry.date_height_cm),
    );
    let [caption, value] = two_columns(date_table, &[0.4, 0.6]);
    let date = LayoutBox::new(BoxRole::DateCell, date_cell).with_children(vec![
        LayoutBox::new(BoxRole::DateCaption, caption)
            .bordered(style.grid)
            .with_text("Receipt Date:", style.date_caption),
        LayoutBox::new(BoxRole::DateValue, value)
            .bordered(style.grid)
            .with_text(receipt_date, style.date_value),
    ]);

    let qr = LayoutBox::new(BoxRole::QrCell, qr_cell).bordered(Stroke::INVISIBLE);
    let qr = match glyph {
        Some(glyph) => {
            let side = style.qr_size.min(qr_cell.width).min(qr_cell.height);
            let mut symbol = LayoutBox::new(BoxRole::QrSymbol, qr_cell.centered(side, side));
            symbol.content = Some(Content::Qr(glyph.clone()));
            qr.with_children(vec![symbol])
        }
        None => qr.with_text("QR", style.qr_placeholder),
    };

    LayoutBox::new(BoxRole::BottomBlock, rect).with_children(vec![date, qr])
}

fn two_columns(rect: Rect, weights: &[f32; 2]) -> [Rect; 2] {
    let cols = rect.split_columns(weights);
    [cols[0], cols[1]]
}
