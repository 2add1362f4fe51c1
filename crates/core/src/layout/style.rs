//! Immutable typography and stroke settings, built once per run.

use sticker_labels_profile::cm;

use super::tree::{Font, HAlign, Stroke, TextStyle, VAlign};

/// Every visual constant the composer needs besides geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    /// Cell grid lines.
    pub grid: Stroke,
    /// Per-page border overlay.
    pub page_border: Stroke,
    /// "GRN No" / "Part No" / "Description" captions.
    pub field_caption: TextStyle,
    /// GRN and part number values.
    pub field_value: TextStyle,
    /// Description value.
    pub description: TextStyle,
    /// Location row caption.
    pub location_caption: TextStyle,
    /// Location slot tokens.
    pub slot: TextStyle,
    /// "Receipt Date:" caption.
    pub date_caption: TextStyle,
    /// Receipt date value.
    pub date_value: TextStyle,
    /// Text drawn when there is no QR symbol.
    pub qr_placeholder: TextStyle,
    /// Nominal QR symbol side, clamped to its cell.
    pub qr_size: f32,
}

const PAD: f32 = 6.0;

const fn centered(font: Font, size: f32, leading: f32) -> TextStyle {
    TextStyle {
        font,
        size,
        leading,
        h_align: HAlign::Center,
        v_align: VAlign::Middle,
        padding: PAD,
        wrap: false,
        min_size: None,
    }
}

impl Default for LabelStyle {
    fn default() -> Self {
        let grid = Stroke {
            width: 1.2,
            opacity: 0.95,
        };
        Self {
            grid,
            page_border: Stroke {
                width: 1.8,
                opacity: 0.95,
            },
            field_caption: centered(Font::HelveticaBold, 11.0, 13.2),
            field_value: TextStyle {
                min_size: Some(7.0),
                ..centered(Font::HelveticaBold, 16.0, 14.0)
            },
            description: TextStyle {
                wrap: true,
                ..centered(Font::Helvetica, 11.0, 12.0)
            },
            location_caption: centered(Font::HelveticaBold, 11.0, 13.2),
            slot: TextStyle {
                padding: 1.0,
                min_size: Some(5.0),
                ..centered(Font::HelveticaBold, 9.0, 10.8)
            },
            date_caption: TextStyle {
                h_align: HAlign::Right,
                padding: 3.0,
                wrap: true,
                ..centered(Font::HelveticaBold, 10.0, 12.0)
            },
            date_value: TextStyle {
                h_align: HAlign::Left,
                padding: 3.0,
                ..centered(Font::Helvetica, 10.0, 12.0)
            },
            qr_placeholder: centered(Font::HelveticaBold, 12.0, 14.4),
            qr_size: cm(2.5),
        }
    }
}
