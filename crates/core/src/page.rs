//! Pages as flat lists of drawing primitives, plus the per-page border
//! decoration.

use serde::Serialize;
use sticker_labels_profile::{cm, sticker};

use crate::backend::QrGlyph;
use crate::layout::{Content, Label, LabelStyle, Rect, Stroke, TextBlock};

/// One drawing operation in page coordinates (top-left origin, points).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Primitive {
    /// Outline of a rectangle.
    StrokeRect {
        /// Outlined area.
        rect: Rect,
        /// Line to draw with.
        stroke: Stroke,
    },
    /// Text set inside a cell.
    Text {
        /// Cell the text is aligned within.
        rect: Rect,
        /// Text and typography.
        block: TextBlock,
    },
    /// A QR symbol filling `rect`, quiet zone included.
    Qr {
        /// Area covered by the symbol and its quiet zone.
        rect: Rect,
        /// The symbol.
        glyph: QrGlyph,
    },
}

/// Physical page description handed to [`page_decoration`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// The content box outlined on every page.
    pub content_box: Rect,
}

impl PageGeometry {
    /// The 10 × 15 cm sticker with its 9.8 × 7.2 cm content box.
    pub fn sticker() -> Self {
        let x = (cm(sticker::WIDTH_CM) - cm(sticker::CONTENT_BOX_WIDTH_CM)) / 2.0
            + cm(sticker::SIDE_MARGIN_CM);
        Self {
            width: cm(sticker::WIDTH_CM),
            height: cm(sticker::HEIGHT_CM),
            content_box: Rect::new(
                x,
                cm(sticker::TOP_MARGIN_CM),
                cm(sticker::CONTENT_BOX_WIDTH_CM - 2.0 * sticker::SIDE_MARGIN_CM),
                cm(sticker::CONTENT_BOX_HEIGHT_CM),
            ),
        }
    }
}

/// Primitives drawn identically on every page: the content-box border.
pub fn page_decoration(page: &PageGeometry, style: &LabelStyle) -> Vec<Primitive> {
    vec![Primitive::StrokeRect {
        rect: page.content_box,
        stroke: style.page_border,
    }]
}

/// One output page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// Drawing operations in paint order.
    pub primitives: Vec<Primitive>,
}

impl Page {
    /// Lay `label` out on a page, after the page decoration.
    pub fn from_label(label: &Label, geometry: &PageGeometry, decoration: &[Primitive]) -> Self {
        let mut primitives = decoration.to_vec();
        primitives.extend(label_primitives(label));
        Self {
            width: geometry.width,
            height: geometry.height,
            primitives,
        }
    }

    /// Every text string on the page, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text { block, .. } => Some(block.text.as_str()),
            _ => None,
        })
    }
}

/// Flatten a label tree: for each box, its content then its border.
pub fn label_primitives(label: &Label) -> Vec<Primitive> {
    let mut out = Vec::new();
    for node in label.root().walk() {
        match &node.content {
            Some(Content::Text(block)) => out.push(Primitive::Text {
                rect: node.rect,
                block: block.clone(),
            }),
            Some(Content::Qr(glyph)) => out.push(Primitive::Qr {
                rect: node.rect,
                glyph: glyph.clone(),
            }),
            None => {}
        }
        if let Some(stroke) = node.border {
            out.push(Primitive::StrokeRect {
                rect: node.rect,
                stroke,
            });
        }
    }
    out
}
