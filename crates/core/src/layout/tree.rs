//! The label box tree: rectangles, strokes, text blocks and their roles.

use serde::Serialize;

use crate::backend::QrGlyph;

/// Axis-aligned rectangle in points, origin at the page's top-left corner,
/// y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Split horizontally into columns whose widths are proportional to
    /// `weights`.
    pub fn split_columns(&self, weights: &[f32]) -> Vec<Rect> {
        let total: f32 = weights.iter().sum();
        let mut x = self.x;
        weights
            .iter()
            .map(|w| {
                let width = self.width * w / total;
                let cell = Rect::new(x, self.y, width, self.height);
                x += width;
                cell
            })
            .collect()
    }

    /// Split vertically into rows of the given absolute heights, top first.
    pub fn split_rows(&self, heights: &[f32]) -> Vec<Rect> {
        let mut y = self.y;
        heights
            .iter()
            .map(|h| {
                let row = Rect::new(self.x, y, self.width, *h);
                y += h;
                row
            })
            .collect()
    }

    /// A `width × height` rectangle centred inside this one.
    pub fn centered(&self, width: f32, height: f32) -> Rect {
        Rect::new(
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
            width,
            height,
        )
    }
}

/// Black line used for box borders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    /// Line width in points.
    pub width: f32,
    /// Opacity in `[0, 1]`; zero draws nothing.
    pub opacity: f32,
}

impl Stroke {
    /// A stroke that is present in the tree but never visible.
    pub const INVISIBLE: Stroke = Stroke {
        width: 0.0,
        opacity: 0.0,
    };

    /// `true` when drawing this stroke would change the page.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.opacity > 0.0
    }
}

/// Standard PDF base fonts used on labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Font {
    /// Helvetica.
    Helvetica,
    /// Helvetica-Bold.
    HelveticaBold,
}

impl Font {
    /// PostScript base font name.
    pub const fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// Horizontal alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HAlign {
    /// Flush left.
    Left,
    /// Centred.
    Center,
    /// Flush right.
    Right,
}

/// Vertical alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VAlign {
    /// Against the top edge.
    Top,
    /// Centred.
    Middle,
}

/// Typography for one kind of cell text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    /// Font face.
    pub font: Font,
    /// Font size in points.
    pub size: f32,
    /// Baseline-to-baseline distance for wrapped lines.
    pub leading: f32,
    /// Horizontal alignment.
    pub h_align: HAlign,
    /// Vertical alignment.
    pub v_align: VAlign,
    /// Horizontal padding between the cell edge and the text.
    pub padding: f32,
    /// Wrap onto several lines when the text is wider than the cell.
    pub wrap: bool,
    /// Smallest size unwrapped text may shrink to so that it fits the
    /// cell. `None` keeps `size` fixed.
    pub min_size: Option<f32>,
}

impl TextStyle {
    /// Size at which one line of `width` points (measured at `size`) fits
    /// in `available` points, bounded below by `min_size`.
    pub fn fitted_size(&self, width: f32, available: f32) -> f32 {
        match self.min_size {
            Some(min) if !self.wrap && width > available && width > 0.0 => {
                (self.size * available / width).max(min).min(self.size)
            }
            _ => self.size,
        }
    }
}

/// Text placed in a box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    /// The text, already truncated for display where applicable.
    pub text: String,
    /// How to set it.
    pub style: TextStyle,
}

/// What a box holds besides its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Content {
    /// A text block.
    Text(TextBlock),
    /// A QR symbol scaled to fill the box.
    Qr(QrGlyph),
}

/// The three rows of the primary block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    /// GRN number row.
    GrnNo,
    /// Part number row.
    PartNo,
    /// Description row.
    Description,
}

impl Field {
    /// Rows top to bottom.
    pub const ALL: [Field; 3] = [Field::GrnNo, Field::PartNo, Field::Description];

    /// Caption in the left column.
    pub const fn caption(self) -> &'static str {
        match self {
            Field::GrnNo => "GRN No",
            Field::PartNo => "Part No",
            Field::Description => "Description",
        }
    }
}

/// What a box is, for lookups and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BoxRole {
    /// Root of a label.
    Label,
    /// GRN / Part / Description rows.
    PrimaryBlock,
    /// One row of the primary block.
    FieldRow(Field),
    /// Left (caption) cell of a primary row.
    FieldCaption(Field),
    /// Right (value) cell of a primary row.
    FieldValue(Field),
    /// Location row.
    LocationBlock,
    /// Left (caption) cell of the location row.
    LocationCaption,
    /// Right cell of the location row holding the slots.
    LocationGrid,
    /// One slot of the location grid.
    Slot(usize),
    /// Date and QR row.
    BottomBlock,
    /// Left cell of the bottom row.
    DateCell,
    /// "Receipt Date:" caption.
    DateCaption,
    /// Cleaned receipt date.
    DateValue,
    /// Right cell of the bottom row.
    QrCell,
    /// The QR symbol itself.
    QrSymbol,
}

/// A node of the label tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBox {
    /// What this box is.
    pub role: BoxRole,
    /// Where it sits on the page.
    pub rect: Rect,
    /// Border, if the box draws one.
    pub border: Option<Stroke>,
    /// Text or glyph held directly by this box.
    pub content: Option<Content>,
    /// Nested boxes.
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    pub(crate) fn new(role: BoxRole, rect: Rect) -> Self {
        Self {
            role,
            rect,
            border: None,
            content: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn bordered(mut self, stroke: Stroke) -> Self {
        self.border = Some(stroke);
        self
    }

    pub(crate) fn with_text(mut self, text: impl Into<String>, style: TextStyle) -> Self {
        self.content = Some(Content::Text(TextBlock {
            text: text.into(),
            style,
        }));
        self
    }

    pub(crate) fn with_children(mut self, children: Vec<LayoutBox>) -> Self {
        self.children = children;
        self
    }

    /// This box and all descendants, depth first, parents before children.
    pub fn walk(&self) -> Vec<&LayoutBox> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// First box with `role`, searching depth first.
    pub fn find(&self, role: BoxRole) -> Option<&LayoutBox> {
        self.walk().into_iter().find(|b| b.role == role)
    }

    /// Text content, if this box holds text.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Some(Content::Text(t)) => Some(&t.text),
            _ => None,
        }
    }
}
