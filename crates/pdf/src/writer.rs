//! PDF serialization of composed pages with `lopdf`.
//!
//! Page primitives use a top-left origin; PDF user space starts at the
//! bottom-left, so every y coordinate is flipped against the page height.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use sticker_labels_core::layout::{Font, HAlign, Rect, Stroke, TextBlock, VAlign};
use sticker_labels_core::page::{Page, Primitive};
use sticker_labels_core::{DocumentBackend, QrGlyph};

use crate::PdfError;
use crate::metrics::{self, CAP_HEIGHT};

/// Distance from the top of a top-aligned cell to its first line box.
const TOP_INSET: f32 = 2.0;

/// [`DocumentBackend`] writing one PDF page per composed page.
///
/// Text uses the standard Type 1 Helvetica faces with WinAnsi encoding;
/// characters outside Latin-1 are written as `?`.
#[derive(Debug, Clone, Default)]
pub struct PdfBackend {
    title: Option<String>,
}

impl PdfBackend {
    /// Backend with no document title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title stored in the PDF info dictionary.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl DocumentBackend for PdfBackend {
    type Error = PdfError;

    fn render(&mut self, pages: &[Page]) -> Result<Vec<u8>, PdfError> {
        if pages.is_empty() {
            return Err(PdfError::NoPages);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(font_dict(Font::Helvetica));
        let bold = doc.add_object(font_dict(Font::HelveticaBold));

        let mut states = BTreeMap::new();
        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let mut painter = Painter::new(page.height, &mut states);
            for primitive in &page.primitives {
                painter.paint(primitive);
            }
            let bytes = Content {
                operations: painter.ops,
            }
            .encode()
            .map_err(|source| PdfError::Content {
                page: index + 1,
                source,
            })?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
            let media_box: Vec<Object> = vec![
                0.into(),
                0.into(),
                page.width.into(),
                page.height.into(),
            ];
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let mut ext_g_states = Dictionary::new();
        for (name, alpha) in &states {
            ext_g_states.set(
                name.clone(),
                dictionary! {
                    "Type" => "ExtGState",
                    "CA" => *alpha,
                    "ca" => *alpha,
                },
            );
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
            "ExtGState" => ext_g_states,
        });

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal("sticker-labels"),
        };
        if let Some(title) = &self.title {
            info.set("Title", Object::string_literal(win_ansi(title)));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| PdfError::Write(e.into()))?;
        tracing::debug!(pages = pages.len(), bytes = out.len(), "rendered PDF");
        Ok(out)
    }
}

fn font_dict(font: Font) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_name(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn font_resource(font: Font) -> &'static str {
    match font {
        Font::Helvetica => "F1",
        Font::HelveticaBold => "F2",
    }
}

/// Latin-1 bytes for `text`; anything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

/// Content-stream builder for one page.
struct Painter<'a> {
    height: f32,
    ops: Vec<Operation>,
    states: &'a mut BTreeMap<String, f32>,
}

impl<'a> Painter<'a> {
    fn new(height: f32, states: &'a mut BTreeMap<String, f32>) -> Self {
        Self {
            height,
            ops: vec![Operation::new("g", vec![0.into()])],
            states,
        }
    }

    fn paint(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::StrokeRect { rect, stroke } => self.stroke_rect(rect, *stroke),
            Primitive::Text { rect, block } => self.text(rect, block),
            Primitive::Qr { rect, glyph } => self.qr(rect, glyph),
        }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    /// `re` operands for `rect`, flipped into PDF space.
    fn re(&self, rect: &Rect) -> Vec<Object> {
        vec![
            rect.x.into(),
            (self.height - rect.bottom()).into(),
            rect.width.into(),
            rect.height.into(),
        ]
    }

    fn stroke_rect(&mut self, rect: &Rect, stroke: Stroke) {
        if !stroke.is_visible() {
            return;
        }
        self.op("q", vec![]);
        if stroke.opacity < 1.0 {
            let name = format!("GS{}", (stroke.opacity * 1000.0).round() as u32);
            self.states.insert(name.clone(), stroke.opacity);
            self.op("gs", vec![Object::Name(name.into_bytes())]);
        }
        self.op("w", vec![stroke.width.into()]);
        self.op("G", vec![0.into()]);
        let re = self.re(rect);
        self.op("re", re);
        self.op("S", vec![]);
        self.op("Q", vec![]);
    }

    fn text(&mut self, rect: &Rect, block: &TextBlock) {
        let style = &block.style;
        let max_width = (rect.width - 2.0 * style.padding).max(0.0);
        let (mut lines, size) = if style.wrap {
            (
                metrics::wrap(style.font, style.size, &block.text, max_width),
                style.size,
            )
        } else {
            let natural = metrics::text_width(style.font, style.size, &block.text);
            (
                vec![block.text.clone()],
                style.fitted_size(natural, max_width),
            )
        };
        let max_lines = ((rect.height / style.leading).floor() as usize).max(1);
        lines.truncate(max_lines);

        let block_height = lines.len() as f32 * style.leading;
        let top = match style.v_align {
            VAlign::Top => rect.y + TOP_INSET,
            VAlign::Middle => rect.y + (rect.height - block_height) / 2.0,
        };
        let cap = size * CAP_HEIGHT / 1000.0;

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let width = metrics::text_width(style.font, size, line);
            let x = match style.h_align {
                HAlign::Left => rect.x + style.padding,
                HAlign::Center => rect.x + (rect.width - width) / 2.0,
                HAlign::Right => rect.right() - style.padding - width,
            };
            let baseline = top + i as f32 * style.leading + (style.leading + cap) / 2.0;

            self.op("BT", vec![]);
            self.op(
                "Tf",
                vec![font_resource(style.font).into(), size.into()],
            );
            self.op("Td", vec![x.into(), (self.height - baseline).into()]);
            self.op("Tj", vec![Object::string_literal(win_ansi(line))]);
            self.op("ET", vec![]);
        }
    }

    fn qr(&mut self, rect: &Rect, glyph: &QrGlyph) {
        let modules = glyph.width() + 2 * QrGlyph::QUIET_ZONE;
        let module = rect.width.min(rect.height) / modules as f32;
        self.op("q", vec![]);
        self.op("g", vec![0.into()]);
        for (row, start, len) in glyph.dark_runs() {
            let run = Rect::new(
                rect.x + (QrGlyph::QUIET_ZONE + start) as f32 * module,
                rect.y + (QrGlyph::QUIET_ZONE + row) as f32 * module,
                len as f32 * module,
                module,
            );
            let re = self.re(&run);
            self.op("re", re);
        }
        self.op("f", vec![]);
        self.op("Q", vec![]);
    }
}
