//! Seams to the external capabilities: QR symbol encoding and document
//! serialization.

use std::error::Error as StdError;

use serde::Serialize;

use crate::page::Page;

/// A QR symbol as a square grid of modules, row-major, `true` = dark.
///
/// The quiet zone is not part of the grid; renderers leave
/// [`QrGlyph::QUIET_ZONE`] light modules around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrGlyph {
    width: usize,
    modules: Vec<bool>,
}

impl QrGlyph {
    /// Light modules expected on each side of the symbol.
    pub const QUIET_ZONE: usize = 4;

    /// Build a glyph from `width × width` modules.
    ///
    /// Panics if `modules.len() != width * width`.
    pub fn from_modules(width: usize, modules: Vec<bool>) -> Self {
        assert_eq!(
            modules.len(),
            width * width,
            "QrGlyph: {} modules for width {width}",
            modules.len()
        );
        Self { width, modules }
    }

    /// Modules per side, quiet zone excluded.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the module at column `x`, row `y` is dark.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }

    /// Horizontal runs of dark modules as `(row, first column, length)`.
    pub fn dark_runs(&self) -> Vec<(usize, usize, usize)> {
        let mut runs = Vec::new();
        for y in 0..self.width {
            let mut x = 0;
            while x < self.width {
                if self.is_dark(x, y) {
                    let start = x;
                    while x < self.width && self.is_dark(x, y) {
                        x += 1;
                    }
                    runs.push((y, start, x - start));
                } else {
                    x += 1;
                }
            }
        }
        runs
    }
}

/// Turns a text payload into a QR symbol.
pub trait QrEncoder {
    /// Why a payload could not be encoded.
    type Error: StdError + Send + Sync + 'static;

    /// Encode `payload`.
    fn encode(&self, payload: &str) -> Result<QrGlyph, Self::Error>;
}

/// Serializes composed pages into the final document bytes.
pub trait DocumentBackend {
    /// Why serialization failed.
    type Error: StdError + Send + Sync + 'static;

    /// Render `pages`, in order, into one document.
    fn render(&mut self, pages: &[Page]) -> Result<Vec<u8>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_runs_merge_neighbours() {
        #[rustfmt::skip]
        let glyph = QrGlyph::from_modules(3, vec![
            true,  true,  false,
            false, false, false,
            true,  false, true,
        ]);
        assert_eq!(glyph.dark_runs(), [(0, 0, 2), (2, 0, 1), (2, 2, 1)]);
    }

    #[test]
    #[should_panic(expected = "QrGlyph: 3 modules for width 2")]
    fn module_count_must_match_width() {
        QrGlyph::from_modules(2, vec![true; 3]);
    }
}
