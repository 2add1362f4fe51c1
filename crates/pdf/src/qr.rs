//! QR symbol encoding with the `qrcode` crate.

use qrcode::{Color, EcLevel, QrCode};
use sticker_labels_core::{QrEncoder, QrGlyph};

use crate::QrError;

/// [`QrEncoder`] producing symbols at a fixed error-correction level.
#[derive(Debug, Clone, Copy)]
pub struct QrCodeEncoder {
    level: EcLevel,
}

impl QrCodeEncoder {
    /// Encoder at error-correction level M (about 15 % recovery).
    pub fn new() -> Self {
        Self { level: EcLevel::M }
    }

    /// Encoder at a different error-correction level.
    pub fn with_level(level: EcLevel) -> Self {
        Self { level }
    }
}

impl Default for QrCodeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QrEncoder for QrCodeEncoder {
    type Error = QrError;

    fn encode(&self, payload: &str) -> Result<QrGlyph, QrError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.level)?;
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        Ok(QrGlyph::from_modules(code.width(), modules))
    }
}
