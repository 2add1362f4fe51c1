//! Label geometry profiles for the sticker label composer.
//!
//! A [`LabelGeometry`] carries the only tunable knobs of the layout (the
//! date-box width ratio, the date and QR row heights, and the location-grid
//! variant). Everything else about the sticker is a fixed physical constant
//! in [`sticker`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or validating a label geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// JSON deserialization failed.
    #[error("invalid geometry JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Fixed physical dimensions of the sticker, in centimetres.
pub mod sticker {
    /// Physical page width.
    pub const WIDTH_CM: f32 = 10.0;
    /// Physical page height.
    pub const HEIGHT_CM: f32 = 15.0;
    /// Width of the bordered content box.
    pub const CONTENT_BOX_WIDTH_CM: f32 = 10.0;
    /// Height of the bordered content box.
    pub const CONTENT_BOX_HEIGHT_CM: f32 = 7.2;
    /// Distance from the top page edge to the content box.
    pub const TOP_MARGIN_CM: f32 = 0.2;
    /// Left and right inset of the label content.
    pub const SIDE_MARGIN_CM: f32 = 0.1;
    /// Usable width of every label row.
    pub const CONTENT_WIDTH_CM: f32 = CONTENT_BOX_WIDTH_CM - 2.0 * SIDE_MARGIN_CM;

    /// GRN number row.
    pub const GRN_ROW_CM: f32 = 0.9;
    /// Part number row.
    pub const PART_ROW_CM: f32 = 0.9;
    /// Description row (fits two wrapped lines).
    pub const DESCRIPTION_ROW_CM: f32 = 1.4;
    /// Location grid row.
    pub const LOCATION_ROW_CM: f32 = 0.8;
    /// Gap between the location grid and the date/QR row.
    pub const SPACER_CM: f32 = 0.3;

    /// Sum of every row above the date/QR row, spacer included.
    pub const FIXED_ROWS_CM: f32 =
        GRN_ROW_CM + PART_ROW_CM + DESCRIPTION_ROW_CM + LOCATION_ROW_CM + SPACER_CM;
}

/// PostScript points per centimetre.
pub const POINTS_PER_CM: f32 = 72.0 / 2.54;

/// Convert centimetres to PostScript points.
pub const fn cm(value: f32) -> f32 {
    value * POINTS_PER_CM
}

/// Which location grid the label carries.
///
/// The two variants differ in slot count, caption text, slot weighting and
/// the column names that identify the location field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationVariant {
    /// Four uniform slots captioned "Store Location".
    #[default]
    Store,
    /// Seven weighted slots captioned "Put Away Zone/Loc".
    PutAway,
}

const PUT_AWAY_WEIGHTS: [f32; 7] = [1.25, 1.25, 1.25, 1.25, 1.0, 1.0, 0.9];
const STORE_WEIGHTS: [f32; 4] = [1.0; 4];

impl LocationVariant {
    /// Number of slots in the location grid.
    pub const fn slot_count(self) -> usize {
        match self {
            LocationVariant::Store => STORE_WEIGHTS.len(),
            LocationVariant::PutAway => PUT_AWAY_WEIGHTS.len(),
        }
    }

    /// Caption printed in the left cell of the location row.
    pub const fn caption(self) -> &'static str {
        match self {
            LocationVariant::Store => "Store Location",
            LocationVariant::PutAway => "Put Away Zone/Loc",
        }
    }

    /// Relative slot widths used when the geometry does not override them.
    pub const fn default_weights(self) -> &'static [f32] {
        match self {
            LocationVariant::Store => &STORE_WEIGHTS,
            LocationVariant::PutAway => &PUT_AWAY_WEIGHTS,
        }
    }
}

impl std::fmt::Display for LocationVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationVariant::Store => write!(f, "store"),
            LocationVariant::PutAway => write!(f, "put-away"),
        }
    }
}

/// Tunable label geometry, immutable for the duration of one document build.
///
/// Missing JSON fields take the defaults of [`LabelGeometry::default`].
///
/// # Example
/// ```
/// let geometry = sticker_labels_profile::LabelGeometry {
///     date_width_ratio: 0.6,
///     variant: sticker_labels_profile::LocationVariant::PutAway,
///     ..Default::default()
/// };
/// assert!(geometry.validate().is_ok());
/// assert_eq!(geometry.slot_count(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelGeometry {
    /// Fraction of the content width given to the receipt-date box, in (0, 1).
    pub date_width_ratio: f32,
    /// Height of the receipt-date box in centimetres.
    pub date_height_cm: f32,
    /// Height of the QR box (and of the whole bottom row) in centimetres.
    pub qr_height_cm: f32,
    /// Location grid variant.
    pub variant: LocationVariant,
    /// Optional per-slot width weights overriding the variant's defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_weights: Option<Vec<f32>>,
}

impl Default for LabelGeometry {
    fn default() -> Self {
        Self {
            date_width_ratio: 0.5,
            date_height_cm: 1.2,
            qr_height_cm: 2.3,
            variant: LocationVariant::Store,
            slot_weights: None,
        }
    }
}

impl LabelGeometry {
    /// Number of location slots.
    pub fn slot_count(&self) -> usize {
        self.variant.slot_count()
    }

    /// Effective slot weights: the override when present, else the variant's.
    pub fn slot_weights(&self) -> &[f32] {
        self.slot_weights
            .as_deref()
            .unwrap_or_else(|| self.variant.default_weights())
    }

    /// Height of the date/QR row: the taller of the two configured heights.
    pub fn bottom_row_height_cm(&self) -> f32 {
        self.date_height_cm.max(self.qr_height_cm)
    }

    /// Check every invariant of the geometry.
    ///
    /// - `date_width_ratio` must lie strictly between 0 and 1
    /// - `date_height_cm` and `qr_height_cm` must be finite and > 0
    /// - `slot_weights` (if present) must have one finite, positive entry per slot
    /// - the rows must fit inside the content box
    pub fn validate(&self) -> Result<(), GeometryError> {
        let r = self.date_width_ratio;
        if !r.is_finite() || r <= 0.0 || r >= 1.0 {
            return Err(GeometryError::InvalidField {
                field: "date_width_ratio".into(),
                reason: format!("{r} is not strictly between 0 and 1"),
            });
        }

        for (field, value) in [
            ("date_height_cm", self.date_height_cm),
            ("qr_height_cm", self.qr_height_cm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::InvalidField {
                    field: field.into(),
                    reason: format!("{value} must be a positive length"),
                });
            }
        }

        if let Some(weights) = &self.slot_weights {
            let expected = self.variant.slot_count();
            if weights.len() != expected {
                return Err(GeometryError::InvalidField {
                    field: "slot_weights".into(),
                    reason: format!(
                        "{} weights given, the {} variant has {expected} slots",
                        weights.len(),
                        self.variant
                    ),
                });
            }
            if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w <= 0.0) {
                return Err(GeometryError::InvalidField {
                    field: "slot_weights".into(),
                    reason: format!("weight {bad} must be positive"),
                });
            }
        }

        let total = sticker::FIXED_ROWS_CM + self.bottom_row_height_cm();
        // Small tolerance so that sums of decimal centimetre values that land
        // exactly on the box height are not rejected by float rounding.
        if total > sticker::CONTENT_BOX_HEIGHT_CM + 1e-4 {
            return Err(GeometryError::InvalidField {
                field: "qr_height_cm".into(),
                reason: format!(
                    "bottom row of {:.2} cm overflows the {:.1} cm content box \
                     (at most {:.2} cm available)",
                    self.bottom_row_height_cm(),
                    sticker::CONTENT_BOX_HEIGHT_CM,
                    sticker::CONTENT_BOX_HEIGHT_CM - sticker::FIXED_ROWS_CM
                ),
            });
        }

        Ok(())
    }
}

/// Load and validate a [`LabelGeometry`] from a JSON string.
///
/// Every field is optional; absent fields keep their defaults. The result
/// is checked with [`LabelGeometry::validate`].
pub fn load_geometry_from_str(s: &str) -> Result<LabelGeometry, GeometryError> {
    let geometry: LabelGeometry = serde_json::from_str(s)?;
    geometry.validate()?;
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let g = LabelGeometry::default();
        g.validate().unwrap();
        assert_eq!(g.slot_count(), 4);
        assert_eq!(g.slot_weights(), &[1.0, 1.0, 1.0, 1.0]);
        assert!((g.bottom_row_height_cm() - 2.3).abs() < f32::EPSILON);
    }

    #[test]
    fn load_full_geometry() {
        let json = r#"{
            "date_width_ratio": 0.4,
            "date_height_cm": 1.5,
            "qr_height_cm": 2.7,
            "variant": "put-away"
        }"#;
        let g = load_geometry_from_str(json).unwrap();
        assert_eq!(g.variant, LocationVariant::PutAway);
        assert_eq!(g.slot_count(), 7);
        assert_eq!(g.slot_weights(), &PUT_AWAY_WEIGHTS);
        assert!((g.date_width_ratio - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn load_empty_object_uses_defaults() {
        let g = load_geometry_from_str("{}").unwrap();
        assert_eq!(g, LabelGeometry::default());
    }

    #[test]
    fn ratio_bounds_are_exclusive() {
        for bad in [0.0, 1.0, -0.2, 1.5, f32::NAN] {
            let g = LabelGeometry {
                date_width_ratio: bad,
                ..Default::default()
            };
            let err = g.validate().unwrap_err();
            assert!(
                err.to_string().contains("date_width_ratio"),
                "error should mention date_width_ratio: {err}"
            );
        }
    }

    #[test]
    fn heights_must_be_positive() {
        let g = LabelGeometry {
            date_height_cm: 0.0,
            ..Default::default()
        };
        assert!(g.validate().unwrap_err().to_string().contains("date_height_cm"));

        let g = LabelGeometry {
            qr_height_cm: -1.0,
            ..Default::default()
        };
        assert!(g.validate().unwrap_err().to_string().contains("qr_height_cm"));
    }

    #[test]
    fn bottom_row_must_fit_content_box() {
        // 4.3 cm of fixed rows leaves 2.9 cm.
        let fits = LabelGeometry {
            qr_height_cm: 2.9,
            ..Default::default()
        };
        fits.validate().unwrap();

        let overflows = LabelGeometry {
            qr_height_cm: 3.5,
            ..Default::default()
        };
        let err = overflows.validate().unwrap_err();
        assert!(err.to_string().contains("overflows"), "{err}");

        // The taller of the two heights decides.
        let tall_date = LabelGeometry {
            date_height_cm: 3.0,
            qr_height_cm: 1.5,
            ..Default::default()
        };
        assert!(tall_date.validate().is_err());
    }

    #[test]
    fn slot_weight_override_is_checked() {
        let g = LabelGeometry {
            slot_weights: Some(vec![2.0, 1.0, 1.0, 1.0]),
            ..Default::default()
        };
        g.validate().unwrap();
        assert_eq!(g.slot_weights(), &[2.0, 1.0, 1.0, 1.0]);

        let wrong_len = LabelGeometry {
            slot_weights: Some(vec![1.0; 7]),
            ..Default::default()
        };
        let err = wrong_len.validate().unwrap_err();
        assert!(err.to_string().contains("4 slots"), "{err}");

        let zero = LabelGeometry {
            slot_weights: Some(vec![1.0, 0.0, 1.0, 1.0]),
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = load_geometry_from_str("{ not json").unwrap_err();
        assert!(matches!(err, GeometryError::InvalidJson(_)));

        let err = load_geometry_from_str(r#"{ "variant": "pallet" }"#).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidJson(_)));
    }

    #[test]
    fn variant_text() {
        assert_eq!(LocationVariant::Store.caption(), "Store Location");
        assert_eq!(LocationVariant::PutAway.caption(), "Put Away Zone/Loc");
        assert_eq!(LocationVariant::PutAway.to_string(), "put-away");
        let v: LocationVariant = serde_json::from_str("\"put-away\"").unwrap();
        assert_eq!(v, LocationVariant::PutAway);
    }

    #[test]
    fn centimetre_conversion() {
        assert!((cm(2.54) - 72.0).abs() < 1e-3);
        assert!((sticker::CONTENT_WIDTH_CM - 9.8).abs() < 1e-5);
    }
}
