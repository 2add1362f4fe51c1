//! Terminal errors of a label run.

use std::error::Error as StdError;

use sticker_labels_diagnostics::codes;

/// Why a dataset cannot produce a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DatasetProblem {
    /// No header columns at all.
    #[error("dataset has no columns")]
    NoColumns,
    /// A header but no data rows.
    #[error("dataset has no records")]
    NoRecords,
}

/// Conditions that abort a whole run. Per-record problems are never
/// reported here; they become [`Diagnostic`](crate::Diagnostic)s instead.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    /// The dataset has no columns or no records.
    #[error("invalid dataset: {0}")]
    InvalidDataset(DatasetProblem),

    /// The document backend failed to serialize the composed pages.
    #[error("document build failed: {source}")]
    DocumentBuild {
        /// The backend's error.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The caller stopped the run from the progress callback.
    #[error("run abandoned after {completed} of {total} labels")]
    Abandoned {
        /// Labels composed before the caller stopped the run.
        completed: usize,
        /// Records in the dataset.
        total: usize,
    },
}

impl LabelError {
    /// Diagnostic code matching this error, for uniform reporting.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            LabelError::InvalidDataset(DatasetProblem::NoColumns) => Some(codes::NO_COLUMNS),
            LabelError::InvalidDataset(DatasetProblem::NoRecords) => Some(codes::NO_RECORDS),
            LabelError::DocumentBuild { .. } => Some(codes::DOCUMENT_BUILD),
            LabelError::Abandoned { .. } => None,
        }
    }
}
