//! Error types for widget initialization.
//!
//! Only construction can fail: the host contract is validated once at mount.
//! Runtime operations addressed at missing rectangles are silent no-ops by
//! design and never surface here.

use thiserror::Error;

/// Errors produced while validating host-supplied initialization input.
#[derive(Error, Debug)]
pub enum InitError {
    /// The host supplied no labels at all
    #[error("label list must not be empty")]
    EmptyLabelList,

    /// The label vocabulary must be distinct
    #[error("duplicate label in label list: {label}")]
    DuplicateLabel {
        /// The repeated label
        label: String,
    },

    /// Image dimensions must be positive for scale computation
    #[error("image size must be positive, got {width}x{height}")]
    InvalidImageSize { width: f32, height: f32 },

    /// A seed rectangle referenced a label outside the vocabulary
    #[error("seed rectangle references unknown label: {label}")]
    UnknownSeedLabel {
        /// The out-of-vocabulary label
        label: String,
    },

    /// Initialization input could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
