//! Signal extraction: turning a screenshot or rendered page into a
//! [`ContentSignal`].
//!
//! Everything downstream of a [`SignalExtractor`] assumes a well-formed
//! signal and does no validation of its own.

pub mod deadline;
pub mod snapshot;

pub use deadline::{CancelHandle, CancelToken, extract_with_deadline};
pub use snapshot::{ComputedStyle, DomNode, RenderedPageSnapshot, SnapshotExtractor};

use crate::signal::ContentSignal;
use std::time::Duration;
use thiserror::Error;

/// Raw screenshot data tagged with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBytes {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageBytes {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }
}

/// Input accepted at the extraction boundary.
#[derive(Debug, Clone)]
pub enum RawInput {
    Image(ImageBytes),
    Snapshot(RenderedPageSnapshot),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode input: {0}")]
    DecodeFailure(String),

    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),
}

impl ExtractionError {
    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "unsupported-format",
            Self::DecodeFailure(_) => "decode-failure",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Produces a [`ContentSignal`] from raw input.
///
/// Implementations must be deterministic for identical input.
pub trait SignalExtractor: Send + Sync {
    fn extract(&self, input: &RawInput) -> Result<ContentSignal, ExtractionError>;
}
