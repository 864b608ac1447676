use crate::config::ConfigError;
use crate::extract::ExtractionError;
use crate::rules::CatalogError;
use thiserror::Error;

/// The single terminal error of an analysis request.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Extraction failed ({reason}): {0}", reason = .0.reason())]
    Extraction(#[from] ExtractionError),

    #[error("Invalid detector catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Analysis cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
