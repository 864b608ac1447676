pub mod builtin;
pub mod catalog;
pub mod detectors;
pub mod engine;
pub mod types;

pub use catalog::{
    Catalog, CatalogError, CatalogLoader, ConfidenceRange, DetectorKind, DetectorSpec,
    SUPPORTED_CATALOG_VERSION,
};
pub use engine::{RuleEngine, clamp_confidence};
pub use types::*;
