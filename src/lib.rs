pub mod analyzer;
pub mod config;
pub mod error;
pub mod extract;
pub mod recommend;
pub mod report;
pub mod reporter;
pub mod rules;
pub mod scoring;
pub mod signal;

#[cfg(test)]
pub mod test_utils;

pub use analyzer::Analyzer;
pub use config::{ConfigError, ConfigFormat, EngineConfig, SyntaxError};
pub use error::{AnalysisError, Result};
pub use extract::{
    CancelHandle, CancelToken, ExtractionError, ImageBytes, RawInput, RenderedPageSnapshot,
    SignalExtractor, SnapshotExtractor, extract_with_deadline,
};
pub use recommend::{RecommendationGenerator, RecommendationTable};
pub use report::{AnalysisResult, ReportAssembler};
pub use reporter::{Reporter, json::JsonReporter};
pub use rules::{Catalog, CatalogError, CatalogLoader, Category, PatternFinding, RuleEngine, Severity};
pub use scoring::{PenaltyTable, Scorer, WebVitalsTable};
pub use signal::{ContentSignal, Timing};
