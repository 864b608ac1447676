//! Configuration type definitions.

use crate::recommend::RecommendationTable;
use crate::scoring::{PenaltyTable, WebVitalsTable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything an [`Analyzer`](crate::Analyzer) reads at start-up.
///
/// Loaded once; never mutated while serving requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// External detector catalog (YAML or JSON). `None` uses the built-in catalog.
    pub catalog: Option<PathBuf>,
    /// Per-severity penalties for usability and accessibility scores.
    pub penalties: PenaltyTable,
    /// Web-Vitals bands and weights for the performance score.
    pub web_vitals: WebVitalsTable,
    /// Advice text tables.
    pub recommendations: RecommendationTable,
    /// Evaluate detectors on the rayon pool.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            penalties: PenaltyTable::default(),
            web_vitals: WebVitalsTable::default(),
            recommendations: RecommendationTable::default(),
            parallel: true,
        }
    }
}

impl EngineConfig {
    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog = Some(path.into());
        self
    }

    pub fn with_penalties(mut self, penalties: PenaltyTable) -> Self {
        self.penalties = penalties;
        self
    }

    pub fn with_web_vitals(mut self, web_vitals: WebVitalsTable) -> Self {
        self.web_vitals = web_vitals;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
