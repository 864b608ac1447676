//! End-to-end pipeline: Rule Engine → Scorer → Recommendation Generator →
//! Report Assembler.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::extract::{CancelToken, RawInput, SignalExtractor, extract_with_deadline};
use crate::recommend::RecommendationGenerator;
use crate::report::{AnalysisResult, ReportAssembler};
use crate::rules::{Catalog, RuleEngine};
use crate::scoring::Scorer;
use crate::signal::ContentSignal;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Holds the read-only catalog and tables shared by every analysis.
#[derive(Debug, Clone)]
pub struct Analyzer {
    engine: RuleEngine,
    scorer: Scorer,
    recommender: RecommendationGenerator,
}

impl Analyzer {
    /// Validate `config` and load its catalog.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let catalog = config.load_catalog()?;
        info!(
            version = catalog.version(),
            detectors = catalog.len(),
            "Loaded detector catalog"
        );
        Self::from_catalog(Arc::new(catalog), config)
    }

    /// Build an analyzer over an already-loaded catalog; `config.catalog` is ignored.
    pub fn from_catalog(catalog: Arc<Catalog>, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: RuleEngine::new(catalog).with_parallel(config.parallel),
            scorer: Scorer::new(config.penalties, config.web_vitals),
            recommender: RecommendationGenerator::new(config.recommendations.clone()),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        self.engine.catalog()
    }

    /// Analyze a well-formed signal. Never fails.
    pub fn analyze(&self, signal: &ContentSignal) -> AnalysisResult {
        let findings = self.engine.evaluate(signal);
        let scores = self.scorer.score(&findings, &signal.timing);
        let recommendations = self.recommender.generate(
            self.engine.catalog(),
            &findings,
            &scores,
            self.scorer.web_vitals(),
        );

        debug!(
            findings = findings.len(),
            usability = scores.usability,
            accessibility = scores.accessibility,
            performance = scores.performance,
            recommendations = recommendations.len(),
            "Analysis complete"
        );

        ReportAssembler::assemble(findings, &scores, &signal.timing, recommendations)
    }

    /// Extract then analyze. Extraction errors fail the whole request.
    pub fn analyze_input(
        &self,
        extractor: &dyn SignalExtractor,
        input: &RawInput,
    ) -> Result<AnalysisResult> {
        let signal = extractor.extract(input)?;
        Ok(self.analyze(&signal))
    }

    /// Analyze independent signals concurrently; results keep input order.
    pub fn analyze_batch(&self, signals: &[ContentSignal]) -> Vec<AnalysisResult> {
        signals.par_iter().map(|signal| self.analyze(signal)).collect()
    }

    /// Extract under a deadline and cancellation signal, then analyze.
    pub async fn analyze_with_deadline(
        &self,
        extractor: Arc<dyn SignalExtractor>,
        input: RawInput,
        timeout: Duration,
        cancel: CancelToken,
    ) -> Result<AnalysisResult> {
        let signal = extract_with_deadline(extractor, input, timeout, cancel).await?;
        Ok(self.analyze(&signal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::extract::{ExtractionError, ImageBytes, SnapshotExtractor};
    use crate::rules::Severity;
    use crate::scoring::{PenaltyTable, VitalThreshold};
    use crate::test_utils::fixtures::{
        builtin_catalog, good_timing, hidden_cancel_link, poor_timing, visible_button,
    };

    fn analyzer() -> Analyzer {
        Analyzer::new(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.web_vitals.fid = VitalThreshold::new(300.0, 100.0, 0.25);
        let err = Analyzer::new(&config).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_new_rejects_oversized_penalties() {
        let config = EngineConfig::default().with_penalties(PenaltyTable {
            high: u32::MAX / 2 + 1,
            medium: 10,
            low: 5,
        });
        let err = Analyzer::from_catalog(builtin_catalog(), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_new_rejects_missing_catalog() {
        let config = EngineConfig::default().with_catalog("/nonexistent/catalog.yaml");
        assert!(Analyzer::new(&config).is_err());
    }

    #[test]
    fn test_analyze_clean_signal() {
        let result = analyzer().analyze(&ContentSignal::new(good_timing()));
        assert!(!result.dark_ux_patterns.detected);
        assert_eq!(result.usability.score, 100);
        assert_eq!(result.accessibility.score, 100);
        assert_eq!(result.performance.score, 100);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_analyze_hidden_cancellation() {
        let signal = ContentSignal::new(good_timing()).with_interactive_element(hidden_cancel_link());
        let result = analyzer().analyze(&signal);

        assert!(result.dark_ux_patterns.detected);
        assert_eq!(result.dark_ux_patterns.patterns.len(), 1);
        assert_eq!(result.dark_ux_patterns.patterns[0].pattern_id, "DX-001");
        assert_eq!(result.dark_ux_patterns.patterns[0].severity, Severity::High);
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn test_custom_penalties_apply() {
        let config = EngineConfig::default().with_penalties(PenaltyTable {
            high: 50,
            medium: 40,
            low: 30,
        });
        let analyzer = Analyzer::from_catalog(builtin_catalog(), &config).unwrap();
        let signal = ContentSignal::new(good_timing()).with_interactive_element(visible_button("OK", 20.0));
        assert_eq!(analyzer.analyze(&signal).usability.score, 60);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let signal = ContentSignal::new(poor_timing())
            .with_interactive_element(hidden_cancel_link())
            .with_interactive_element(visible_button("", 20.0));
        let parallel = analyzer().analyze(&signal);
        let sequential = Analyzer::from_catalog(
            builtin_catalog(),
            &EngineConfig::default().with_parallel(false),
        )
        .unwrap()
        .analyze(&signal);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_analyze_batch_keeps_order() {
        let clean = ContentSignal::new(good_timing());
        let dark = ContentSignal::new(good_timing()).with_interactive_element(hidden_cancel_link());
        let analyzer = analyzer();

        let results = analyzer.analyze_batch(&[clean.clone(), dark.clone(), clean.clone()]);
        assert_eq!(results.len(), 3);
        assert!(!results[0].dark_ux_patterns.detected);
        assert!(results[1].dark_ux_patterns.detected);
        assert_eq!(results[1], analyzer.analyze(&dark));
        assert_eq!(results[2], results[0]);
    }

    #[test]
    fn test_analyze_input_propagates_extraction_error() {
        let input = RawInput::Image(ImageBytes::new("image/gif", b"GIF89a".to_vec()));
        let err = analyzer().analyze_input(&SnapshotExtractor::new(), &input).unwrap_err();
        match err {
            AnalysisError::Extraction(ExtractionError::UnsupportedFormat(_)) => {}
            other => panic!("expected unsupported format, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_analyze_with_deadline() {
        let input = RawInput::Snapshot(crate::extract::RenderedPageSnapshot {
            nodes: vec![],
            timing: good_timing(),
        });
        let result = analyzer()
            .analyze_with_deadline(
                Arc::new(SnapshotExtractor::new()),
                input,
                Duration::from_secs(5),
                CancelToken::never(),
            )
            .await
            .unwrap();
        assert_eq!(result.performance.score, 100);
    }
}
