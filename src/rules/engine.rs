use crate::rules::catalog::{Catalog, DetectorSpec};
use crate::rules::types::{ConfidenceScore, MAX_CONFIDENCE, PatternFinding};
use crate::signal::ContentSignal;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Applies every catalog detector to a signal.
///
/// Detectors never see each other's output, so parallel and sequential
/// evaluation produce the same findings, in catalog declaration order.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    catalog: Arc<Catalog>,
    parallel: bool,
}

impl RuleEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Evaluate the catalog, yielding at most one finding per detector.
    pub fn evaluate(&self, signal: &ContentSignal) -> Vec<PatternFinding> {
        let detectors = self.catalog.detectors();
        let findings: Vec<PatternFinding> = if self.parallel {
            detectors
                .par_iter()
                .filter_map(|spec| Self::evaluate_detector(spec, signal))
                .collect()
        } else {
            detectors
                .iter()
                .filter_map(|spec| Self::evaluate_detector(spec, signal))
                .collect()
        };

        debug!(
            detectors = detectors.len(),
            findings = findings.len(),
            parallel = self.parallel,
            "Evaluated detector catalog"
        );
        findings
    }

    /// Evaluate one detector. Repeated matches collapse into a single finding
    /// carrying the strongest match's confidence.
    pub fn evaluate_detector(spec: &DetectorSpec, signal: &ContentSignal) -> Option<PatternFinding> {
        let strengths = spec.kind.match_strengths(signal);
        trace!(
            pattern_id = %spec.id,
            kind = spec.kind.as_str(),
            matches = strengths.len(),
            "Evaluated detector"
        );

        let strongest = strengths
            .iter()
            .map(|s| spec.confidence.at(*s))
            .reduce(f64::max)?;

        Some(PatternFinding {
            pattern_id: spec.id.clone(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            category: spec.category,
            severity: spec.severity,
            confidence: clamp_confidence(&spec.id, strongest),
        })
    }
}

/// Force a raw confidence into 0..=100, warning when it was out of range.
pub fn clamp_confidence(pattern_id: &str, raw: f64) -> ConfidenceScore {
    let max = MAX_CONFIDENCE as f64;
    if raw.is_nan() {
        warn!(pattern_id, "Confidence function returned NaN; using 0");
        return 0;
    }
    if !(0.0..=max).contains(&raw) {
        warn!(pattern_id, raw, "Confidence out of range; clamping to 0..=100");
    }
    raw.round().clamp(0.0, max) as ConfidenceScore
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::{ConfidenceRange, DetectorKind};
    use crate::rules::types::{Category, Severity};
    use crate::signal::{InteractiveElement, InteractiveKind, Rect, TextBlock, Timing};
    use crate::test_utils::fixtures::{builtin_catalog, hidden_cancel_link, visible_button};
    use regex::Regex;

    fn engine() -> RuleEngine {
        RuleEngine::new(builtin_catalog())
    }

    fn ids(findings: &[PatternFinding]) -> Vec<&str> {
        findings.iter().map(|f| f.pattern_id.as_str()).collect()
    }

    #[test]
    fn test_empty_signal_has_no_findings() {
        let findings = engine().evaluate(&ContentSignal::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_detect_hidden_cancellation() {
        let signal = ContentSignal::new(Timing::default()).with_interactive_element(hidden_cancel_link());
        let findings = engine().evaluate(&signal);

        let dx: Vec<_> = findings.iter().filter(|f| f.pattern_id == "DX-001").collect();
        assert_eq!(dx.len(), 1);
        assert_eq!(dx[0].category, Category::DarkUx);
        assert_eq!(dx[0].severity, Severity::High);
        assert_eq!(dx[0].confidence, 98);
    }

    #[test]
    fn test_repeated_matches_yield_one_finding_with_max_confidence() {
        let mut tiny = hidden_cancel_link();
        tiny.visible = true;
        tiny.bounding_box = Rect::new(0.0, 0.0, 10.0, 10.0);

        let signal = ContentSignal::new(Timing::default())
            .with_interactive_element(tiny.clone())
            .with_interactive_element(tiny)
            .with_interactive_element(hidden_cancel_link());

        let findings = engine().evaluate(&signal);
        let dx: Vec<_> = findings.iter().filter(|f| f.pattern_id == "DX-001").collect();
        assert_eq!(dx.len(), 1);
        assert_eq!(dx[0].confidence, 98, "Max of matches, not a sum");
    }

    #[test]
    fn test_more_matches_never_lower_confidence() {
        let mut signal = ContentSignal::new(Timing::default());
        let mut previous = 0;
        for side in [19.0, 12.0, 6.0] {
            let mut link = hidden_cancel_link();
            link.visible = true;
            link.bounding_box = Rect::new(0.0, 0.0, side, side);
            signal = signal.with_interactive_element(link);

            let finding = RuleEngine::evaluate_detector(&engine().catalog().detectors()[0], &signal)
                .unwrap();
            assert!(finding.confidence >= previous);
            previous = finding.confidence;
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let signal = ContentSignal::new(Timing::default())
            .with_interactive_element(hidden_cancel_link())
            .with_interactive_element(InteractiveElement {
                kind: InteractiveKind::Input,
                bounding_box: Rect::new(0.0, 100.0, 20.0, 20.0),
                label: String::new(),
                visible: true,
                checked: false,
            })
            .with_text_block(TextBlock {
                text: "Only 2 left!".to_string(),
                bounding_box: Rect::new(0.0, 0.0, 200.0, 10.0),
                font_size_px: 10.0,
            });

        let parallel = engine().with_parallel(true).evaluate(&signal);
        let sequential = engine().with_parallel(false).evaluate(&signal);
        assert_eq!(parallel, sequential);
        assert_eq!(ids(&parallel), vec!["DX-001", "DX-002", "US-001", "US-002", "AC-002"]);
    }

    #[test]
    fn test_catalog_order_does_not_change_result_set() {
        let signal = ContentSignal::new(Timing::default())
            .with_interactive_element(hidden_cancel_link())
            .with_interactive_element(visible_button("", 20.0));

        let forward = engine().evaluate(&signal);

        let mut reversed_specs = builtin_catalog().detectors().to_vec();
        reversed_specs.reverse();
        let reversed = RuleEngine::new(Arc::new(Catalog::new("1", reversed_specs).unwrap()))
            .evaluate(&signal);

        let mut a = forward.clone();
        let mut b = reversed;
        a.sort_by(|x, y| x.pattern_id.cmp(&y.pattern_id));
        b.sort_by(|x, y| x.pattern_id.cmp(&y.pattern_id));
        assert_eq!(a, b);
    }

    #[test]
    fn test_clamp_confidence() {
        assert_eq!(clamp_confidence("X", 42.4), 42);
        assert_eq!(clamp_confidence("X", 150.0), 100);
        assert_eq!(clamp_confidence("X", -5.0), 0);
        assert_eq!(clamp_confidence("X", f64::NAN), 0);
    }

    #[test]
    fn test_evaluate_detector_without_match() {
        let spec = DetectorSpec {
            id: "T-1".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            category: Category::DarkUx,
            severity: Severity::Low,
            confidence: ConfidenceRange::new(10, 20),
            recommendation: String::new(),
            kind: DetectorKind::TextPattern {
                patterns: vec![Regex::new("never").unwrap()],
                emphasis_font_px: 10.0,
            },
        };
        assert!(RuleEngine::evaluate_detector(&spec, &ContentSignal::default()).is_none());
    }
}
