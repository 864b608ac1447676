//! Remediation advice for a scored analysis.
//!
//! A finding uses its detector's own recommendation when the catalog gives
//! one. Otherwise usability and accessibility findings share advice keyed by
//! `(category, severity)`. Performance advice is added per Web Vital outside
//! its good band.

use crate::report::{format_cls, format_millis, format_seconds};
use crate::rules::{Catalog, Category, PatternFinding, Severity};
use crate::scoring::{Band, CategoryScores, Vital, WebVitalsTable};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Placeholder replaced by a vital's good-band threshold.
const TARGET_PLACEHOLDER: &str = "{target}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityAdvice {
    pub high: String,
    pub medium: String,
    pub low: String,
}

impl SeverityAdvice {
    pub fn usability() -> Self {
        Self {
            high: "Make primary content legible: raise text contrast to at least 3:1 against its background.".to_string(),
            medium: "Increase the size of tap targets to at least 44x44 pixels for better mobile usability.".to_string(),
            low: "Use a minimum body text size of 12px so content stays readable on small screens.".to_string(),
        }
    }

    pub fn accessibility() -> Self {
        Self {
            high: "Give every button and link an accessible name so screen readers can announce its purpose.".to_string(),
            medium: "Improve color contrast to meet WCAG AA standards (4.5:1 for normal text) and add proper labels to all form inputs.".to_string(),
            low: "Review remaining minor accessibility warnings against WCAG 2.1 AA.".to_string(),
        }
    }

    pub fn get(&self, severity: Severity) -> &str {
        match severity {
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceAdvice {
    pub load_time: String,
    pub lcp: String,
    pub fid: String,
    pub cls: String,
}

impl Default for PerformanceAdvice {
    fn default() -> Self {
        Self {
            load_time: "Reduce total page load time below {target} by deferring non-critical scripts and compressing assets.".to_string(),
            lcp: "Improve Largest Contentful Paint to under {target} by optimizing the largest above-the-fold image and server response time.".to_string(),
            fid: "Reduce First Input Delay below {target} by breaking up long main-thread tasks.".to_string(),
            cls: "Keep Cumulative Layout Shift below {target} by reserving space for images and embedded content.".to_string(),
        }
    }
}

impl PerformanceAdvice {
    pub fn get(&self, vital: Vital) -> &str {
        match vital {
            Vital::LoadTime => &self.load_time,
            Vital::Lcp => &self.lcp,
            Vital::Fid => &self.fid,
            Vital::Cls => &self.cls,
        }
    }
}

/// Severity advice as written in a config file; absent entries keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeverityAdviceOverride {
    high: Option<String>,
    medium: Option<String>,
    low: Option<String>,
}

impl SeverityAdviceOverride {
    fn apply(self, base: SeverityAdvice) -> SeverityAdvice {
        SeverityAdvice {
            high: self.high.unwrap_or(base.high),
            medium: self.medium.unwrap_or(base.medium),
            low: self.low.unwrap_or(base.low),
        }
    }
}

fn usability_advice<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SeverityAdvice, D::Error> {
    Ok(SeverityAdviceOverride::deserialize(deserializer)?.apply(SeverityAdvice::usability()))
}

fn accessibility_advice<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SeverityAdvice, D::Error> {
    Ok(SeverityAdviceOverride::deserialize(deserializer)?.apply(SeverityAdvice::accessibility()))
}

/// Lookup tables for advice text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationTable {
    #[serde(deserialize_with = "usability_advice")]
    pub usability: SeverityAdvice,
    #[serde(deserialize_with = "accessibility_advice")]
    pub accessibility: SeverityAdvice,
    pub performance: PerformanceAdvice,
    /// Emitted once whenever the accessibility score is below 100.
    pub accessibility_boilerplate: String,
}

impl Default for RecommendationTable {
    fn default() -> Self {
        Self {
            usability: SeverityAdvice::usability(),
            accessibility: SeverityAdvice::accessibility(),
            performance: PerformanceAdvice::default(),
            accessibility_boilerplate: "Run a full WCAG 2.1 AA audit with assistive technology to catch issues automated checks miss.".to_string(),
        }
    }
}

impl RecommendationTable {
    /// Advice for a usability or accessibility finding.
    pub fn issue_advice(&self, category: Category, severity: Severity) -> Option<&str> {
        let advice = match category {
            Category::Usability => self.usability.get(severity),
            Category::Accessibility => self.accessibility.get(severity),
            Category::DarkUx => return None,
        };
        (!advice.is_empty()).then_some(advice)
    }
}

#[derive(Debug)]
struct Candidate {
    severity: Severity,
    order: usize,
    text: String,
}

/// Maps findings and scores to ordered, de-duplicated advice.
#[derive(Debug, Clone, Default)]
pub struct RecommendationGenerator {
    table: RecommendationTable,
}

impl RecommendationGenerator {
    pub fn new(table: RecommendationTable) -> Self {
        Self { table }
    }

    /// Highest severity first, then catalog declaration order; each string once.
    pub fn generate(
        &self,
        catalog: &Catalog,
        findings: &[PatternFinding],
        scores: &CategoryScores,
        web_vitals: &WebVitalsTable,
    ) -> Vec<String> {
        let mut candidates: Vec<Candidate> = findings
            .iter()
            .filter_map(|finding| self.finding_candidate(catalog, finding))
            .collect();

        if scores.performance < 100 {
            candidates.extend(self.performance_candidates(catalog.len(), scores, web_vitals));
        }

        if scores.accessibility < 100 && !self.table.accessibility_boilerplate.is_empty() {
            candidates.push(Candidate {
                severity: Severity::Low,
                order: catalog.len() + Vital::ALL.len(),
                text: self.table.accessibility_boilerplate.clone(),
            });
        }

        candidates.sort_by_key(|c| (Reverse(c.severity), c.order));

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|c| seen.insert(c.text.clone()))
            .map(|c| c.text)
            .collect()
    }

    fn finding_candidate(&self, catalog: &Catalog, finding: &PatternFinding) -> Option<Candidate> {
        let own = catalog
            .get(&finding.pattern_id)
            .map(|spec| spec.recommendation.as_str())
            .filter(|r| !r.is_empty());
        let text = match (own, finding.category) {
            (Some(text), _) => text,
            (None, Category::DarkUx) => return None,
            (None, category) => self.table.issue_advice(category, finding.severity)?,
        };
        Some(Candidate {
            severity: finding.severity,
            order: catalog.position(&finding.pattern_id).unwrap_or(catalog.len()),
            text: text.to_string(),
        })
    }

    fn performance_candidates<'a>(
        &'a self,
        base_order: usize,
        scores: &'a CategoryScores,
        web_vitals: &'a WebVitalsTable,
    ) -> impl Iterator<Item = Candidate> + 'a {
        scores
            .vital_bands
            .iter()
            .enumerate()
            .filter(|(_, (_, band))| *band != Band::Good)
            .filter_map(move |(i, (vital, band))| {
                let template = self.table.performance.get(*vital);
                if template.is_empty() {
                    return None;
                }
                let target = format_target(*vital, web_vitals.threshold(*vital).good);
                Some(Candidate {
                    severity: if *band == Band::Poor {
                        Severity::High
                    } else {
                        Severity::Medium
                    },
                    order: base_order + i,
                    text: template.replace(TARGET_PLACEHOLDER, &target),
                })
            })
    }
}

fn format_target(vital: Vital, good: f64) -> String {
    match vital {
        Vital::LoadTime | Vital::Lcp => format_seconds(good),
        Vital::Fid => format_millis(good),
        Vital::Cls => format_cls(good),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Scorer;
    use crate::signal::Timing;
    use crate::test_utils::fixtures::{builtin_catalog, create_finding, good_timing, poor_timing};

    fn generate(findings: &[PatternFinding], timing: &Timing) -> Vec<String> {
        let catalog = builtin_catalog();
        let scorer = Scorer::default();
        let scores = scorer.score(findings, timing);
        RecommendationGenerator::default().generate(&catalog, findings, &scores, scorer.web_vitals())
    }

    #[test]
    fn test_no_findings_good_timing_is_empty() {
        assert!(generate(&[], &good_timing()).is_empty());
    }

    #[test]
    fn test_dark_ux_uses_detector_recommendation() {
        let findings = vec![create_finding("DX-001", Category::DarkUx, Severity::High, 95)];
        let recs = generate(&findings, &good_timing());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].starts_with("Make subscription cancellation options clearly visible"));
    }

    #[test]
    fn test_issue_advice_is_deduplicated() {
        // AC-001 and AC-002 are both medium accessibility findings
        let findings = vec![
            create_finding("AC-001", Category::Accessibility, Severity::Medium, 70),
            create_finding("AC-002", Category::Accessibility, Severity::Medium, 85),
        ];
        let recs = generate(&findings, &good_timing());
        let table = RecommendationTable::default();
        assert_eq!(recs, vec![table.accessibility.medium.clone(), table.accessibility_boilerplate.clone()]);
    }

    #[test]
    fn test_ordering_by_severity_then_catalog_order() {
        let findings = vec![
            create_finding("DX-002", Category::DarkUx, Severity::Medium, 60),
            create_finding("DX-003", Category::DarkUx, Severity::High, 70),
            create_finding("US-002", Category::Usability, Severity::Low, 50),
            create_finding("DX-001", Category::DarkUx, Severity::High, 90),
        ];
        let catalog = builtin_catalog();
        let recs = generate(&findings, &good_timing());
        let rec = |id: &str| catalog.get(id).unwrap().recommendation.clone();

        assert_eq!(
            recs,
            vec![
                rec("DX-001"),
                rec("DX-003"),
                rec("DX-002"),
                RecommendationTable::default().usability.low,
            ]
        );
    }

    #[test]
    fn test_performance_advice_per_vital() {
        let recs = generate(&[], &poor_timing());
        assert_eq!(recs.len(), 4);
        assert!(recs[0].contains("below 3.0s"));
        assert!(recs[1].contains("under 2.5s"));
        assert!(recs[2].contains("below 100ms"));
        assert!(recs[3].contains("below 0.10"));
    }

    #[test]
    fn test_needs_improvement_ranks_below_poor() {
        let timing = Timing {
            lcp_ms: 3000.0,
            fid_ms: 500.0,
            ..good_timing()
        };
        let findings = vec![create_finding("DX-002", Category::DarkUx, Severity::Medium, 60)];
        let recs = generate(&findings, &timing);
        assert_eq!(recs.len(), 3);
        assert!(recs[0].contains("First Input Delay"), "Poor FID is high severity");
        assert!(recs[1].starts_with("Ensure countdown timers"), "Catalog entries precede perf advice on ties");
        assert!(recs[2].contains("Largest Contentful Paint"));
    }

    #[test]
    fn test_empty_advice_is_skipped() {
        let mut table = RecommendationTable::default();
        table.usability.medium = String::new();
        table.accessibility_boilerplate = String::new();
        let findings = vec![
            create_finding("US-001", Category::Usability, Severity::Medium, 60),
            create_finding("AC-003", Category::Accessibility, Severity::High, 85),
        ];
        let catalog = builtin_catalog();
        let scorer = Scorer::default();
        let scores = scorer.score(&findings, &good_timing());
        let recs = RecommendationGenerator::new(table.clone()).generate(
            &catalog,
            &findings,
            &scores,
            scorer.web_vitals(),
        );
        assert_eq!(recs, vec![table.accessibility.high]);
    }

    #[test]
    fn test_detector_recommendation_overrides_shared_advice() {
        // AC-003 and AC-004 are both high accessibility findings
        let findings = vec![
            create_finding("AC-003", Category::Accessibility, Severity::High, 85),
            create_finding("AC-004", Category::Accessibility, Severity::High, 90),
        ];
        let recs = generate(&findings, &good_timing());
        let table = RecommendationTable::default();
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0], table.accessibility.high);
        assert!(recs[1].starts_with("Add appropriate alt text"));
        assert_eq!(recs[2], table.accessibility_boilerplate);
    }

    #[test]
    fn test_partial_advice_override_keeps_defaults() {
        let yaml = "usability:\n  high: Fix contrast\naccessibility:\n  low: Check focus order\n";
        let table: RecommendationTable = serde_yaml::from_str(yaml).unwrap();
        let defaults = RecommendationTable::default();

        assert_eq!(table.usability.high, "Fix contrast");
        assert_eq!(table.usability.medium, defaults.usability.medium);
        assert_eq!(table.usability.low, defaults.usability.low);
        assert_eq!(table.accessibility.high, defaults.accessibility.high);
        assert_eq!(table.accessibility.low, "Check focus order");
        assert_eq!(table.performance, defaults.performance);
    }

    #[test]
    fn test_recommendations_bounded_by_findings() {
        let findings = vec![
            create_finding("DX-001", Category::DarkUx, Severity::High, 90),
            create_finding("US-001", Category::Usability, Severity::Medium, 60),
            create_finding("AC-001", Category::Accessibility, Severity::Medium, 60),
        ];
        let recs = generate(&findings, &poor_timing());
        assert!(recs.len() <= findings.len() + Vital::ALL.len() + 1);
    }
}
