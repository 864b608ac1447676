//! The immutable analysis report handed to the presentation layer.

use crate::rules::{Category, ConfidenceScore, Issue, PatternFinding};
use crate::scoring::CategoryScores;
use crate::signal::Timing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DarkUxPatterns {
    /// True exactly when `patterns` is non-empty.
    pub detected: bool,
    /// Highest pattern confidence, or 0.
    pub confidence: ConfidenceScore,
    pub patterns: Vec<PatternFinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub score: u8,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebVitals {
    pub lcp: String,
    pub fid: String,
    pub cls: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub score: u8,
    pub load_time: String,
    pub web_vitals: WebVitals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub dark_ux_patterns: DarkUxPatterns,
    pub usability: CategoryReport,
    pub accessibility: CategoryReport,
    pub performance: PerformanceReport,
    /// Highest priority first; no duplicates.
    pub recommendations: Vec<String>,
}

/// Composes upstream outputs into an [`AnalysisResult`].
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn assemble(
        findings: Vec<PatternFinding>,
        scores: &CategoryScores,
        timing: &Timing,
        recommendations: Vec<String>,
    ) -> AnalysisResult {
        let mut patterns = Vec::new();
        let mut usability_issues = Vec::new();
        let mut accessibility_issues = Vec::new();
        for finding in findings {
            match finding.category {
                Category::DarkUx => patterns.push(finding),
                Category::Usability => usability_issues.push(Issue::from(&finding)),
                Category::Accessibility => accessibility_issues.push(Issue::from(&finding)),
            }
        }

        AnalysisResult {
            dark_ux_patterns: DarkUxPatterns {
                detected: !patterns.is_empty(),
                confidence: scores.dark_ux_confidence,
                patterns,
            },
            usability: CategoryReport {
                score: scores.usability,
                issues: usability_issues,
            },
            accessibility: CategoryReport {
                score: scores.accessibility,
                issues: accessibility_issues,
            },
            performance: PerformanceReport {
                score: scores.performance,
                load_time: format_seconds(timing.load_time_ms),
                web_vitals: WebVitals {
                    lcp: format_seconds(timing.lcp_ms),
                    fid: format_millis(timing.fid_ms),
                    cls: format_cls(timing.cls_score),
                },
            },
            recommendations,
        }
    }
}

/// `3200.0` → `"3.2s"`
pub fn format_seconds(ms: f64) -> String {
    format!("{:.1}s", ms / 1000.0)
}

/// `180.0` → `"180ms"`
pub fn format_millis(ms: f64) -> String {
    format!("{:.0}ms", ms)
}

/// `0.12` → `"0.12"`
pub fn format_cls(cls: f64) -> String {
    format!("{:.2}", cls)
}
