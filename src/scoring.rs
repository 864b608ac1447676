use crate::rules::{Category, PatternFinding, Severity};
use crate::signal::Timing;
use serde::{Deserialize, Serialize};

const MAX_SCORE: u32 = 100;

/// Share of a vital's weight earned in each band.
const GOOD_CREDIT: f64 = 1.0;
const NEEDS_IMPROVEMENT_CREDIT: f64 = 0.5;
const POOR_CREDIT: f64 = 0.0;

/// Points subtracted from a 100-point category score per finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyTable {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl Default for PenaltyTable {
    fn default() -> Self {
        Self {
            high: 20,
            medium: 10,
            low: 5,
        }
    }
}

impl PenaltyTable {
    pub fn penalty(&self, severity: Severity) -> u32 {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// Each penalty must fit within a 100-point score.
    pub fn validate(&self) -> Result<(), String> {
        for severity in [Severity::High, Severity::Medium, Severity::Low] {
            let penalty = self.penalty(severity);
            if penalty > MAX_SCORE {
                return Err(format!(
                    "{} penalty {} exceeds {}",
                    severity.as_str(),
                    penalty,
                    MAX_SCORE
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Band {
    Good,
    NeedsImprovement,
    Poor,
}

impl Band {
    pub fn credit(&self) -> f64 {
        match self {
            Band::Good => GOOD_CREDIT,
            Band::NeedsImprovement => NEEDS_IMPROVEMENT_CREDIT,
            Band::Poor => POOR_CREDIT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Good => "good",
            Band::NeedsImprovement => "needs-improvement",
            Band::Poor => "poor",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vital {
    LoadTime,
    Lcp,
    Fid,
    Cls,
}

impl Vital {
    pub const ALL: [Vital; 4] = [Vital::LoadTime, Vital::Lcp, Vital::Fid, Vital::Cls];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vital::LoadTime => "load_time",
            Vital::Lcp => "lcp",
            Vital::Fid => "fid",
            Vital::Cls => "cls",
        }
    }

    pub fn value(&self, timing: &Timing) -> f64 {
        match self {
            Vital::LoadTime => timing.load_time_ms,
            Vital::Lcp => timing.lcp_ms,
            Vital::Fid => timing.fid_ms,
            Vital::Cls => timing.cls_score,
        }
    }
}

impl std::fmt::Display for Vital {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upper bounds (inclusive) of the good and needs-improvement bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalThreshold {
    pub good: f64,
    pub needs_improvement: f64,
    pub weight: f64,
}

impl VitalThreshold {
    pub const fn new(good: f64, needs_improvement: f64, weight: f64) -> Self {
        Self {
            good,
            needs_improvement,
            weight,
        }
    }

    pub fn band(&self, value: f64) -> Band {
        if value <= self.good {
            Band::Good
        } else if value <= self.needs_improvement {
            Band::NeedsImprovement
        } else {
            Band::Poor
        }
    }
}

/// Web-Vitals thresholds and weights; milliseconds except CLS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebVitalsTable {
    pub load_time: VitalThreshold,
    pub lcp: VitalThreshold,
    pub fid: VitalThreshold,
    pub cls: VitalThreshold,
}

impl Default for WebVitalsTable {
    fn default() -> Self {
        Self {
            load_time: VitalThreshold::new(3000.0, 6000.0, 0.15),
            lcp: VitalThreshold::new(2500.0, 4000.0, 0.35),
            fid: VitalThreshold::new(100.0, 300.0, 0.25),
            cls: VitalThreshold::new(0.1, 0.25, 0.25),
        }
    }
}

impl WebVitalsTable {
    pub fn threshold(&self, vital: Vital) -> &VitalThreshold {
        match vital {
            Vital::LoadTime => &self.load_time,
            Vital::Lcp => &self.lcp,
            Vital::Fid => &self.fid,
            Vital::Cls => &self.cls,
        }
    }

    /// Check that bands are ordered and weights sum to one.
    pub fn validate(&self) -> Result<(), String> {
        for vital in Vital::ALL {
            let t = self.threshold(vital);
            let values = [t.good, t.needs_improvement, t.weight];
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(format!("{} thresholds must be non-negative numbers", vital));
            }
            if t.good > t.needs_improvement {
                return Err(format!(
                    "{} good threshold {} exceeds needs-improvement threshold {}",
                    vital, t.good, t.needs_improvement
                ));
            }
        }
        let total: f64 = Vital::ALL.iter().map(|v| self.threshold(*v).weight).sum();
        if (total - 1.0).abs() > 1e-3 {
            return Err(format!("web vital weights must sum to 1.0, got {}", total));
        }
        Ok(())
    }
}

/// The numeric part of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScores {
    pub dark_ux_confidence: u8,
    pub usability: u8,
    pub accessibility: u8,
    pub performance: u8,
    /// Band per vital, in [`Vital::ALL`] order.
    pub vital_bands: Vec<(Vital, Band)>,
}

/// Pure scoring over findings and raw timing.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    penalties: PenaltyTable,
    web_vitals: WebVitalsTable,
}

impl Scorer {
    pub fn new(penalties: PenaltyTable, web_vitals: WebVitalsTable) -> Self {
        Self {
            penalties,
            web_vitals,
        }
    }

    pub fn web_vitals(&self) -> &WebVitalsTable {
        &self.web_vitals
    }

    pub fn score(&self, findings: &[PatternFinding], timing: &Timing) -> CategoryScores {
        CategoryScores {
            dark_ux_confidence: Self::dark_ux_confidence(findings),
            usability: self.penalty_score(findings, Category::Usability),
            accessibility: self.penalty_score(findings, Category::Accessibility),
            performance: self.performance_score(timing),
            vital_bands: self.vital_bands(timing),
        }
    }

    /// Highest confidence among dark UX findings, or 0.
    pub fn dark_ux_confidence(findings: &[PatternFinding]) -> u8 {
        findings
            .iter()
            .filter(|f| f.category == Category::DarkUx)
            .map(|f| f.confidence)
            .max()
            .unwrap_or(0)
    }

    /// 100 minus the summed severity penalties of findings in `category`.
    pub fn penalty_score(&self, findings: &[PatternFinding], category: Category) -> u8 {
        let penalty = findings
            .iter()
            .filter(|f| f.category == category)
            .map(|f| self.penalties.penalty(f.severity))
            .fold(0u32, u32::saturating_add);
        MAX_SCORE.saturating_sub(penalty) as u8
    }

    pub fn vital_bands(&self, timing: &Timing) -> Vec<(Vital, Band)> {
        Vital::ALL
            .iter()
            .map(|v| (*v, self.web_vitals.threshold(*v).band(v.value(timing))))
            .collect()
    }

    /// Weighted band credit across vitals, scaled to 0..=100.
    pub fn performance_score(&self, timing: &Timing) -> u8 {
        let earned: f64 = self
            .vital_bands(timing)
            .iter()
            .map(|(vital, band)| self.web_vitals.threshold(*vital).weight * band.credit())
            .sum();
        (earned * MAX_SCORE as f64).round().clamp(0.0, MAX_SCORE as f64) as u8
    }
}
