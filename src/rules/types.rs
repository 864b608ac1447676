use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Deceptive design meant to steer the user against their interest.
    #[serde(rename = "darkux")]
    DarkUx,
    Usability,
    Accessibility,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::DarkUx => "darkux",
            Category::Usability => "usability",
            Category::Accessibility => "accessibility",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().replace(['_', ' '], "-").as_str() {
            "darkux" | "dark-ux" | "dark-pattern" => Some(Category::DarkUx),
            "usability" => Some(Category::Usability),
            "accessibility" | "a11y" => Some(Category::Accessibility),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Confidence score, always within 0..=100.
pub type ConfidenceScore = u8;

pub const MAX_CONFIDENCE: ConfidenceScore = 100;

/// One detector's verdict for one analysis. At most one per `pattern_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternFinding {
    pub pattern_id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    pub confidence: ConfidenceScore,
}

/// A usability or accessibility problem as shown in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub description: String,
    pub severity: Severity,
}

impl From<&PatternFinding> for Issue {
    fn from(finding: &PatternFinding) -> Self {
        Self {
            description: finding.description.clone(),
            severity: finding.severity,
        }
    }
}
