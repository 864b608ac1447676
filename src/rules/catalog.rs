//! Versioned detector catalog and its YAML/JSON loader.
//!
//! The catalog is plain immutable data: each [`DetectorSpec`] pairs report
//! metadata with a tagged [`DetectorKind`]. Nothing in a spec refers to any
//! other spec, so detectors can be evaluated in any order.

use crate::rules::builtin;
use crate::rules::types::{Category, ConfidenceScore, MAX_CONFIDENCE, Severity};
use crate::signal::InteractiveKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Catalog schema version this build understands.
pub const SUPPORTED_CATALOG_VERSION: &str = "1";

const DEFAULT_MIN_AREA_PX: f64 = 400.0;
const DEFAULT_EMPHASIS_FONT_PX: f64 = 24.0;
/// Images below this area are treated as spacers or tracking pixels.
const DEFAULT_MIN_IMAGE_AREA_PX: f64 = 16.0;

/// Linear confidence mapping from match strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceRange {
    pub floor: ConfidenceScore,
    pub ceiling: ConfidenceScore,
}

impl ConfidenceRange {
    pub const fn new(floor: ConfidenceScore, ceiling: ConfidenceScore) -> Self {
        Self { floor, ceiling }
    }

    /// Unclamped confidence for a match of the given strength.
    pub fn at(&self, strength: f64) -> f64 {
        let floor = self.floor as f64;
        let span = self.ceiling as f64 - floor;
        (floor + span * strength).round()
    }
}

/// What a detector looks for, with its tuning parameters.
#[derive(Debug, Clone)]
pub enum DetectorKind {
    /// Interactive element with a matching label that is invisible or tiny.
    HiddenInteractive {
        label_pattern: Regex,
        min_area_px: f64,
    },
    /// Text block matching any pattern; larger type is a stronger signal.
    TextPattern {
        patterns: Vec<Regex>,
        emphasis_font_px: f64,
    },
    /// Checkbox with a matching label that arrives already checked.
    PreselectedConsent { label_pattern: Regex },
    /// Decline option rendered smaller than the accept option.
    AsymmetricChoice {
        accept_pattern: Regex,
        decline_pattern: Regex,
    },
    SmallTapTarget { min_size_px: f64 },
    SmallText { min_font_px: f64 },
    LowContrast { min_ratio: f64 },
    MissingLabel { kinds: Vec<InteractiveKind> },
    /// Visible image without any text alternative.
    MissingAltText { min_area_px: f64 },
}

impl DetectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::HiddenInteractive { .. } => "hidden-interactive",
            DetectorKind::TextPattern { .. } => "text-pattern",
            DetectorKind::PreselectedConsent { .. } => "preselected-consent",
            DetectorKind::AsymmetricChoice { .. } => "asymmetric-choice",
            DetectorKind::SmallTapTarget { .. } => "small-tap-target",
            DetectorKind::SmallText { .. } => "small-text",
            DetectorKind::LowContrast { .. } => "low-contrast",
            DetectorKind::MissingLabel { .. } => "missing-label",
            DetectorKind::MissingAltText { .. } => "missing-alt-text",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectorSpec {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    pub confidence: ConfidenceRange,
    /// Remediation text. Required in practice for dark UX findings; other
    /// categories fall back to shared advice when empty.
    pub recommendation: String,
    pub kind: DetectorKind,
}

/// A validated, ordered set of detector specs.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    detectors: Vec<DetectorSpec>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate or empty ids and bad confidence ranges.
    pub fn new(version: impl Into<String>, detectors: Vec<DetectorSpec>) -> Result<Self, CatalogError> {
        let version = version.into();
        if version != SUPPORTED_CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion(version));
        }

        let mut seen = HashSet::with_capacity(detectors.len());
        for spec in &detectors {
            if spec.id.trim().is_empty() {
                return Err(CatalogError::InvalidSpec {
                    pattern_id: spec.id.clone(),
                    reason: "id must not be empty".to_string(),
                });
            }
            if !seen.insert(spec.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    pattern_id: spec.id.clone(),
                });
            }
            validate_confidence(&spec.id, spec.confidence)?;
        }

        Ok(Self { version, detectors })
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(SUPPORTED_CATALOG_VERSION, builtin::all_detectors())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn detectors(&self) -> &[DetectorSpec] {
        &self.detectors
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DetectorSpec> {
        self.detectors.iter().find(|d| d.id == id)
    }

    /// Declaration index of a detector, used as the ordering tie-breaker.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.detectors.iter().position(|d| d.id == id)
    }
}

fn validate_confidence(id: &str, range: ConfidenceRange) -> Result<(), CatalogError> {
    if range.ceiling > MAX_CONFIDENCE {
        return Err(CatalogError::InvalidSpec {
            pattern_id: id.to_string(),
            reason: format!("confidence ceiling {} exceeds 100", range.ceiling),
        });
    }
    if range.floor > range.ceiling {
        return Err(CatalogError::InvalidSpec {
            pattern_id: id.to_string(),
            reason: format!(
                "confidence floor {} is above ceiling {}",
                range.floor, range.ceiling
            ),
        });
    }
    Ok(())
}

/// On-disk schema for a catalog file.
///
/// Entries stay untyped until [`CatalogLoader`] can read their id, so schema
/// errors inside an entry are reported against that entry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    pub version: String,
    pub detectors: Vec<serde_yaml::Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfidence {
    pub floor: u32,
    pub ceiling: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlDetector {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub severity: String,
    pub kind: String,
    pub confidence: YamlConfidence,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub label_pattern: Option<String>,
    #[serde(default)]
    pub min_area_px: Option<f64>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub emphasis_font_px: Option<f64>,
    #[serde(default)]
    pub accept_pattern: Option<String>,
    #[serde(default)]
    pub decline_pattern: Option<String>,
    #[serde(default)]
    pub min_size_px: Option<f64>,
    #[serde(default)]
    pub min_font_px: Option<f64>,
    #[serde(default)]
    pub min_ratio: Option<f64>,
    #[serde(default)]
    pub kinds: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read detector catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse detector catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unsupported catalog version '{0}'. Expected: \"1\"")]
    UnsupportedVersion(String),

    #[error("Invalid detector {pattern_id}: {reason}")]
    InvalidSpec { pattern_id: String, reason: String },

    #[error("Duplicate detector id {pattern_id}")]
    DuplicateId { pattern_id: String },
}

impl CatalogError {
    /// The offending detector, when the error concerns a single spec.
    pub fn pattern_id(&self) -> Option<&str> {
        match self {
            Self::InvalidSpec { pattern_id, .. } | Self::DuplicateId { pattern_id } => {
                Some(pattern_id.as_str())
            }
            _ => None,
        }
    }

    fn invalid(pattern_id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            pattern_id: pattern_id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Loads detector catalogs from YAML (or JSON, which YAML accepts).
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load_from_file(path: &Path) -> Result<Catalog, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content)
    }

    pub fn load_from_string(content: &str) -> Result<Catalog, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        if file.version != SUPPORTED_CATALOG_VERSION {
            return Err(CatalogError::UnsupportedVersion(file.version));
        }
        let detectors = file
            .detectors
            .into_iter()
            .enumerate()
            .map(|(index, entry)| Self::parse_detector(index, entry).and_then(Self::convert_detector))
            .collect::<Result<Vec<_>, _>>()?;
        let catalog = Catalog::new(file.version, detectors)?;
        debug!(
            version = catalog.version(),
            detectors = catalog.len(),
            "Loaded detector catalog"
        );
        Ok(catalog)
    }

    /// Deserialize one catalog entry. Entries without a string id are named by position.
    pub fn parse_detector(index: usize, entry: serde_yaml::Value) -> Result<YamlDetector, CatalogError> {
        let pattern_id = entry
            .get("id")
            .and_then(serde_yaml::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("detectors[{}]", index));
        serde_yaml::from_value(entry).map_err(|e| CatalogError::InvalidSpec {
            pattern_id,
            reason: e.to_string(),
        })
    }

    /// Convert one file entry into a typed spec.
    pub fn convert_detector(yaml: YamlDetector) -> Result<DetectorSpec, CatalogError> {
        let id = yaml.id.as_str();
        let category = Category::parse(&yaml.category).ok_or_else(|| {
            CatalogError::invalid(
                id,
                format!(
                    "invalid category '{}'. Expected: darkux, usability, accessibility",
                    yaml.category
                ),
            )
        })?;
        let severity = Severity::parse(&yaml.severity).ok_or_else(|| {
            CatalogError::invalid(
                id,
                format!(
                    "invalid severity '{}'. Expected: high, medium, low",
                    yaml.severity
                ),
            )
        })?;
        let confidence = Self::convert_confidence(id, yaml.confidence)?;
        let kind = Self::convert_kind(&yaml)?;

        Ok(DetectorSpec {
            id: yaml.id,
            name: yaml.name,
            description: yaml.description,
            category,
            severity,
            confidence,
            recommendation: yaml.recommendation,
            kind,
        })
    }

    fn convert_confidence(id: &str, value: YamlConfidence) -> Result<ConfidenceRange, CatalogError> {
        let to_score = |v: u32| {
            ConfidenceScore::try_from(v)
                .ok()
                .filter(|s| *s <= MAX_CONFIDENCE)
                .ok_or_else(|| CatalogError::invalid(id, format!("confidence {} is outside 0..=100", v)))
        };
        let range = ConfidenceRange::new(to_score(value.floor)?, to_score(value.ceiling)?);
        validate_confidence(id, range)?;
        Ok(range)
    }

    fn convert_kind(yaml: &YamlDetector) -> Result<DetectorKind, CatalogError> {
        let id = yaml.id.as_str();
        match yaml.kind.to_lowercase().replace('_', "-").as_str() {
            "hidden-interactive" => Ok(DetectorKind::HiddenInteractive {
                label_pattern: Self::required_regex(id, "label_pattern", &yaml.label_pattern)?,
                min_area_px: Self::positive(
                    id,
                    "min_area_px",
                    yaml.min_area_px.unwrap_or(DEFAULT_MIN_AREA_PX),
                )?,
            }),
            "text-pattern" => {
                if yaml.patterns.is_empty() {
                    return Err(CatalogError::invalid(id, "text-pattern requires at least one pattern"));
                }
                let patterns = yaml
                    .patterns
                    .iter()
                    .map(|p| Self::compile(id, p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(DetectorKind::TextPattern {
                    patterns,
                    emphasis_font_px: Self::positive(
                        id,
                        "emphasis_font_px",
                        yaml.emphasis_font_px.unwrap_or(DEFAULT_EMPHASIS_FONT_PX),
                    )?,
                })
            }
            "preselected-consent" => Ok(DetectorKind::PreselectedConsent {
                label_pattern: Self::required_regex(id, "label_pattern", &yaml.label_pattern)?,
            }),
            "asymmetric-choice" => Ok(DetectorKind::AsymmetricChoice {
                accept_pattern: Self::required_regex(id, "accept_pattern", &yaml.accept_pattern)?,
                decline_pattern: Self::required_regex(id, "decline_pattern", &yaml.decline_pattern)?,
            }),
            "small-tap-target" => Ok(DetectorKind::SmallTapTarget {
                min_size_px: Self::required_positive(id, "min_size_px", yaml.min_size_px)?,
            }),
            "small-text" => Ok(DetectorKind::SmallText {
                min_font_px: Self::required_positive(id, "min_font_px", yaml.min_font_px)?,
            }),
            "low-contrast" => {
                let min_ratio = Self::required_positive(id, "min_ratio", yaml.min_ratio)?;
                if min_ratio <= 1.0 || min_ratio > 21.0 {
                    return Err(CatalogError::invalid(
                        id,
                        format!("min_ratio {} must be above 1 and at most 21", min_ratio),
                    ));
                }
                Ok(DetectorKind::LowContrast { min_ratio })
            }
            "missing-label" => {
                if yaml.kinds.is_empty() {
                    return Err(CatalogError::invalid(id, "missing-label requires at least one element kind"));
                }
                let kinds = yaml
                    .kinds
                    .iter()
                    .map(|k| {
                        InteractiveKind::parse(k).ok_or_else(|| {
                            CatalogError::invalid(
                                id,
                                format!(
                                    "invalid element kind '{}'. Expected: button, link, checkbox, input",
                                    k
                                ),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(DetectorKind::MissingLabel { kinds })
            }
            "missing-alt-text" => Ok(DetectorKind::MissingAltText {
                min_area_px: Self::positive(
                    id,
                    "min_area_px",
                    yaml.min_area_px.unwrap_or(DEFAULT_MIN_IMAGE_AREA_PX),
                )?,
            }),
            other => Err(CatalogError::invalid(id, format!("unknown detector kind '{}'", other))),
        }
    }

    fn compile(id: &str, pattern: &str) -> Result<Regex, CatalogError> {
        Regex::new(pattern)
            .map_err(|e| CatalogError::invalid(id, format!("invalid regex pattern '{}': {}", pattern, e)))
    }

    fn required_regex(id: &str, field: &str, value: &Option<String>) -> Result<Regex, CatalogError> {
        match value {
            Some(pattern) => Self::compile(id, pattern),
            None => Err(CatalogError::invalid(id, format!("missing required field '{}'", field))),
        }
    }

    fn required_positive(id: &str, field: &str, value: Option<f64>) -> Result<f64, CatalogError> {
        match value {
            Some(v) => Self::positive(id, field, v),
            None => Err(CatalogError::invalid(id, format!("missing required field '{}'", field))),
        }
    }

    fn positive(id: &str, field: &str, value: f64) -> Result<f64, CatalogError> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(CatalogError::invalid(id, format!("'{}' must be a positive number, got {}", field, value)))
        }
    }
}
