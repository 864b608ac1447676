use crate::rules::catalog::{ConfidenceRange, DetectorKind, DetectorSpec};
use crate::rules::types::{Category, Severity};
use crate::signal::InteractiveKind;

pub fn detectors() -> Vec<DetectorSpec> {
    vec![ac_001(), ac_002(), ac_003(), ac_004()]
}

fn ac_001() -> DetectorSpec {
    DetectorSpec {
        id: "AC-001".to_string(),
        name: "Insufficient color contrast".to_string(),
        description: "Color contrast does not meet WCAG AA standards.".to_string(),
        category: Category::Accessibility,
        severity: Severity::Medium,
        confidence: ConfidenceRange::new(50, 95),
        recommendation: String::new(),
        kind: DetectorKind::LowContrast { min_ratio: 4.5 },
    }
}

fn ac_002() -> DetectorSpec {
    DetectorSpec {
        id: "AC-002".to_string(),
        name: "Unlabeled form inputs".to_string(),
        description: "Form inputs lack proper labels for screen readers.".to_string(),
        category: Category::Accessibility,
        severity: Severity::Medium,
        confidence: ConfidenceRange::new(85, 85),
        recommendation: String::new(),
        kind: DetectorKind::MissingLabel {
            kinds: vec![InteractiveKind::Input, InteractiveKind::Checkbox],
        },
    }
}

fn ac_003() -> DetectorSpec {
    DetectorSpec {
        id: "AC-003".to_string(),
        name: "Unnamed controls".to_string(),
        description: "Buttons or links have no accessible name, so screen readers cannot announce their purpose.".to_string(),
        category: Category::Accessibility,
        severity: Severity::High,
        confidence: ConfidenceRange::new(85, 85),
        recommendation: String::new(),
        kind: DetectorKind::MissingLabel {
            kinds: vec![InteractiveKind::Button, InteractiveKind::Link],
        },
    }
}

fn ac_004() -> DetectorSpec {
    DetectorSpec {
        id: "AC-004".to_string(),
        name: "Missing alternative text".to_string(),
        description: "Missing alternative text for images that convey important information.".to_string(),
        category: Category::Accessibility,
        severity: Severity::High,
        confidence: ConfidenceRange::new(90, 90),
        recommendation: "Add appropriate alt text to all images that convey information.".to_string(),
        kind: DetectorKind::MissingAltText { min_area_px: 16.0 },
    }
}
