use crate::rules::catalog::{ConfidenceRange, DetectorKind, DetectorSpec};
use crate::rules::types::{Category, Severity};

pub fn detectors() -> Vec<DetectorSpec> {
    vec![us_001(), us_002(), us_003()]
}

fn us_001() -> DetectorSpec {
    DetectorSpec {
        id: "US-001".to_string(),
        name: "Small tap targets".to_string(),
        description: "Small tap targets make it difficult for users to interact with elements on mobile devices.".to_string(),
        category: Category::Usability,
        severity: Severity::Medium,
        confidence: ConfidenceRange::new(50, 90),
        recommendation: String::new(),
        kind: DetectorKind::SmallTapTarget { min_size_px: 44.0 },
    }
}

fn us_002() -> DetectorSpec {
    DetectorSpec {
        id: "US-002".to_string(),
        name: "Small body text".to_string(),
        description: "Text set below 12px is hard to read, especially on mobile devices.".to_string(),
        category: Category::Usability,
        severity: Severity::Low,
        confidence: ConfidenceRange::new(40, 80),
        recommendation: String::new(),
        kind: DetectorKind::SmallText { min_font_px: 12.0 },
    }
}

fn us_003() -> DetectorSpec {
    DetectorSpec {
        id: "US-003".to_string(),
        name: "Low contrast text".to_string(),
        description: "Low contrast text makes content hard to read for some users.".to_string(),
        category: Category::Usability,
        severity: Severity::High,
        confidence: ConfidenceRange::new(60, 95),
        recommendation: String::new(),
        kind: DetectorKind::LowContrast { min_ratio: 3.0 },
    }
}
