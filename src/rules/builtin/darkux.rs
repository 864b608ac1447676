use crate::rules::catalog::{ConfidenceRange, DetectorKind, DetectorSpec};
use crate::rules::types::{Category, Severity};
use regex::Regex;

pub fn detectors() -> Vec<DetectorSpec> {
    vec![dx_001(), dx_002(), dx_003(), dx_004(), dx_005()]
}

fn dx_001() -> DetectorSpec {
    DetectorSpec {
        id: "DX-001".to_string(),
        name: "Forced Continuity".to_string(),
        description: "The interface makes it difficult to cancel a subscription or trial by hiding cancellation options.".to_string(),
        category: Category::DarkUx,
        severity: Severity::High,
        confidence: ConfidenceRange::new(70, 98),
        recommendation: "Make subscription cancellation options clearly visible and accessible in the same location as subscription sign-up.".to_string(),
        kind: DetectorKind::HiddenInteractive {
            label_pattern: Regex::new(
                r"(?i)\b(cancel|unsubscribe|end (my )?(trial|subscription|membership)|close (my )?account)\b",
            )
            .unwrap(),
            min_area_px: 400.0,
        },
    }
}

fn dx_002() -> DetectorSpec {
    DetectorSpec {
        id: "DX-002".to_string(),
        name: "Fake Urgency".to_string(),
        description: "Scarcity or countdown messaging pressures users to act before they can evaluate the offer.".to_string(),
        category: Category::DarkUx,
        severity: Severity::Medium,
        confidence: ConfidenceRange::new(45, 85),
        recommendation: "Ensure countdown timers reflect actual time limitations rather than resetting for each visitor.".to_string(),
        kind: DetectorKind::TextPattern {
            patterns: vec![
                Regex::new(r"(?i)\bonly \d+ (left|remaining)\b").unwrap(),
                Regex::new(r"(?i)\b(offer|sale|deal|discount) ends in\b").unwrap(),
                Regex::new(r"(?i)\b\d{1,2}:\d{2}(:\d{2})?\s*(left|remaining)\b").unwrap(),
                Regex::new(r"(?i)\blimited[- ]time offer\b").unwrap(),
                Regex::new(r"(?i)\b\d+ (people|others|shoppers) are (viewing|looking at) this\b").unwrap(),
                Regex::new(r"(?i)\bhurry\b").unwrap(),
            ],
            emphasis_font_px: 24.0,
        },
    }
}

fn dx_003() -> DetectorSpec {
    DetectorSpec {
        id: "DX-003".to_string(),
        name: "Privacy Zuckering".to_string(),
        description: "The site tricks users into sharing more personal information than they intended to.".to_string(),
        category: Category::DarkUx,
        severity: Severity::High,
        confidence: ConfidenceRange::new(60, 92),
        recommendation: "Improve the clarity of privacy settings and what data is being collected.".to_string(),
        kind: DetectorKind::PreselectedConsent {
            label_pattern: Regex::new(
                r"(?i)\b(share|partners?|third[- ]part(y|ies)|marketing|personali[sz]ed ads|newsletter|track(ing)?)\b",
            )
            .unwrap(),
        },
    }
}

fn dx_004() -> DetectorSpec {
    DetectorSpec {
        id: "DX-004".to_string(),
        name: "Confirmshaming".to_string(),
        description: "The option to decline is worded to guilt or shame the user into accepting.".to_string(),
        category: Category::DarkUx,
        severity: Severity::Medium,
        confidence: ConfidenceRange::new(55, 90),
        recommendation: "Word decline options neutrally, for example \"No thanks\", without implying the user is foolish for declining.".to_string(),
        kind: DetectorKind::TextPattern {
            patterns: vec![
                Regex::new(r"(?i)\bno thanks,? i (don'?t|do not) (want|like|care)\b").unwrap(),
                Regex::new(r"(?i)\bi('d| would) rather (pay full price|miss out|stay uninformed)\b")
                    .unwrap(),
                Regex::new(r"(?i)\bi (don'?t|do not) (want|like) (to )?sav(e|ing)\b").unwrap(),
            ],
            emphasis_font_px: 18.0,
        },
    }
}

fn dx_005() -> DetectorSpec {
    DetectorSpec {
        id: "DX-005".to_string(),
        name: "Misdirection".to_string(),
        description: "The decline option is visually diminished next to a prominent accept option.".to_string(),
        category: Category::DarkUx,
        severity: Severity::Medium,
        confidence: ConfidenceRange::new(50, 88),
        recommendation: "Give accept and decline choices equal visual weight and size.".to_string(),
        kind: DetectorKind::AsymmetricChoice {
            accept_pattern: Regex::new(r"(?i)^\s*(accept|agree|allow|yes|continue|subscribe)\b")
                .unwrap(),
            decline_pattern: Regex::new(
                r"(?i)\b(decline|reject|deny|no thanks|not now|skip|manage (settings|preferences))\b",
            )
            .unwrap(),
        },
    }
}
