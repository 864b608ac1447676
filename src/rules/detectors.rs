//! Per-kind match evaluation.
//!
//! Each detector kind yields one strength in `[0, 1]` per match. Strengths
//! only grow as the triggering signal gets stronger, for example a smaller
//! target or worse contrast, which keeps confidence monotonic.

use crate::rules::catalog::DetectorKind;
use crate::signal::{ContentSignal, InteractiveElement, InteractiveKind};

/// Elements smaller than this on their short side count as effectively hidden.
const HIDDEN_SIDE_PX: f64 = 16.0;

/// WCAG AA threshold for large text.
const LARGE_TEXT_MIN_RATIO: f64 = 3.0;

impl DetectorKind {
    /// Strength of every match of this detector in `signal`.
    pub fn match_strengths(&self, signal: &ContentSignal) -> Vec<f64> {
        match self {
            DetectorKind::HiddenInteractive {
                label_pattern,
                min_area_px,
            } => signal
                .interactive_elements
                .iter()
                .filter(|e| label_pattern.is_match(&e.label))
                .filter_map(|e| concealment(e, *min_area_px))
                .collect(),

            DetectorKind::TextPattern {
                patterns,
                emphasis_font_px,
            } => signal
                .text_blocks
                .iter()
                .filter(|b| patterns.iter().any(|p| p.is_match(&b.text)))
                .map(|b| ratio(b.font_size_px, *emphasis_font_px))
                .collect(),

            DetectorKind::PreselectedConsent { label_pattern } => signal
                .interactive_elements
                .iter()
                .filter(|e| e.kind == InteractiveKind::Checkbox && e.checked)
                .filter(|e| label_pattern.is_match(&e.label))
                .map(|e| {
                    if !e.visible || e.bounding_box.min_side() < HIDDEN_SIDE_PX {
                        1.0
                    } else {
                        0.6
                    }
                })
                .collect(),

            DetectorKind::AsymmetricChoice {
                accept_pattern,
                decline_pattern,
            } => {
                let accept_area = signal
                    .interactive_elements
                    .iter()
                    .filter(|e| e.visible && accept_pattern.is_match(&e.label))
                    .map(|e| e.bounding_box.area())
                    .fold(0.0_f64, f64::max);
                if accept_area <= 0.0 {
                    return Vec::new();
                }
                signal
                    .interactive_elements
                    .iter()
                    .filter(|e| decline_pattern.is_match(&e.label))
                    .filter(|e| !accept_pattern.is_match(&e.label))
                    .filter_map(|e| {
                        if !e.visible {
                            return Some(1.0);
                        }
                        let area = e.bounding_box.area();
                        (area < accept_area).then(|| 1.0 - area / accept_area)
                    })
                    .collect()
            }

            DetectorKind::SmallTapTarget { min_size_px } => signal
                .interactive_elements
                .iter()
                .filter(|e| e.visible)
                .filter_map(|e| shortfall(e.bounding_box.min_side(), *min_size_px))
                .collect(),

            DetectorKind::SmallText { min_font_px } => signal
                .text_blocks
                .iter()
                .filter_map(|b| shortfall(b.font_size_px, *min_font_px))
                .collect(),

            DetectorKind::LowContrast { min_ratio } => signal
                .color_samples
                .iter()
                .filter_map(|s| {
                    let threshold = if s.large_text {
                        min_ratio.min(LARGE_TEXT_MIN_RATIO)
                    } else {
                        *min_ratio
                    };
                    let contrast = s.contrast_ratio();
                    (contrast < threshold)
                        .then(|| ((threshold - contrast) / (threshold - 1.0)).clamp(0.0, 1.0))
                })
                .collect(),

            DetectorKind::MissingLabel { kinds } => signal
                .interactive_elements
                .iter()
                .filter(|e| kinds.contains(&e.kind) && !e.has_label())
                .map(|_| 1.0)
                .collect(),

            DetectorKind::MissingAltText { min_area_px } => signal
                .images
                .iter()
                .filter(|i| i.visible && i.is_missing_alt())
                .filter(|i| i.bounding_box.area() >= *min_area_px)
                .map(|_| 1.0)
                .collect(),
        }
    }
}

/// How well an element with a matching label is concealed, if at all.
fn concealment(element: &InteractiveElement, min_area_px: f64) -> Option<f64> {
    if !element.visible {
        return Some(1.0);
    }
    let area = element.bounding_box.area();
    (area < min_area_px).then(|| 1.0 - area / min_area_px)
}

/// Relative shortfall of `value` below `minimum`, or `None` when it meets it.
fn shortfall(value: f64, minimum: f64) -> Option<f64> {
    (value < minimum).then(|| (1.0 - value.max(0.0) / minimum).clamp(0.0, 1.0))
}

fn ratio(value: f64, full: f64) -> f64 {
    (value / full).clamp(0.0, 1.0)
}
