//! Normalized page content consumed by the detection engine.
//!
//! A [`ContentSignal`] is produced once per analysis request by a
//! [`SignalExtractor`](crate::extract::SignalExtractor) and is assumed to be
//! well-formed by every downstream stage: timings are non-negative and boxes
//! lie within the page.

pub mod color;

pub use color::{Rgb, contrast_ratio};

use serde::{Deserialize, Serialize};

/// Axis-aligned box in CSS pixels, origin at the page's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Length of the shorter side.
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn is_non_negative(&self) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.width >= 0.0 && self.height >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub text: String,
    pub bounding_box: Rect,
    pub font_size_px: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractiveKind {
    Button,
    Link,
    Checkbox,
    Input,
}

impl InteractiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractiveKind::Button => "button",
            InteractiveKind::Link => "link",
            InteractiveKind::Checkbox => "checkbox",
            InteractiveKind::Input => "input",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "button" => Some(InteractiveKind::Button),
            "link" => Some(InteractiveKind::Link),
            "checkbox" => Some(InteractiveKind::Checkbox),
            "input" => Some(InteractiveKind::Input),
            _ => None,
        }
    }
}

impl std::fmt::Display for InteractiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveElement {
    pub kind: InteractiveKind,
    pub bounding_box: Rect,
    /// Accessible label; empty when the element has none.
    #[serde(default)]
    pub label: String,
    pub visible: bool,
    /// Pre-selected state for checkboxes.
    #[serde(default)]
    pub checked: bool,
}

impl InteractiveElement {
    pub fn has_label(&self) -> bool {
        !self.label.trim().is_empty()
    }
}

/// A rendered image and its text alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    pub bounding_box: Rect,
    /// `None` when no alternative is given; an empty string marks the image decorative.
    #[serde(default)]
    pub alt: Option<String>,
    pub visible: bool,
}

impl ImageElement {
    pub fn is_missing_alt(&self) -> bool {
        self.alt.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSample {
    pub foreground: Rgb,
    pub background: Rgb,
    pub region_id: String,
    /// WCAG "large text" (18pt, or 14pt bold) uses a relaxed threshold.
    #[serde(default)]
    pub large_text: bool,
}

impl ColorSample {
    pub fn contrast_ratio(&self) -> f64 {
        contrast_ratio(self.foreground, self.background)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub load_time_ms: f64,
    pub lcp_ms: f64,
    pub fid_ms: f64,
    pub cls_score: f64,
}

impl Timing {
    pub fn is_well_formed(&self) -> bool {
        [self.load_time_ms, self.lcp_ms, self.fid_ms, self.cls_score]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Everything the rule engine and scorer know about one page or screenshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSignal {
    /// In reading order: top-to-bottom, then left-to-right.
    #[serde(default)]
    pub text_blocks: Vec<TextBlock>,
    #[serde(default)]
    pub interactive_elements: Vec<InteractiveElement>,
    #[serde(default)]
    pub color_samples: Vec<ColorSample>,
    #[serde(default)]
    pub images: Vec<ImageElement>,
    pub timing: Timing,
}

impl ContentSignal {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    pub fn with_text_block(mut self, block: TextBlock) -> Self {
        self.text_blocks.push(block);
        self
    }

    pub fn with_interactive_element(mut self, element: InteractiveElement) -> Self {
        self.interactive_elements.push(element);
        self
    }

    pub fn with_color_sample(mut self, sample: ColorSample) -> Self {
        self.color_samples.push(sample);
        self
    }

    pub fn with_image(mut self, image: ImageElement) -> Self {
        self.images.push(image);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_area_and_min_side() {
        let rect = Rect::new(10.0, 20.0, 30.0, 8.0);
        assert_eq!(rect.area(), 240.0);
        assert_eq!(rect.min_side(), 8.0);
        assert!(rect.is_non_negative());
        assert!(!Rect::new(-1.0, 0.0, 1.0, 1.0).is_non_negative());
    }

    #[test]
    fn test_interactive_kind_parse() {
        assert_eq!(InteractiveKind::parse("Button"), Some(InteractiveKind::Button));
        assert_eq!(InteractiveKind::parse("checkbox"), Some(InteractiveKind::Checkbox));
        assert_eq!(InteractiveKind::parse("slider"), None);
        assert_eq!(InteractiveKind::Link.to_string(), "link");
    }

    #[test]
    fn test_has_label_ignores_whitespace() {
        let mut element = InteractiveElement {
            kind: InteractiveKind::Button,
            bounding_box: Rect::new(0.0, 0.0, 50.0, 50.0),
            label: "   ".to_string(),
            visible: true,
            checked: false,
        };
        assert!(!element.has_label());
        element.label = "Submit".to_string();
        assert!(element.has_label());
    }

    #[test]
    fn test_timing_well_formed() {
        let timing = Timing {
            load_time_ms: 1000.0,
            lcp_ms: 900.0,
            fid_ms: 10.0,
            cls_score: 0.0,
        };
        assert!(timing.is_well_formed());
        assert!(
            !Timing {
                cls_score: -0.1,
                ..timing
            }
            .is_well_formed()
        );
        assert!(
            !Timing {
                lcp_ms: f64::NAN,
                ..timing
            }
            .is_well_formed()
        );
    }

    #[test]
    fn test_signal_deserializes_camel_case() {
        let json = r#"{
            "textBlocks": [{"text": "Hi", "boundingBox": {"x": 0, "y": 0, "width": 10, "height": 10}, "fontSizePx": 14}],
            "interactiveElements": [{"kind": "checkbox", "boundingBox": {"x": 0, "y": 0, "width": 10, "height": 10}, "visible": true}],
            "timing": {"loadTimeMs": 1, "lcpMs": 2, "fidMs": 3, "clsScore": 0.5}
        }"#;
        let signal: ContentSignal = serde_json::from_str(json).unwrap();
        assert_eq!(signal.text_blocks[0].font_size_px, 14.0);
        assert_eq!(signal.interactive_elements[0].label, "");
        assert!(!signal.interactive_elements[0].checked);
        assert!(signal.color_samples.is_empty());
        assert!(signal.images.is_empty());
        assert_eq!(signal.timing.cls_score, 0.5);
    }

    #[test]
    fn test_image_alt_presence() {
        let json = r#"[
            {"boundingBox": {"x": 0, "y": 0, "width": 10, "height": 10}, "visible": true},
            {"boundingBox": {"x": 0, "y": 0, "width": 10, "height": 10}, "alt": "", "visible": true},
            {"boundingBox": {"x": 0, "y": 0, "width": 10, "height": 10}, "alt": "Team photo", "visible": true}
        ]"#;
        let images: Vec<ImageElement> = serde_json::from_str(json).unwrap();
        let missing: Vec<_> = images.iter().map(ImageElement::is_missing_alt).collect();
        assert_eq!(missing, vec![true, false, false]);
    }
}
