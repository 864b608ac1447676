//! Built-in extractor for rendered DOM snapshots.

use super::{ExtractionError, ImageBytes, RawInput, SignalExtractor};
use crate::signal::{
    ColorSample, ContentSignal, ImageElement, InteractiveElement, InteractiveKind, Rect, Rgb,
    TextBlock, Timing,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Font size assumed when a node carries no computed size.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// WCAG large text: 24px, or 18.66px (14pt) when bold.
const LARGE_TEXT_PX: f64 = 24.0;
const LARGE_BOLD_TEXT_PX: f64 = 18.66;
const BOLD_WEIGHT: u16 = 700;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// The subset of computed style the detectors care about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyle {
    pub font_size_px: Option<f64>,
    pub font_weight: Option<u16>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub display: Option<String>,
    pub visibility: Option<String>,
    pub opacity: Option<f64>,
}

impl ComputedStyle {
    pub fn is_rendered(&self) -> bool {
        let hidden_display = self.display.as_deref() == Some("none");
        let hidden_visibility = matches!(self.visibility.as_deref(), Some("hidden" | "collapse"));
        let transparent = self.opacity.is_some_and(|o| o <= 0.0);
        !(hidden_display || hidden_visibility || transparent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomNode {
    pub tag: String,
    #[serde(default)]
    pub text: String,
    pub rect: Rect,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub style: ComputedStyle,
}

impl DomNode {
    pub fn new(tag: &str, text: &str, rect: Rect) -> Self {
        Self {
            tag: tag.to_string(),
            text: text.to_string(),
            rect,
            attributes: BTreeMap::new(),
            style: ComputedStyle::default(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn font_size(&self) -> f64 {
        self.style.font_size_px.unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    fn is_visible(&self) -> bool {
        self.style.is_rendered() && self.rect.area() > 0.0
    }

    fn role(&self) -> Option<String> {
        self.attribute("role").map(str::to_ascii_lowercase)
    }

    fn is_image(&self) -> bool {
        self.tag.eq_ignore_ascii_case("img") || self.role().as_deref() == Some("img")
    }

    /// Text alternative: `alt`, then `aria-label`. Presentational images count as decorative.
    fn image_alt(&self) -> Option<String> {
        if matches!(self.role().as_deref(), Some("presentation" | "none"))
            || self.attribute("aria-hidden") == Some("true")
        {
            return Some(String::new());
        }
        self.attribute("alt")
            .or_else(|| self.attribute("aria-label"))
            .map(|alt| alt.trim().to_string())
    }

    fn interactive_kind(&self) -> Option<InteractiveKind> {
        match self.role().as_deref() {
            Some("button") => return Some(InteractiveKind::Button),
            Some("link") => return Some(InteractiveKind::Link),
            Some("checkbox" | "switch") => return Some(InteractiveKind::Checkbox),
            _ => {}
        }

        match self.tag.to_ascii_lowercase().as_str() {
            "button" => Some(InteractiveKind::Button),
            "a" => Some(InteractiveKind::Link),
            "select" | "textarea" => Some(InteractiveKind::Input),
            "input" => Some(
                match self.attribute("type").map(str::to_ascii_lowercase).as_deref() {
                    Some("checkbox" | "radio") => InteractiveKind::Checkbox,
                    Some("submit" | "button" | "reset") => InteractiveKind::Button,
                    _ => InteractiveKind::Input,
                },
            ),
            _ => None,
        }
    }

    /// Accessible name: `aria-label`, then text content, then `title`.
    fn label(&self) -> String {
        [self.attribute("aria-label"), Some(self.text.as_str()), self.attribute("title")]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    fn is_checked(&self) -> bool {
        let checked_attr = self.attribute("checked").is_some_and(|v| v != "false");
        let aria_checked = self.attribute("aria-checked") == Some("true");
        checked_attr || aria_checked
    }

    fn is_large_text(&self) -> bool {
        let size = self.font_size();
        let bold = self.style.font_weight.is_some_and(|w| w >= BOLD_WEIGHT);
        size >= LARGE_TEXT_PX || (bold && size >= LARGE_BOLD_TEXT_PX)
    }
}

/// DOM, computed styles and timing as captured by a browser automation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPageSnapshot {
    #[serde(default)]
    pub nodes: Vec<DomNode>,
    pub timing: Timing,
}

impl RenderedPageSnapshot {
    pub fn from_json(bytes: &[u8]) -> Result<Self, ExtractionError> {
        serde_json::from_slice(bytes)
            .map_err(|e| ExtractionError::DecodeFailure(format!("invalid snapshot JSON: {}", e)))
    }
}

/// Normalizes [`RenderedPageSnapshot`]s into [`ContentSignal`]s.
///
/// Screenshots are recognized but rejected: there is no text recognition
/// behind this extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotExtractor;

impl SnapshotExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_image(&self, image: &ImageBytes) -> Result<ContentSignal, ExtractionError> {
        let mime = image.mime.trim().to_ascii_lowercase();
        let magic = match mime.as_str() {
            "image/png" => PNG_MAGIC,
            "image/jpeg" | "image/jpg" => JPEG_MAGIC,
            _ => return Err(ExtractionError::UnsupportedFormat(image.mime.clone())),
        };

        if !image.bytes.starts_with(magic) {
            return Err(ExtractionError::DecodeFailure(format!(
                "content does not match declared type {}",
                mime
            )));
        }

        Err(ExtractionError::UnsupportedFormat(format!(
            "{} screenshots need text recognition",
            mime
        )))
    }

    fn extract_snapshot(
        &self,
        snapshot: &RenderedPageSnapshot,
    ) -> Result<ContentSignal, ExtractionError> {
        if !snapshot.timing.is_well_formed() {
            return Err(ExtractionError::DecodeFailure(
                "timing values must be finite and non-negative".to_string(),
            ));
        }

        let mut signal = ContentSignal::new(snapshot.timing);
        for (index, node) in snapshot.nodes.iter().enumerate() {
            let geometry_ok = node.rect.is_non_negative()
                && [node.rect.x, node.rect.y, node.rect.width, node.rect.height]
                    .iter()
                    .all(|v| v.is_finite());
            if !geometry_ok {
                return Err(ExtractionError::DecodeFailure(format!(
                    "node {} <{}> has invalid geometry",
                    index, node.tag
                )));
            }
            if node.style.font_size_px.is_some_and(|s| !s.is_finite() || s < 0.0) {
                return Err(ExtractionError::DecodeFailure(format!(
                    "node {} <{}> has invalid font size",
                    index, node.tag
                )));
            }

            let visible = node.is_visible();

            if node.is_image() {
                signal.images.push(ImageElement {
                    bounding_box: node.rect,
                    alt: node.image_alt(),
                    visible,
                });
                continue;
            }

            if let Some(kind) = node.interactive_kind() {
                signal.interactive_elements.push(InteractiveElement {
                    kind,
                    bounding_box: node.rect,
                    label: node.label(),
                    visible,
                    checked: node.is_checked(),
                });
            }

            let text = node.text.trim();
            if !visible || text.is_empty() {
                continue;
            }

            signal.text_blocks.push(TextBlock {
                text: text.to_string(),
                bounding_box: node.rect,
                font_size_px: node.font_size(),
            });

            let colors = node.style.color.as_deref().and_then(Rgb::parse).zip(
                node.style
                    .background_color
                    .as_deref()
                    .and_then(Rgb::parse),
            );
            if let Some((foreground, background)) = colors {
                signal.color_samples.push(ColorSample {
                    foreground,
                    background,
                    region_id: node
                        .attribute("id")
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("node-{}", index)),
                    large_text: node.is_large_text(),
                });
            }
        }

        signal.text_blocks.sort_by(|a, b| {
            a.bounding_box
                .y
                .total_cmp(&b.bounding_box.y)
                .then(a.bounding_box.x.total_cmp(&b.bounding_box.x))
        });

        debug!(
            text_blocks = signal.text_blocks.len(),
            interactive = signal.interactive_elements.len(),
            color_samples = signal.color_samples.len(),
            images = signal.images.len(),
            "Extracted content signal from snapshot"
        );

        Ok(signal)
    }
}

impl SignalExtractor for SnapshotExtractor {
    fn extract(&self, input: &RawInput) -> Result<ContentSignal, ExtractionError> {
        match input {
            RawInput::Image(image) => self.extract_image(image),
            RawInput::Snapshot(snapshot) => self.extract_snapshot(snapshot),
        }
    }
}
