#[cfg(test)]
pub mod fixtures {
    use crate::report::{AnalysisResult, ReportAssembler};
    use crate::rules::{Catalog, Category, PatternFinding, Severity};
    use crate::scoring::Scorer;
    use crate::signal::{ColorSample, InteractiveElement, InteractiveKind, Rect, Rgb, TextBlock, Timing};
    use std::sync::Arc;

    pub fn builtin_catalog() -> Arc<Catalog> {
        Arc::new(Catalog::builtin().unwrap())
    }

    /// Timing comfortably inside every "good" band.
    pub fn good_timing() -> Timing {
        Timing {
            load_time_ms: 1000.0,
            lcp_ms: 1000.0,
            fid_ms: 50.0,
            cls_score: 0.02,
        }
    }

    /// Timing in the "poor" band for every vital.
    pub fn poor_timing() -> Timing {
        Timing {
            load_time_ms: 9000.0,
            lcp_ms: 6000.0,
            fid_ms: 450.0,
            cls_score: 0.4,
        }
    }

    pub fn hidden_cancel_link() -> InteractiveElement {
        InteractiveElement {
            kind: InteractiveKind::Link,
            bounding_box: Rect::new(600.0, 1800.0, 80.0, 20.0),
            label: "Cancel subscription".to_string(),
            visible: false,
            checked: false,
        }
    }

    pub fn visible_button(label: &str, side: f64) -> InteractiveElement {
        InteractiveElement {
            kind: InteractiveKind::Button,
            bounding_box: Rect::new(10.0, 10.0, side, side),
            label: label.to_string(),
            visible: true,
            checked: false,
        }
    }

    pub fn text_block(text: &str, font_size_px: f64) -> TextBlock {
        TextBlock {
            text: text.to_string(),
            bounding_box: Rect::new(0.0, 0.0, 300.0, font_size_px * 1.5),
            font_size_px,
        }
    }

    pub fn color_sample(foreground: Rgb, background: Rgb) -> ColorSample {
        ColorSample {
            foreground,
            background,
            region_id: "body".to_string(),
            large_text: false,
        }
    }

    pub fn create_finding(
        pattern_id: &str,
        category: Category,
        severity: Severity,
        confidence: u8,
    ) -> PatternFinding {
        PatternFinding {
            pattern_id: pattern_id.to_string(),
            name: format!("{} name", pattern_id),
            description: format!("{} description", pattern_id),
            category,
            severity,
            confidence,
        }
    }

    /// Assemble a result over [`good_timing`] without recommendations.
    pub fn create_test_result(findings: Vec<PatternFinding>) -> AnalysisResult {
        let timing = good_timing();
        let scores = Scorer::default().score(&findings, &timing);
        ReportAssembler::assemble(findings, &scores, &timing, vec![])
    }
}
