pub mod json;

use crate::report::AnalysisResult;

/// Serializes an [`AnalysisResult`] for the presentation layer.
pub trait Reporter {
    fn report(&self, result: &AnalysisResult) -> String;
}
