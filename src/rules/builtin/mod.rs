mod accessibility;
mod darkux;
mod usability;

use crate::rules::catalog::DetectorSpec;
use std::sync::LazyLock;

static ALL_DETECTORS: LazyLock<Vec<DetectorSpec>> = LazyLock::new(|| {
    let mut detectors = Vec::with_capacity(12);
    detectors.extend(darkux::detectors());
    detectors.extend(usability::detectors());
    detectors.extend(accessibility::detectors());
    detectors
});

/// Built-in detectors in declaration order.
pub fn all_detectors() -> Vec<DetectorSpec> {
    ALL_DETECTORS.clone()
}
