// Stateless price estimators. Identical inputs always give identical estimates.
pub mod collaboration;
pub mod packages;
pub mod performance;

pub use collaboration::{estimate_collaboration_pricing, CollaborationInquiry};
pub use packages::{calculate_package_pricing, package_options};
pub use performance::{estimate_performance_pricing, PerformanceInquiry};

use site_shared::models::{Confidence, FieldValue, FormData, PriceAdjustment, PriceRange};

pub const ESTIMATE_VALID_DAYS: u32 = 30;
pub const PREFER_TO_DISCUSS: &str = "prefer-to-discuss";

/// A supplied value that actually narrows the estimate.
pub(crate) fn is_informative(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") | Some("unsure") | Some("other") => false,
        Some(_) => true,
    }
}

pub(crate) fn confidence(informative: usize, considered: usize) -> Confidence {
    if considered == 0 {
        return Confidence::Low;
    }
    Confidence::from_fraction(informative as f64 / considered as f64)
}

/// Symmetric range around `total`, rounded to whole units and never negative.
pub(crate) fn range_around(total: f64, spread: f64) -> PriceRange {
    let total = total.max(0.0);
    PriceRange {
        min: (total * (1.0 - spread)).round(),
        max: (total * (1.0 + spread)).round(),
    }
}

/// Percentage adjustment on the base price; zero-amount adjustments are dropped.
pub(crate) fn push_adjustment(adjustments: &mut Vec<PriceAdjustment>, label: String, base: f64, percent: f64) {
    let amount = (base * percent).round();
    if amount != 0.0 {
        adjustments.push(PriceAdjustment { label, amount });
    }
}

/// Reads a text or choice value out of submitted form data.
pub(crate) fn form_str(data: &FormData, name: &str) -> Option<String> {
    data.get(name)
        .and_then(FieldValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsure_and_other_are_not_informative() {
        assert!(!is_informative(None));
        assert!(!is_informative(Some(" ")));
        assert!(!is_informative(Some("unsure")));
        assert!(!is_informative(Some("other")));
        assert!(is_informative(Some("wedding")));
    }

    #[test]
    fn range_is_symmetric_and_clamped() {
        let range = range_around(1000.0, 0.2);
        assert_eq!((range.min, range.max), (800.0, 1200.0));
        let range = range_around(-50.0, 0.2);
        assert_eq!((range.min, range.max), (0.0, 0.0));
    }
}
