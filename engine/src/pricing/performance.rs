// Live performance estimate: format x style base rate plus event adjustments.
use super::{confidence, form_str, is_informative, push_adjustment, range_around, ESTIMATE_VALID_DAYS, PREFER_TO_DISCUSS};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use site_shared::models::{Confidence, FormData, PriceEstimate};

const RANGE_SPREAD: f64 = 0.20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceInquiry {
    pub format: Option<String>,
    pub style: Option<String>,
    pub event_type: Option<String>,
    pub duration: Option<String>,
    pub guest_count: Option<String>,
    /// `YYYY-MM-DD`
    pub event_date: Option<String>,
    pub budget: Option<String>,
}

impl PerformanceInquiry {
    /// Picks the estimator inputs out of a performance inquiry form.
    pub fn from_form_data(data: &FormData) -> Self {
        Self {
            format: form_str(data, "format"),
            style: form_str(data, "style"),
            event_type: form_str(data, "event_type"),
            duration: form_str(data, "duration"),
            guest_count: form_str(data, "guest_count"),
            event_date: form_str(data, "event_date"),
            budget: form_str(data, "budget"),
        }
    }

    fn parsed_date(&self) -> Option<NaiveDate> {
        self.event_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
    }
}

fn base_rate(format: Option<&str>, style: Option<&str>) -> f64 {
    let rates: [f64; 3] = match format {
        Some("duo") => [500.0, 600.0, 650.0],
        Some("trio") => [700.0, 850.0, 900.0],
        Some("band") => [1000.0, 1200.0, 1300.0],
        _ => [300.0, 350.0, 400.0],
    };
    match style {
        Some("electric") => rates[1],
        Some("jazz") => rates[2],
        _ => rates[0],
    }
}

fn event_multiplier(event_type: &str) -> f64 {
    match event_type {
        "wedding" => 1.5,
        "corporate" => 1.3,
        "festival" => 1.2,
        "restaurant" => 0.8,
        _ => 1.0,
    }
}

fn duration_percent(duration: &str) -> f64 {
    match duration {
        "3-4 hours" => 0.25,
        "5-6 hours" => 0.50,
        "full-day" => 1.00,
        _ => 0.0,
    }
}

fn guest_percent(guest_count: &str) -> f64 {
    match guest_count {
        "50-100" => 0.10,
        "100-200" => 0.20,
        "200+" => 0.30,
        _ => 0.0,
    }
}

/// Peak summer and December book out first; January to March is quiet.
fn season(month: u32) -> (&'static str, f64) {
    match month {
        6..=9 | 12 => ("Peak season", 0.15),
        1..=3 => ("Off-peak season", -0.10),
        _ => ("Regular season", 0.0),
    }
}

pub fn estimate_performance_pricing(inquiry: &PerformanceInquiry) -> PriceEstimate {
    let format = inquiry.format.as_deref().map(str::trim);
    let style = inquiry.style.as_deref().map(str::trim);
    let base_price = base_rate(format, style);

    let mut adjustments = Vec::new();
    let mut factors = vec![format!(
        "{} {} base rate",
        format.filter(|f| is_informative(Some(*f))).unwrap_or("solo"),
        style.filter(|s| is_informative(Some(*s))).unwrap_or("acoustic"),
    )];

    if let Some(event_type) = inquiry.event_type.as_deref().map(str::trim) {
        let multiplier = event_multiplier(event_type);
        push_adjustment(&mut adjustments, format!("{} event", event_type), base_price, multiplier - 1.0);
        if multiplier != 1.0 {
            factors.push(format!("{} events are priced at {}x", event_type, multiplier));
        }
    }
    if let Some(duration) = inquiry.duration.as_deref().map(str::trim) {
        push_adjustment(&mut adjustments, format!("{} performance", duration), base_price, duration_percent(duration));
    }
    if let Some(guests) = inquiry.guest_count.as_deref().map(str::trim) {
        push_adjustment(&mut adjustments, format!("{} guests", guests), base_price, guest_percent(guests));
    }
    let date = inquiry.parsed_date();
    if let Some(date) = date {
        let (label, percent) = season(date.month());
        push_adjustment(&mut adjustments, label.to_string(), base_price, percent);
        factors.push(format!("{} ({})", label, date.format("%B")));
    }

    let total_adjustment: f64 = adjustments.iter().map(|a| a.amount).sum();
    let total = base_price + total_adjustment;

    let informative = [
        is_informative(format),
        is_informative(style),
        is_informative(inquiry.event_type.as_deref()),
        is_informative(inquiry.duration.as_deref()),
        is_informative(inquiry.guest_count.as_deref()),
        date.is_some(),
        is_informative(inquiry.budget.as_deref()),
    ];
    let supplied = informative.iter().filter(|&&b| b).count();
    let confidence = confidence(supplied, informative.len());
    if supplied < informative.len() {
        factors.push("Some details are still open, so the range is approximate".to_string());
    }

    let prefers_to_discuss = inquiry.budget.as_deref().map(str::trim) == Some(PREFER_TO_DISCUSS);
    PriceEstimate {
        range: range_around(total, RANGE_SPREAD),
        base_price,
        adjustments,
        total_adjustment,
        confidence,
        factors,
        consultation_recommended: confidence == Confidence::Low || prefers_to_discuss,
        estimate_valid_days: ESTIMATE_VALID_DAYS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_shared::models::FieldValue;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn electric_band_wedding_five_hours() {
        let inquiry = PerformanceInquiry {
            format: s("band"),
            style: s("electric"),
            event_type: s("wedding"),
            duration: s("5-6 hours"),
            ..Default::default()
        };
        let estimate = estimate_performance_pricing(&inquiry);
        assert_eq!(estimate.base_price, 1200.0);
        assert_eq!(estimate.total_adjustment, 1200.0); // 600 wedding + 600 duration
        assert_eq!(estimate.range.min, 1920.0);
        assert_eq!(estimate.range.max, 2880.0);
        assert_eq!(estimate.confidence, Confidence::Medium); // 4 of 7
        assert!(!estimate.consultation_recommended);
        assert_eq!(estimate.estimate_valid_days, 30);
    }

    #[test]
    fn empty_inquiry_is_low_confidence_and_recommends_consultation() {
        let estimate = estimate_performance_pricing(&PerformanceInquiry::default());
        assert_eq!(estimate.base_price, 300.0);
        assert!(estimate.adjustments.is_empty());
        assert_eq!(estimate.confidence, Confidence::Low);
        assert!(estimate.consultation_recommended);
        assert!(estimate.range.min > 0.0);
    }

    #[test]
    fn unsure_values_do_not_raise_confidence() {
        let inquiry = PerformanceInquiry {
            format: s("unsure"),
            style: s("unsure"),
            event_type: s("other"),
            duration: s("unsure"),
            guest_count: s("unsure"),
            event_date: s("not a date"),
            budget: s("unsure"),
        };
        assert_eq!(estimate_performance_pricing(&inquiry).confidence, Confidence::Low);
    }

    #[test]
    fn seasonal_adjustment_follows_event_month() {
        let mut inquiry = PerformanceInquiry { event_date: s("2030-07-12"), ..Default::default() };
        let summer = estimate_performance_pricing(&inquiry);
        assert_eq!(summer.total_adjustment, 45.0);

        inquiry.event_date = s("2030-02-01");
        let winter = estimate_performance_pricing(&inquiry);
        assert_eq!(winter.total_adjustment, -30.0);

        inquiry.event_date = s("2030-04-01");
        assert_eq!(estimate_performance_pricing(&inquiry).total_adjustment, 0.0);
    }

    #[test]
    fn fully_specified_inquiry_is_high_confidence() {
        let inquiry = PerformanceInquiry {
            format: s("duo"),
            style: s("jazz"),
            event_type: s("corporate"),
            duration: s("3-4 hours"),
            guest_count: s("100-200"),
            event_date: s("2030-10-10"),
            budget: s(PREFER_TO_DISCUSS),
        };
        let estimate = estimate_performance_pricing(&inquiry);
        assert_eq!(estimate.confidence, Confidence::High);
        // budget preference alone asks for a consultation
        assert!(estimate.consultation_recommended);
        // 650 base + 195 corporate + 162.5 -> 163 duration + 130 guests
        assert_eq!(estimate.base_price, 650.0);
        assert_eq!(estimate.total_adjustment, 195.0 + 163.0 + 130.0);
    }

    #[test]
    fn estimates_are_deterministic() {
        let inquiry = PerformanceInquiry { format: s("trio"), event_date: s("2031-12-24"), ..Default::default() };
        assert_eq!(estimate_performance_pricing(&inquiry), estimate_performance_pricing(&inquiry));
    }

    #[test]
    fn reads_inputs_from_form_data() {
        let mut data = FormData::new();
        data.insert("format".into(), FieldValue::Choice("band".into()));
        data.insert("event_date".into(), FieldValue::Text("2030-06-01".into()));
        data.insert("budget".into(), FieldValue::Choice("".into()));
        let inquiry = PerformanceInquiry::from_form_data(&data);
        assert_eq!(inquiry.format.as_deref(), Some("band"));
        assert_eq!(inquiry.event_date.as_deref(), Some("2030-06-01"));
        assert_eq!(inquiry.budget, None);
    }
}
