// Collaboration estimate: project-type base plus timeline, experience and complexity.
use super::{confidence, form_str, is_informative, push_adjustment, range_around, ESTIMATE_VALID_DAYS, PREFER_TO_DISCUSS};
use serde::{Deserialize, Serialize};
use site_shared::models::{Confidence, FormData, PriceEstimate};

const RANGE_SPREAD: f64 = 0.25;
pub const HIGHEST_COMPLEXITY: &str = "highly-complex";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollaborationInquiry {
    pub project_type: Option<String>,
    pub timeline: Option<String>,
    pub experience: Option<String>,
    pub complexity: Option<String>,
    pub budget: Option<String>,
}

impl CollaborationInquiry {
    pub fn from_form_data(data: &FormData) -> Self {
        Self {
            project_type: form_str(data, "project_type"),
            timeline: form_str(data, "timeline"),
            experience: form_str(data, "experience"),
            complexity: form_str(data, "complexity"),
            budget: form_str(data, "budget"),
        }
    }
}

fn base_rate(project_type: Option<&str>) -> f64 {
    match project_type {
        Some("single") => 500.0,
        Some("ep") => 1500.0,
        Some("album") => 4000.0,
        Some("film-score") => 3000.0,
        Some("arrangement") => 300.0,
        Some("session-work") => 250.0,
        _ => 800.0,
    }
}

fn timeline_percent(timeline: &str) -> f64 {
    match timeline {
        "rush" => 0.50,
        "flexible" => -0.10,
        _ => 0.0,
    }
}

fn experience_percent(experience: &str) -> f64 {
    match experience {
        "first-project" => 0.20,
        "some-experience" => 0.10,
        _ => 0.0,
    }
}

fn complexity_percent(complexity: &str) -> f64 {
    match complexity {
        "simple" => -0.20,
        "complex" => 0.30,
        HIGHEST_COMPLEXITY => 0.60,
        _ => 0.0,
    }
}

pub fn estimate_collaboration_pricing(inquiry: &CollaborationInquiry) -> PriceEstimate {
    let project_type = inquiry.project_type.as_deref().map(str::trim);
    let timeline = inquiry.timeline.as_deref().map(str::trim);
    let experience = inquiry.experience.as_deref().map(str::trim);
    let complexity = inquiry.complexity.as_deref().map(str::trim);
    let budget = inquiry.budget.as_deref().map(str::trim);

    let base_price = base_rate(project_type);
    let mut adjustments = Vec::new();
    let mut factors = vec![format!(
        "{} base rate",
        project_type.filter(|p| is_informative(Some(*p))).unwrap_or("general project")
    )];

    if let Some(timeline) = timeline {
        push_adjustment(&mut adjustments, format!("{} timeline", timeline), base_price, timeline_percent(timeline));
        if timeline == "rush" {
            factors.push("Rush timelines need rescheduled studio time".to_string());
        }
    }
    if let Some(experience) = experience {
        push_adjustment(&mut adjustments, format!("{} guidance", experience), base_price, experience_percent(experience));
    }
    if let Some(complexity) = complexity {
        push_adjustment(&mut adjustments, format!("{} scope", complexity), base_price, complexity_percent(complexity));
    }

    let total_adjustment: f64 = adjustments.iter().map(|a| a.amount).sum();
    let total = base_price + total_adjustment;

    let informative = [
        is_informative(project_type),
        is_informative(timeline),
        is_informative(experience),
        is_informative(complexity),
        is_informative(budget),
    ];
    let supplied = informative.iter().filter(|&&b| b).count();
    let confidence = confidence(supplied, informative.len());

    let highest_complexity = complexity == Some(HIGHEST_COMPLEXITY);
    if highest_complexity {
        factors.push("Highly complex projects are scoped on a call".to_string());
    }
    PriceEstimate {
        range: range_around(total, RANGE_SPREAD),
        base_price,
        adjustments,
        total_adjustment,
        confidence,
        factors,
        consultation_recommended: confidence == Confidence::Low
            || highest_complexity
            || budget == Some(PREFER_TO_DISCUSS),
        estimate_valid_days: ESTIMATE_VALID_DAYS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn ep_with_rush_and_complexity() {
        let inquiry = CollaborationInquiry {
            project_type: s("ep"),
            timeline: s("rush"),
            experience: s("professional"),
            complexity: s("complex"),
            budget: s("1000-5000"),
        };
        let estimate = estimate_collaboration_pricing(&inquiry);
        assert_eq!(estimate.base_price, 1500.0);
        assert_eq!(estimate.total_adjustment, 750.0 + 450.0);
        assert_eq!(estimate.range.min, 2025.0); // 2700 * 0.75
        assert_eq!(estimate.range.max, 3375.0);
        assert_eq!(estimate.confidence, Confidence::High);
        assert!(!estimate.consultation_recommended);
    }

    #[test]
    fn highest_complexity_always_recommends_consultation() {
        let inquiry = CollaborationInquiry {
            project_type: s("album"),
            timeline: s("standard"),
            experience: s("professional"),
            complexity: s(HIGHEST_COMPLEXITY),
            budget: s("5000+"),
        };
        let estimate = estimate_collaboration_pricing(&inquiry);
        assert_eq!(estimate.confidence, Confidence::High);
        assert!(estimate.consultation_recommended);
    }

    #[test]
    fn discounts_never_push_the_range_negative() {
        let inquiry = CollaborationInquiry {
            project_type: s("session-work"),
            timeline: s("flexible"),
            complexity: s("simple"),
            ..Default::default()
        };
        let estimate = estimate_collaboration_pricing(&inquiry);
        assert_eq!(estimate.total_adjustment, -25.0 - 50.0);
        assert!(estimate.range.min > 0.0);
        assert!(estimate.range.min <= estimate.range.max);
    }

    #[test]
    fn sparse_inquiry_is_low_confidence() {
        let inquiry = CollaborationInquiry { project_type: s("other"), budget: s("unsure"), ..Default::default() };
        let estimate = estimate_collaboration_pricing(&inquiry);
        assert_eq!(estimate.confidence, Confidence::Low);
        assert!(estimate.consultation_recommended);
        assert_eq!(estimate.base_price, 800.0);
    }
}
