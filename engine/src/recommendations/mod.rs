// Cross-service recommendations scored from browsing context and stated goals.
pub mod relationships;

pub use relationships::{relationships_from, ServiceRelationship, RELATIONSHIPS};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use site_shared::models::{Priority, Recommendation, Service};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

const INTERACTION_WEIGHT: f64 = 0.05;
const INTERACTION_CAP: f64 = 0.2;
const TIME_WEIGHT_PER_MINUTE: f64 = 0.02;
const TIME_CAP: f64 = 0.1;
const PRIMARY_INTEREST_BOOST: f64 = 0.15;
const TAG_MATCH_BOOST: f64 = 0.05;
/// Minimum skim score per tag character to count as a fuzzy hit.
const FUZZY_SCORE_PER_CHAR: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    View,
    Click,
    FormStart,
    FormSubmit,
    Download,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub service: Service,
    pub kind: InteractionKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatedPreferences {
    pub primary_interest: Option<Service>,
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    /// Kept for callers' bookkeeping; scoring uses `interactions` and time instead.
    pub visited_services: Vec<Service>,
    pub interactions: Vec<Interaction>,
    pub time_on_service_secs: HashMap<Service, u64>,
    pub preferences: StatedPreferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOptions {
    pub min_confidence: f64,
    pub max_results: usize,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            max_results: 2,
        }
    }
}

fn priority_for(confidence: f64, strength: f64) -> Priority {
    let weight = confidence * strength;
    if weight >= 0.5 {
        Priority::High
    } else if weight >= 0.3 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn engagement_boost(current: Service, context: &UserContext) -> f64 {
    let engaged = context
        .interactions
        .iter()
        .filter(|i| i.service == current && i.kind != InteractionKind::View)
        .count();
    let interactions = (engaged as f64 * INTERACTION_WEIGHT).min(INTERACTION_CAP);

    let seconds = context.time_on_service_secs.get(&current).copied().unwrap_or(0);
    let time = (seconds as f64 / 60.0 * TIME_WEIGHT_PER_MINUTE).min(TIME_CAP);
    interactions + time
}

fn tag_matches(matcher: &SkimMatcherV2, goal: &str, tag: &str) -> bool {
    if goal.contains(tag) {
        return true;
    }
    let threshold = FUZZY_SCORE_PER_CHAR * tag.chars().count() as i64;
    matcher
        .fuzzy_match(goal, tag)
        .map_or(false, |score| score >= threshold)
}

fn matched_tags(matcher: &SkimMatcherV2, goals: &[String], tags: &[&str]) -> usize {
    let goals: Vec<String> = goals.iter().map(|g| g.trim().to_lowercase()).filter(|g| !g.is_empty()).collect();
    tags.iter()
        .filter(|tag| goals.iter().any(|goal| tag_matches(matcher, goal, tag)))
        .count()
}

/// Related services for someone currently looking at `current`, best first.
pub fn recommend(current: Service, context: &UserContext, options: &RecommendationOptions) -> Vec<Recommendation> {
    let matcher = SkimMatcherV2::default();
    let engagement = engagement_boost(current, context);

    let mut scored: Vec<Recommendation> = relationships_from(current)
        .filter_map(|relationship| {
            let mut confidence = relationship.strength + engagement;
            if context.preferences.primary_interest == Some(relationship.to) {
                confidence += PRIMARY_INTEREST_BOOST;
            }
            let hits = matched_tags(&matcher, &context.preferences.goals, relationship.context_tags);
            confidence += hits as f64 * TAG_MATCH_BOOST;
            let confidence = confidence.clamp(0.0, 1.0);

            if confidence < options.min_confidence {
                debug!(from = ?current, to = ?relationship.to, confidence, "recommendation below threshold");
                return None;
            }
            Some(Recommendation {
                service: relationship.to,
                confidence,
                priority: priority_for(confidence, relationship.strength),
                reason: relationship.reason.to_string(),
                context_tags: relationship.context_tags.iter().map(|t| t.to_string()).collect(),
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal))
    });
    scored.truncate(options.max_results);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services(recs: &[Recommendation]) -> Vec<Service> {
        recs.iter().map(|r| r.service).collect()
    }

    #[test]
    fn cold_start_uses_relationship_strength() {
        let recs = recommend(Service::Teaching, &UserContext::default(), &RecommendationOptions::default());
        assert_eq!(services(&recs), vec![Service::Performance, Service::Collaboration]);
        assert!((recs[0].confidence - 0.7).abs() < 1e-9);
        assert_eq!(recs[0].priority, Priority::Medium);
        assert_eq!(recs[1].priority, Priority::Low);
        assert!(recs.iter().all(|r| r.service != Service::Teaching));
    }

    #[test]
    fn stated_goals_and_interest_can_reorder() {
        let context = UserContext {
            preferences: StatedPreferences {
                primary_interest: Some(Service::Collaboration),
                goals: vec!["Recording my first EP".into(), "songwriting help".into()],
            },
            ..Default::default()
        };
        let recs = recommend(Service::Teaching, &context, &RecommendationOptions::default());
        assert_eq!(recs[0].service, Service::Collaboration);
        assert!((recs[0].confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn views_do_not_count_as_engagement() {
        let context = UserContext {
            interactions: vec![Interaction { service: Service::Performance, kind: InteractionKind::View }; 10],
            ..Default::default()
        };
        let recs = recommend(Service::Performance, &context, &RecommendationOptions::default());
        assert!((recs[0].confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_clamped_to_one() {
        let mut time = HashMap::new();
        time.insert(Service::Teaching, 3600);
        let context = UserContext {
            visited_services: vec![Service::Teaching],
            interactions: vec![Interaction { service: Service::Teaching, kind: InteractionKind::Click }; 20],
            time_on_service_secs: time,
            preferences: StatedPreferences {
                primary_interest: Some(Service::Performance),
                goals: vec!["performance on stage, more gigs, a recital".into()],
            },
        };
        let recs = recommend(Service::Teaching, &context, &RecommendationOptions::default());
        assert_eq!(recs[0].service, Service::Performance);
        assert_eq!(recs[0].confidence, 1.0);
        assert_eq!(recs[0].priority, Priority::High);
        assert!(recs.iter().all(|r| (0.0..=1.0).contains(&r.confidence)));
    }

    #[test]
    fn threshold_and_limit_apply() {
        let strict = RecommendationOptions { min_confidence: 0.55, max_results: 2 };
        let recs = recommend(Service::Collaboration, &UserContext::default(), &strict);
        assert_eq!(services(&recs), vec![Service::Performance]);

        let one = RecommendationOptions { min_confidence: 0.0, max_results: 1 };
        assert_eq!(recommend(Service::Teaching, &UserContext::default(), &one).len(), 1);
    }

    #[test]
    fn ordering_is_priority_then_confidence() {
        let options = RecommendationOptions { min_confidence: 0.0, max_results: 10 };
        for service in Service::ALL {
            let recs = recommend(service, &UserContext::default(), &options);
            for pair in recs.windows(2) {
                assert!(
                    pair[0].priority > pair[1].priority
                        || (pair[0].priority == pair[1].priority && pair[0].confidence >= pair[1].confidence)
                );
            }
        }
    }
}
