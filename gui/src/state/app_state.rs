// Global application state for the GUI: the open inquiry and the browsing context the
// recommendation engine scores against. The router owns the current page.
use site_engine::recommendations::{Interaction, InteractionKind, StatedPreferences, UserContext};
use site_shared::models::Service;
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct AppState {
    /// Service whose inquiry form is open, if any.
    pub active_inquiry: Option<Service>,
    visited: Vec<Service>,
    interactions: Vec<Interaction>,
    time_on_service: HashMap<Service, u64>,
    entered: Option<(Service, Instant)>,
    pub preferences: StatedPreferences,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_inquiry: None,
            visited: Vec::new(),
            interactions: Vec::new(),
            time_on_service: HashMap::new(),
            entered: None,
            preferences: StatedPreferences::default(),
        }
    }
}

impl AppState {
    /// Called when a page mounts. `service` is the service the page sells, if any.
    pub fn enter_page(&mut self, service: Option<Service>) {
        self.enter_page_at(service, Instant::now())
    }

    fn enter_page_at(&mut self, service: Option<Service>, now: Instant) {
        self.leave_current(now);
        if let Some(service) = service {
            if !self.visited.contains(&service) {
                self.visited.push(service);
            }
            self.interactions.push(Interaction { service, kind: InteractionKind::View });
            self.entered = Some((service, now));
        }
    }

    fn leave_current(&mut self, now: Instant) {
        if let Some((service, since)) = self.entered.take() {
            let secs = now.saturating_duration_since(since).as_secs();
            *self.time_on_service.entry(service).or_default() += secs;
        }
    }

    pub fn record(&mut self, service: Service, kind: InteractionKind) {
        self.interactions.push(Interaction { service, kind });
    }

    pub fn open_inquiry(&mut self, service: Service) {
        self.record(service, InteractionKind::FormStart);
        self.active_inquiry = Some(service);
    }

    pub fn close_inquiry(&mut self) {
        self.active_inquiry = None;
    }

    pub fn set_primary_interest(&mut self, service: Option<Service>) {
        self.preferences.primary_interest = service;
    }

    pub fn set_goals(&mut self, raw: &str) {
        self.preferences.goals = raw
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// Browsing context as of now, including time on the page still being viewed.
    pub fn user_context(&self) -> UserContext {
        self.user_context_at(Instant::now())
    }

    fn user_context_at(&self, now: Instant) -> UserContext {
        let mut time_on_service_secs = self.time_on_service.clone();
        if let Some((service, since)) = self.entered {
            *time_on_service_secs.entry(service).or_default() +=
                now.saturating_duration_since(since).as_secs();
        }
        UserContext {
            visited_services: self.visited.clone(),
            interactions: self.interactions.clone(),
            time_on_service_secs,
            preferences: self.preferences.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_engine::recommendations::{recommend, RecommendationOptions};
    use site_shared::models::Recommendation;
    use std::time::Duration;

    #[test]
    fn time_accumulates_per_service() {
        let start = Instant::now();
        let mut state = AppState::default();
        state.enter_page_at(Some(Service::Performance), start);
        state.enter_page_at(None, start + Duration::from_secs(90));
        state.enter_page_at(Some(Service::Performance), start + Duration::from_secs(100));

        let context = state.user_context_at(start + Duration::from_secs(130));
        assert_eq!(context.time_on_service_secs.get(&Service::Performance), Some(&120));
        assert_eq!(context.visited_services, vec![Service::Performance]);
        assert_eq!(context.interactions.len(), 2);
    }

    #[test]
    fn opening_an_inquiry_counts_as_engagement() {
        let mut state = AppState::default();
        state.open_inquiry(Service::Collaboration);
        assert_eq!(state.active_inquiry, Some(Service::Collaboration));
        let context = state.user_context();
        assert_eq!(context.interactions[0].kind, InteractionKind::FormStart);
        state.close_inquiry();
        assert_eq!(state.active_inquiry, None);
    }

    #[test]
    fn stated_interest_lifts_that_recommendation() {
        let options = RecommendationOptions::default();
        let mut state = AppState::default();
        state.enter_page(Some(Service::Teaching));
        let baseline = recommend(Service::Teaching, &state.user_context(), &options);

        state.set_primary_interest(Some(Service::Collaboration));
        let boosted = recommend(Service::Teaching, &state.user_context(), &options);

        let confidence = |recs: &[Recommendation]| {
            recs.iter()
                .find(|r| r.service == Service::Collaboration)
                .map(|r| r.confidence)
                .unwrap()
        };
        assert!(confidence(&boosted) > confidence(&baseline));
    }

    #[test]
    fn goals_are_split_on_commas() {
        let mut state = AppState::default();
        state.set_goals(" record an EP, ,play live ");
        assert_eq!(state.preferences.goals, vec!["record an EP", "play live"]);
    }
}
