#![allow(non_snake_case)]
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use site_engine::recommendations::{recommend, InteractionKind};
use site_shared::models::{Priority, Service};

use crate::app::Route;
use crate::config::SiteConfig;
use crate::state::app_state::AppState;

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "card recommendation high",
        Priority::Medium => "card recommendation medium",
        Priority::Low => "card recommendation low",
    }
}

/// "You might also like" cards for the service page being viewed.
#[component]
pub fn RecommendationList(current: Service) -> Element {
    let config = use_context::<SiteConfig>();
    let mut app_state = use_context::<Signal<AppState>>();
    let navigator = use_navigator();
    let context = app_state.read().user_context();
    let recommendations = recommend(current, &context, &config.recommendations);

    if recommendations.is_empty() {
        return rsx! {};
    }

    rsx! {
        section { class: "recommendations",
            h3 { "You might also like" }
            for rec in recommendations {
                div { key: "{rec.reason}", class: priority_class(rec.priority),
                    h4 { {rec.service.label()} }
                    p { "{rec.reason}" }
                    small { {rec.context_tags.join(" · ")} }
                    button {
                        class: "secondary",
                        onclick: move |_| {
                            app_state.write().record(current, InteractionKind::Click);
                            navigator.push(Route::from(rec.service));
                        },
                        {format!("Explore {}", rec.service.label())}
                    }
                }
            }
        }
    }
}
