// Page bodies for each allow-listed route.
#![allow(non_snake_case)]
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use site_shared::models::Service;
use std::str::FromStr;

use super::price_estimate::PackageTable;
use super::recommendations::RecommendationList;
use crate::app::Route;
use crate::config::SiteConfig;
use crate::state::app_state::AppState;

/// Services a visitor on `current`'s page can name as their main interest.
fn interest_choices(current: Service) -> Vec<Service> {
    Service::ALL.into_iter().filter(|s| *s != current).collect()
}

fn blurb(service: Service) -> &'static str {
    match service {
        Service::Teaching => "Private lessons for all ages and levels, in person or online.",
        Service::Performance => "Solo, duo, trio or full band for weddings, corporate events and festivals.",
        Service::Collaboration => "Arrangement, session work and production from single to album.",
    }
}

#[component]
pub fn Home() -> Element {
    let config = use_context::<SiteConfig>();
    let navigator = use_navigator();

    rsx! {
        section {
            h1 { "{config.site.name}" }
            p { "{config.site.tagline}" }
        }
        for service in Service::ALL {
            div { key: "{service.path()}", class: "card",
                h2 { {service.label()} }
                p { {blurb(service)} }
                button {
                    onclick: move |_| {
                        navigator.push(Route::from(service));
                    },
                    "Learn more"
                }
            }
        }
    }
}

#[component]
pub fn ServicePage(service: Service) -> Element {
    let mut app_state = use_context::<Signal<AppState>>();
    let mut goals = use_signal(String::new);
    let interest = app_state.read().preferences.primary_interest;

    rsx! {
        section {
            h1 { {service.label()} }
            p { {blurb(service)} }
            if service == Service::Teaching {
                PackageTable { lesson_minutes: 60 }
            }
            button {
                onclick: move |_| app_state.write().open_inquiry(service),
                "Start an inquiry"
            }
        }
        section { class: "card",
            label { r#for: "goals", "What are you hoping to do? (comma separated)" }
            input {
                id: "goals",
                value: "{goals}",
                oninput: move |evt: FormEvent| {
                    goals.set(evt.value());
                    app_state.write().set_goals(&evt.value());
                },
            }
            label { r#for: "interest", "Anything else you're most interested in?" }
            select {
                id: "interest",
                onchange: move |evt: FormEvent| {
                    let chosen = Service::from_str(&evt.value()).ok();
                    app_state.write().set_primary_interest(chosen);
                },
                option { value: "", selected: interest.is_none(), "No preference" }
                for choice in interest_choices(service) {
                    option {
                        key: "{choice.path()}",
                        value: choice.as_str(),
                        selected: interest == Some(choice),
                        {choice.label()}
                    }
                }
            }
        }
        RecommendationList { current: service }
    }
}

#[component]
pub fn About() -> Element {
    let config = use_context::<SiteConfig>();
    rsx! {
        section {
            h1 { "About" }
            p { "{config.site.name} teaches, performs and records across styles from jazz to pop." }
        }
    }
}

#[component]
pub fn Contact() -> Element {
    let mut app_state = use_context::<Signal<AppState>>();
    rsx! {
        section {
            h1 { "Contact" }
            p { "Pick the kind of work you have in mind and I'll get back to you within two days." }
            for service in Service::ALL {
                button {
                    key: "{service.path()}",
                    class: "secondary",
                    onclick: move |_| app_state.write().open_inquiry(service),
                    {service.label()}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interest_choices_leave_out_the_current_page() {
        for current in Service::ALL {
            let choices = interest_choices(current);
            assert_eq!(choices.len(), Service::ALL.len() - 1);
            assert!(!choices.contains(&current));
        }
    }
}
