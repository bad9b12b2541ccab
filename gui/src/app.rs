#![allow(non_snake_case)]
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use site_engine::routing::{self, resolve};
use site_shared::models::Service;
use std::rc::Rc;

use crate::components::inquiry_form::InquiryModal;
use crate::components::nav::Nav;
use crate::components::pages::{About, Contact, Home, ServicePage};
use crate::components::theme_provider::ThemeProvider;
use crate::config::theme::stylesheet;
use crate::config::SiteConfig;
use crate::services::submission_client::SubmissionClient;
use crate::services::webview::WebviewDocument;
use crate::state::app_state::AppState;

/// Path the window opens on, from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct StartupPath(pub Option<String>);

#[derive(Routable, Clone, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(SiteLayout)]
        #[route("/")]
        HomePage {},
        #[route("/teaching")]
        TeachingPage {},
        #[route("/performance")]
        PerformancePage {},
        #[route("/collaboration")]
        CollaborationPage {},
        #[route("/about")]
        AboutPage {},
        #[route("/contact")]
        ContactPage {},
    #[end_layout]
    #[route("/:..segments")]
    UnknownPage { segments: Vec<String> },
}

impl From<routing::Route> for Route {
    fn from(page: routing::Route) -> Self {
        match page {
            routing::Route::Home => Route::HomePage {},
            routing::Route::Teaching => Route::TeachingPage {},
            routing::Route::Performance => Route::PerformancePage {},
            routing::Route::Collaboration => Route::CollaborationPage {},
            routing::Route::About => Route::AboutPage {},
            routing::Route::Contact => Route::ContactPage {},
        }
    }
}

impl From<Service> for Route {
    fn from(service: Service) -> Self {
        Route::from(routing::Route::from(service))
    }
}

/// Where the router starts. Off-list startup paths land on home.
fn initial_path(startup: Option<&str>) -> String {
    startup
        .map(|path| resolve(path).route())
        .unwrap_or(routing::Route::Home)
        .path()
        .to_string()
}

/// Records the visit for the recommendation context once the page has mounted.
fn use_page_visit(service: Option<Service>) {
    let mut app_state = use_context::<Signal<AppState>>();
    use_effect(move || app_state.write().enter_page(service));
}

#[component]
fn HomePage() -> Element {
    use_page_visit(None);
    rsx! { Home {} }
}

#[component]
fn TeachingPage() -> Element {
    use_page_visit(Some(Service::Teaching));
    rsx! { ServicePage { service: Service::Teaching } }
}

#[component]
fn PerformancePage() -> Element {
    use_page_visit(Some(Service::Performance));
    rsx! { ServicePage { service: Service::Performance } }
}

#[component]
fn CollaborationPage() -> Element {
    use_page_visit(Some(Service::Collaboration));
    rsx! { ServicePage { service: Service::Collaboration } }
}

#[component]
fn AboutPage() -> Element {
    use_page_visit(None);
    rsx! { About {} }
}

#[component]
fn ContactPage() -> Element {
    use_page_visit(None);
    rsx! { Contact {} }
}

#[component]
fn UnknownPage(segments: Vec<String>) -> Element {
    let navigator = use_navigator();
    let path = format!("/{}", segments.join("/"));
    use_effect(move || {
        navigator.replace(Route::from(resolve(&path).route()));
    });
    rsx! {}
}

#[component]
fn SiteLayout() -> Element {
    let config = use_context::<SiteConfig>();
    let mut app_state = use_context::<Signal<AppState>>();
    let inquiry = app_state.read().active_inquiry;

    rsx! {
        Nav { site_name: config.site.name.clone() }
        main { Outlet::<Route> {} }
        if let Some(service) = inquiry {
            InquiryModal {
                key: "{service:?}",
                service: service,
                on_close: move |_| app_state.write().close_inquiry(),
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let config = use_context::<SiteConfig>();
    let startup = use_context::<StartupPath>();

    use_context_provider(|| Signal::new(AppState::default()));
    use_context_provider(|| Rc::new(WebviewDocument::new()));
    use_context_provider(|| SubmissionClient::new(config.storage.submissions_file.clone()));
    let css = use_hook(|| stylesheet(&config.theme.transitions));
    let initial = use_hook(|| initial_path(startup.0.as_deref()));

    rsx! {
        style { "{css}" }
        ThemeProvider {
            settings: config.theme.clone(),
            preferences_file: config.storage.preferences_file.clone(),
            Router::<Route> {
                config: move || {
                    RouterConfig::default().history(MemoryHistory::with_initial_path(initial.clone()))
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_covers_the_allow_list() {
        for page in routing::Route::ALL {
            let route = Route::from(page);
            assert_eq!(route.to_string(), page.path());
            assert_eq!(page.path().parse::<Route>().ok(), Some(route));
        }
    }

    #[test]
    fn off_list_paths_fall_through_to_the_catch_all() {
        let parsed = "/wp-admin/setup".parse::<Route>().ok();
        assert_eq!(
            parsed,
            Some(Route::UnknownPage { segments: vec!["wp-admin".into(), "setup".into()] })
        );
    }

    #[test]
    fn startup_path_is_sanitized_against_the_allow_list() {
        assert_eq!(initial_path(None), "/");
        assert_eq!(initial_path(Some("/teaching/")), "/teaching");
        assert_eq!(initial_path(Some("/performance?utm=x")), "/performance");
        assert_eq!(initial_path(Some("/admin")), "/");
    }

    #[test]
    fn services_map_to_their_pages() {
        assert_eq!(Route::from(Service::Collaboration), Route::CollaborationPage {});
        assert_eq!(Route::from(Service::Teaching).to_string(), "/teaching");
    }
}
