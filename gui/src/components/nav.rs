// Top navigation bar: brand, the allow-listed pages and the theme toggle.
#![allow(non_snake_case)]
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use site_engine::routing;

use super::theme_toggle::ThemeToggle;
use crate::app::Route;

#[component]
pub fn Nav(site_name: String) -> Element {
    rsx! {
        nav { class: "site-nav",
            Link { to: Route::HomePage {}, class: "brand".to_string(), "{site_name}" }
            for page in routing::Route::ALL {
                NavTab { key: "{page}", to: Route::from(page), label: page.title() }
            }
            ThemeToggle {}
        }
    }
}

#[component]
fn NavTab(to: Route, label: &'static str) -> Element {
    let route = use_route::<Route>();
    let class = if route == to { "active" } else { "" };

    rsx! {
        Link { to: to, class: class.to_string(), "{label}" }
    }
}
