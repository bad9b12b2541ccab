#![allow(non_snake_case)]
use dioxus::prelude::*;

use super::theme_provider::use_theme;

/// Cycles light, dark and system.
#[component]
pub fn ThemeToggle() -> Element {
    let theme = use_theme();
    let snapshot = theme.snapshot();
    let icon = if snapshot.is_system_mode() {
        "◐"
    } else if snapshot.is_dark() {
        "☾"
    } else {
        "☀"
    };
    let label = snapshot.mode_label();
    let title = format!("Theme: {} (click to change)", label);

    rsx! {
        button {
            class: "theme-toggle",
            title: "{title}",
            onclick: move |_| theme.cycle_theme(),
            "{icon} {label}"
        }
    }
}
