// Theme context: installs the engine's controller for the component tree and mirrors
// its snapshots into a signal so components re-render on change.
#![allow(non_snake_case)]
use dioxus::prelude::*;
use site_engine::config::ThemeSettings;
use site_engine::theme::platform::{Document, FileStorage, ManualMediaQuery, PlatformServices};
use site_engine::theme::{ThemeController, ThemeSnapshot};
use site_shared::models::ThemeMode;
use std::path::PathBuf;
use std::rc::Rc;

use crate::services::webview::{bridge_media_queries, TokioScheduler, WebviewDocument};

/// What [`use_theme`] hands to components.
#[derive(Clone)]
pub struct UseTheme {
    controller: ThemeController,
    snapshot: Signal<ThemeSnapshot>,
}

impl UseTheme {
    pub fn snapshot(&self) -> ThemeSnapshot {
        self.snapshot.read().clone()
    }

    pub fn set_theme(&self, mode: ThemeMode) {
        self.controller.set_theme(mode);
    }

    pub fn toggle_theme(&self) {
        self.controller.toggle_theme();
    }

    pub fn cycle_theme(&self) {
        self.controller.cycle_theme();
    }

    pub fn force_transition(&self) {
        self.controller.force_transition();
    }
}

/// Panics outside a [`ThemeProvider`].
pub fn use_theme() -> UseTheme {
    try_use_context::<UseTheme>().expect("use_theme must be called inside a ThemeProvider")
}

#[component]
pub fn ThemeProvider(settings: ThemeSettings, preferences_file: PathBuf, children: Element) -> Element {
    let document = use_context::<Rc<WebviewDocument>>();

    let (theme, media) = use_hook(|| {
        let media = Rc::new(ManualMediaQuery::new());
        let services = PlatformServices {
            storage: Rc::new(FileStorage::new(preferences_file.clone())),
            media: media.clone(),
            document: Some(document.clone() as Rc<dyn Document>),
            scheduler: Rc::new(TokioScheduler),
        };
        let controller = ThemeController::new(services, settings.clone());
        let snapshot = Signal::new(controller.snapshot());
        (UseTheme { controller, snapshot }, media)
    });
    use_context_provider(|| theme.clone());

    let listener = use_hook(|| {
        let snapshot = theme.snapshot;
        theme.controller.add_listener(move |latest| {
            let mut snapshot = snapshot;
            snapshot.set(latest.clone());
        })
    });

    let controller = theme.controller.clone();
    use_future(move || {
        let media = media.clone();
        let controller = controller.clone();
        async move {
            bridge_media_queries(media, move || controller.start()).await;
        }
    });

    let controller = theme.controller.clone();
    use_drop(move || {
        controller.remove_listener(listener);
        controller.stop();
    });

    rsx! { {children} }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ReadsThemeWithoutProvider() -> Element {
        let theme = use_theme();
        let label = theme.snapshot().mode.label();
        rsx! { span { "{label}" } }
    }

    #[test]
    #[should_panic(expected = "use_theme must be called inside a ThemeProvider")]
    fn use_theme_outside_a_provider_panics() {
        let mut dom = VirtualDom::new(ReadsThemeWithoutProvider);
        dom.rebuild_in_place();
    }
}
