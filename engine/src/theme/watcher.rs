// Watches OS-level color-scheme and reduced-motion preferences.
use super::platform::{MediaQuery, WatchId, DARK_SCHEME_QUERY, REDUCED_MOTION_QUERY};
use site_shared::models::ActiveTheme;
use std::rc::Rc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceChange {
    ColorScheme(ActiveTheme),
    ReducedMotion(bool),
}

#[derive(Clone)]
pub struct SystemPreferenceWatcher {
    media: Rc<dyn MediaQuery>,
}

impl SystemPreferenceWatcher {
    pub fn new(media: Rc<dyn MediaQuery>) -> Self {
        Self { media }
    }

    /// Dark when the OS asks for it; light when it doesn't or can't be asked.
    pub fn get_system_theme(&self) -> ActiveTheme {
        match self.media.matches(DARK_SCHEME_QUERY) {
            Ok(true) => ActiveTheme::Dark,
            Ok(false) => ActiveTheme::Light,
            Err(e) => {
                warn!("Could not query system color scheme, assuming light: {}", e);
                ActiveTheme::Light
            }
        }
    }

    /// Whether the user asked for reduced motion. Defaults to false.
    pub fn get_motion_preference(&self) -> bool {
        match self.media.matches(REDUCED_MOTION_QUERY) {
            Ok(reduce) => reduce,
            Err(e) => {
                warn!("Could not query motion preference, allowing motion: {}", e);
                false
            }
        }
    }

    /// Registers `on_change` for both preferences. When media queries are unavailable
    /// the returned subscription is inert.
    pub fn subscribe(&self, on_change: impl Fn(PreferenceChange) + 'static) -> Subscription {
        let on_change: Rc<dyn Fn(PreferenceChange)> = Rc::new(on_change);
        let mut ids = Vec::with_capacity(2);

        let scheme_cb = on_change.clone();
        match self.media.watch(
            DARK_SCHEME_QUERY,
            Rc::new(move |dark| {
                let theme = if dark { ActiveTheme::Dark } else { ActiveTheme::Light };
                scheme_cb(PreferenceChange::ColorScheme(theme));
            }),
        ) {
            Ok(id) => ids.push(id),
            Err(e) => warn!("System color scheme changes will not be tracked: {}", e),
        }

        let motion_cb = on_change;
        match self.media.watch(
            REDUCED_MOTION_QUERY,
            Rc::new(move |reduce| motion_cb(PreferenceChange::ReducedMotion(reduce))),
        ) {
            Ok(id) => ids.push(id),
            Err(e) => warn!("Motion preference changes will not be tracked: {}", e),
        }

        Subscription {
            media: self.media.clone(),
            ids,
        }
    }
}

/// Detaches its listeners on `unsubscribe` or drop.
pub struct Subscription {
    media: Rc<dyn MediaQuery>,
    ids: Vec<WatchId>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn unsubscribe(&mut self) {
        for id in self.ids.drain(..) {
            self.media.unwatch(id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
