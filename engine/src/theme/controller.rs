// Ties store, watcher and applier together and exposes the state UI code reads.
use super::applier::ThemeApplier;
use super::palette;
use super::platform::PlatformServices;
use super::store::ThemeStore;
use super::watcher::{PreferenceChange, Subscription, SystemPreferenceWatcher};
use crate::config::ThemeSettings;
use site_shared::models::{ActiveTheme, ThemeConfig, ThemeMode};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::info;

/// Point-in-time view of the theme, plus the convenience flags components use.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSnapshot {
    pub mode: ThemeMode,
    pub active_theme: ActiveTheme,
    pub system_theme: ActiveTheme,
    pub reduced_motion: bool,
    pub is_initialized: bool,
    pub config: ThemeConfig,
}

impl ThemeSnapshot {
    /// What consumers see before the controller has started: light, nothing resolved.
    pub fn provisional(settings: &ThemeSettings) -> Self {
        Self {
            mode: settings.default_mode,
            active_theme: ActiveTheme::Light,
            system_theme: ActiveTheme::Light,
            reduced_motion: false,
            is_initialized: false,
            config: ThemeConfig {
                mode: settings.default_mode,
                active_theme: ActiveTheme::Light,
                colors: palette::light(),
                transitions: settings.transitions.clone(),
            },
        }
    }

    pub fn is_dark(&self) -> bool {
        self.active_theme == ActiveTheme::Dark
    }

    pub fn is_light(&self) -> bool {
        self.active_theme == ActiveTheme::Light
    }

    pub fn is_system_mode(&self) -> bool {
        self.mode == ThemeMode::System
    }

    pub fn mode_label(&self) -> &'static str {
        self.mode.label()
    }

    pub fn transitions_enabled(&self) -> bool {
        self.is_initialized && !self.reduced_motion
    }

    pub fn opposite_theme(&self) -> ActiveTheme {
        self.active_theme.opposite()
    }
}

type Listener = Rc<dyn Fn(&ThemeSnapshot)>;

struct ControllerInner {
    services: PlatformServices,
    settings: ThemeSettings,
    watcher: SystemPreferenceWatcher,
    applier: ThemeApplier,
    store: RefCell<Option<ThemeStore>>,
    reduced_motion: Cell<bool>,
    subscription: RefCell<Option<Subscription>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
}

#[derive(Clone)]
pub struct ThemeController {
    inner: Rc<ControllerInner>,
}

impl ThemeController {
    pub fn new(services: PlatformServices, settings: ThemeSettings) -> Self {
        let watcher = SystemPreferenceWatcher::new(services.media.clone());
        let applier = ThemeApplier::new(
            services.document.clone(),
            services.scheduler.clone(),
            settings.clone(),
        );
        let controller = Self {
            inner: Rc::new(ControllerInner {
                services,
                settings,
                watcher,
                applier,
                store: RefCell::new(None),
                reduced_motion: Cell::new(false),
                subscription: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        };
        let weak = Rc::downgrade(&controller.inner);
        controller.inner.applier.on_settled(move || {
            if let Some(inner) = weak.upgrade() {
                ThemeController { inner }.notify();
            }
        });
        controller
    }

    pub fn is_started(&self) -> bool {
        self.inner.store.borrow().is_some()
    }

    /// Loads the persisted mode, reads OS preferences, starts watching them and applies
    /// the first theme. Calling it again does nothing.
    pub fn start(&self) {
        if self.is_started() {
            return;
        }
        let inner = &self.inner;
        let system_theme = inner.watcher.get_system_theme();
        let reduced_motion = inner.watcher.get_motion_preference();
        inner.reduced_motion.set(reduced_motion);
        inner.applier.set_reduced_motion(reduced_motion);

        let store = ThemeStore::load(inner.services.storage.clone(), &inner.settings, system_theme);
        let active = store.active_theme();
        info!(mode = %store.mode(), %active, reduced_motion, "Theme controller starting");
        *inner.store.borrow_mut() = Some(store);

        let weak = Rc::downgrade(inner);
        let subscription = inner
            .watcher
            .subscribe(move |change| Self::on_preference_change(&weak, change));
        *inner.subscription.borrow_mut() = Some(subscription);

        inner.applier.apply_theme(active, false);
        self.notify();
    }

    /// Detaches from OS preference changes.
    pub fn stop(&self) {
        if let Some(mut sub) = self.inner.subscription.borrow_mut().take() {
            sub.unsubscribe();
        }
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        let inner = &self.inner;
        let store = inner.store.borrow();
        let Some(store) = store.as_ref() else {
            return ThemeSnapshot::provisional(&inner.settings);
        };
        let active_theme = store.active_theme();
        ThemeSnapshot {
            mode: store.mode(),
            active_theme,
            system_theme: store.system_theme(),
            reduced_motion: inner.reduced_motion.get(),
            is_initialized: inner.applier.is_initialized(),
            config: ThemeConfig {
                mode: store.mode(),
                active_theme,
                colors: palette::colors_for(active_theme),
                transitions: inner.settings.transitions.clone(),
            },
        }
    }

    pub fn set_theme(&self, mode: ThemeMode) {
        self.mutate(|store| {
            store.set_mode(mode);
        });
    }

    /// Returns false (and changes nothing) when `raw` isn't a valid mode.
    pub fn set_theme_str(&self, raw: &str) -> bool {
        let mut accepted = false;
        self.mutate(|store| accepted = store.set_mode_str(raw));
        accepted
    }

    pub fn toggle_theme(&self) {
        self.mutate(|store| {
            store.toggle();
        });
    }

    pub fn cycle_theme(&self) {
        self.mutate(|store| {
            store.cycle();
        });
    }

    /// Re-applies the current theme with an animated transition, even if one is running.
    pub fn force_transition(&self) {
        let active = match self.inner.store.borrow().as_ref() {
            Some(store) => store.active_theme(),
            None => return,
        };
        self.inner.applier.apply_theme(active, true);
        self.notify();
    }

    /// `listener` gets a fresh snapshot after every change. Returns an id for
    /// [`ThemeController::remove_listener`].
    pub fn add_listener(&self, listener: impl Fn(&ThemeSnapshot) + 'static) -> u64 {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn remove_listener(&self, id: u64) {
        self.inner.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }

    fn mutate(&self, change: impl FnOnce(&mut ThemeStore)) {
        if !self.is_started() {
            self.start();
        }
        let (before, after) = {
            let mut guard = self.inner.store.borrow_mut();
            let Some(store) = guard.as_mut() else { return };
            let before = store.active_theme();
            change(store);
            (before, store.active_theme())
        };
        if before != after {
            self.inner.applier.apply_theme(after, false);
        }
        self.notify();
    }

    fn on_preference_change(weak: &Weak<ControllerInner>, change: PreferenceChange) {
        let Some(inner) = weak.upgrade() else { return };
        let controller = ThemeController { inner };
        match change {
            PreferenceChange::ColorScheme(theme) => {
                let changed = controller
                    .inner
                    .store
                    .borrow_mut()
                    .as_mut()
                    .map(|store| store.set_system_theme(theme))
                    .unwrap_or(false);
                if changed {
                    controller.inner.applier.apply_theme(theme, false);
                }
            }
            PreferenceChange::ReducedMotion(reduce) => {
                controller.inner.reduced_motion.set(reduce);
                controller.inner.applier.set_reduced_motion(reduce);
            }
        }
        controller.notify();
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}
