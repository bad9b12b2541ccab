// Projects the active theme onto the document and choreographs transitions.
//
// Class tokens and the data attribute below are matched by name in the stylesheet.

use super::palette;
use super::platform::{Document, Scheduler};
use crate::config::ThemeSettings;
use site_shared::models::ActiveTheme;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::debug;

pub const CLASS_LIGHT: &str = "theme-light";
pub const CLASS_DARK: &str = "theme-dark";
pub const CLASS_NO_TRANSITION: &str = "theme-no-transition";
pub const CLASS_TRANSITIONING: &str = "theme-transitioning";
pub const CLASS_LOADED: &str = "theme-loaded";
pub const CLASS_LOADING: &str = "theme-loading";
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionState {
    pub is_transitioning: bool,
    pub is_initial_load: bool,
    pub reduced_motion: bool,
}

impl Default for TransitionState {
    fn default() -> Self {
        Self {
            is_transitioning: false,
            is_initial_load: true,
            reduced_motion: false,
        }
    }
}

struct ApplierInner {
    document: Option<Rc<dyn Document>>,
    scheduler: Rc<dyn Scheduler>,
    settings: ThemeSettings,
    state: RefCell<TransitionState>,
    first_applied: Cell<bool>,
    // Bumped per animated transition; only the latest one may clear the flag.
    generation: Cell<u64>,
    on_settled: RefCell<Option<Rc<dyn Fn()>>>,
}

/// Cheap to clone; clones share one [`TransitionState`].
#[derive(Clone)]
pub struct ThemeApplier {
    inner: Rc<ApplierInner>,
}

impl ThemeApplier {
    pub fn new(
        document: Option<Rc<dyn Document>>,
        scheduler: Rc<dyn Scheduler>,
        settings: ThemeSettings,
    ) -> Self {
        Self {
            inner: Rc::new(ApplierInner {
                document,
                scheduler,
                settings,
                state: RefCell::new(TransitionState::default()),
                first_applied: Cell::new(false),
                generation: Cell::new(0),
                on_settled: RefCell::new(None),
            }),
        }
    }

    pub fn state(&self) -> TransitionState {
        *self.inner.state.borrow()
    }

    /// True once the first-load settling delay has elapsed.
    pub fn is_initialized(&self) -> bool {
        !self.inner.state.borrow().is_initial_load
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.inner.state.borrow_mut().reduced_motion = reduced;
    }

    /// Called once, when the initial-load window closes.
    pub fn on_settled(&self, callback: impl Fn() + 'static) {
        *self.inner.on_settled.borrow_mut() = Some(Rc::new(callback));
    }

    /// Applies `active` to the document. Returns whether the change animates.
    pub fn apply_theme(&self, active: ActiveTheme, force_transition: bool) -> bool {
        let inner = &self.inner;
        let properties = palette::css_properties(active, &inner.settings.transitions);

        let animate = {
            let state = inner.state.borrow();
            !state.is_initial_load
                && !state.reduced_motion
                && (force_transition || !state.is_transitioning)
        };

        if animate {
            inner.state.borrow_mut().is_transitioning = true;
            let generation = inner.generation.get() + 1;
            inner.generation.set(generation);
            debug!(theme = %active, generation, "Animating theme change");

            if let Some(doc) = &inner.document {
                doc.remove_class(CLASS_NO_TRANSITION);
                doc.add_class(CLASS_TRANSITIONING);
                let frame_doc = doc.clone();
                let write: Box<dyn FnOnce()> = Box::new(move || frame_doc.set_properties(&properties));
                if let Err(write_now) = inner.scheduler.request_animation_frame(write) {
                    write_now();
                }
            }

            let weak = Rc::downgrade(inner);
            inner.scheduler.set_timeout(
                Duration::from_millis(inner.settings.transition_window_ms()),
                Box::new(move || Self::finish_transition(&weak, generation)),
            );
        } else if let Some(doc) = &inner.document {
            doc.add_class(CLASS_NO_TRANSITION);
            doc.set_properties(&properties);
        }

        if !inner.first_applied.replace(true) {
            if let Some(doc) = &inner.document {
                doc.add_class(CLASS_LOADING);
            }
            let weak = Rc::downgrade(inner);
            inner.scheduler.set_timeout(
                Duration::from_millis(inner.settings.settle_delay_ms),
                Box::new(move || Self::settle(&weak)),
            );
        }

        if let Some(doc) = &inner.document {
            doc.remove_class(CLASS_LIGHT);
            doc.remove_class(CLASS_DARK);
            doc.add_class(active.class_name());
            doc.set_attribute(THEME_ATTRIBUTE, active.as_str());
        }

        animate
    }

    fn finish_transition(weak: &Weak<ApplierInner>, generation: u64) {
        let Some(inner) = weak.upgrade() else { return };
        if inner.generation.get() != generation {
            return;
        }
        inner.state.borrow_mut().is_transitioning = false;
        if let Some(doc) = &inner.document {
            doc.remove_class(CLASS_TRANSITIONING);
        }
    }

    fn settle(weak: &Weak<ApplierInner>) {
        let Some(inner) = weak.upgrade() else { return };
        inner.state.borrow_mut().is_initial_load = false;
        if let Some(doc) = &inner.document {
            doc.remove_class(CLASS_LOADING);
            doc.add_class(CLASS_LOADED);
        }
        debug!("Theme settled, transitions unlocked");
        let callback = inner.on_settled.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}
