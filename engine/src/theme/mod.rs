// Theme subsystem: mode store, OS preference watcher, document applier and the
// controller that ties them together.
pub mod applier;
pub mod controller;
pub mod palette;
pub mod platform;
pub mod store;
pub mod watcher;

pub use applier::{ThemeApplier, TransitionState};
pub use controller::{ThemeController, ThemeSnapshot};
pub use platform::PlatformServices;
pub use store::ThemeStore;
pub use watcher::{PreferenceChange, Subscription, SystemPreferenceWatcher};
