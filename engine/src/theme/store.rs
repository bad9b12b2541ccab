// Theme mode store: resolution to an active theme and persistence of the mode.
use super::platform::PreferenceStorage;
use crate::config::ThemeSettings;
use site_shared::models::{ActiveTheme, ThemeMode};
use std::rc::Rc;
use tracing::{debug, warn};

pub struct ThemeStore {
    storage: Rc<dyn PreferenceStorage>,
    storage_key: String,
    mode: ThemeMode,
    system_theme: ActiveTheme,
}

impl ThemeStore {
    /// Reads the persisted mode; anything missing, invalid or unreadable becomes the
    /// configured default.
    pub fn load(
        storage: Rc<dyn PreferenceStorage>,
        settings: &ThemeSettings,
        system_theme: ActiveTheme,
    ) -> Self {
        let mode = Self::load_mode(storage.as_ref(), &settings.storage_key, settings.default_mode);
        debug!(%mode, %system_theme, "Theme store loaded");
        Self {
            storage,
            storage_key: settings.storage_key.clone(),
            mode,
            system_theme,
        }
    }

    pub fn load_mode(storage: &dyn PreferenceStorage, key: &str, default: ThemeMode) -> ThemeMode {
        match storage.read(key) {
            Ok(Some(raw)) => match raw.parse::<ThemeMode>() {
                Ok(mode) => mode,
                Err(e) => {
                    warn!("Ignoring stored theme mode: {}", e);
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                warn!("Theme preference could not be read, using {}: {}", default, e);
                default
            }
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn system_theme(&self) -> ActiveTheme {
        self.system_theme
    }

    pub fn active_theme(&self) -> ActiveTheme {
        self.resolve_active(self.mode)
    }

    pub fn resolve_active(&self, mode: ThemeMode) -> ActiveTheme {
        match mode {
            ThemeMode::Light => ActiveTheme::Light,
            ThemeMode::Dark => ActiveTheme::Dark,
            ThemeMode::System => self.system_theme,
        }
    }

    pub fn set_mode(&mut self, mode: ThemeMode) -> ActiveTheme {
        self.mode = mode;
        self.persist();
        self.active_theme()
    }

    /// Parses and applies a raw mode string. Invalid input is logged and ignored.
    pub fn set_mode_str(&mut self, raw: &str) -> bool {
        match raw.parse::<ThemeMode>() {
            Ok(mode) => {
                self.set_mode(mode);
                true
            }
            Err(e) => {
                warn!("Rejected theme mode change: {}", e);
                false
            }
        }
    }

    /// Flips to the opposite concrete theme. From system mode this picks the opposite
    /// of what the OS currently reports, leaving system mode.
    pub fn toggle(&mut self) -> ThemeMode {
        let next = ThemeMode::from(self.active_theme().opposite());
        self.set_mode(next);
        next
    }

    pub fn cycle(&mut self) -> ThemeMode {
        let next = self.mode.next();
        self.set_mode(next);
        next
    }

    /// Records the OS preference. Returns whether the active theme changed.
    pub fn set_system_theme(&mut self, theme: ActiveTheme) -> bool {
        let before = self.active_theme();
        self.system_theme = theme;
        before != self.active_theme()
    }

    fn persist(&self) {
        if let Err(e) = self.storage.write(&self.storage_key, self.mode.as_str()) {
            warn!("Theme preference not persisted, keeping it in memory: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::THEME_STORAGE_KEY;
    use crate::theme::platform::{FileStorage, MemoryStorage, UnavailableStorage};

    fn store_with(storage: Rc<dyn PreferenceStorage>, system: ActiveTheme) -> ThemeStore {
        ThemeStore::load(storage, &ThemeSettings::default(), system)
    }

    #[test]
    fn resolve_active_never_returns_system() {
        for system in [ActiveTheme::Light, ActiveTheme::Dark] {
            let store = store_with(Rc::new(MemoryStorage::new()), system);
            for mode in ThemeMode::ALL {
                let active = store.resolve_active(mode);
                assert!(matches!(active, ActiveTheme::Light | ActiveTheme::Dark));
            }
            assert_eq!(store.resolve_active(ThemeMode::System), system);
        }
    }

    #[test]
    fn corrupted_or_missing_value_loads_default() {
        for raw in ["", "DARK", "sepia", "{\"mode\":\"dark\"}"] {
            let storage = Rc::new(MemoryStorage::with_value(THEME_STORAGE_KEY, raw));
            assert_eq!(store_with(storage, ActiveTheme::Light).mode(), ThemeMode::System);
        }
        assert_eq!(
            store_with(Rc::new(MemoryStorage::new()), ActiveTheme::Light).mode(),
            ThemeMode::System
        );
        assert_eq!(
            store_with(Rc::new(UnavailableStorage), ActiveTheme::Light).mode(),
            ThemeMode::System
        );
    }

    #[test]
    fn toggle_twice_round_trips() {
        for start in [ThemeMode::Light, ThemeMode::Dark] {
            let mut store = store_with(Rc::new(MemoryStorage::new()), ActiveTheme::Light);
            store.set_mode(start);
            store.toggle();
            assert_ne!(store.mode(), start);
            store.toggle();
            assert_eq!(store.mode(), start);
        }
    }

    #[test]
    fn toggle_from_system_uses_opposite_of_os_preference() {
        let mut store = store_with(Rc::new(MemoryStorage::new()), ActiveTheme::Dark);
        assert_eq!(store.mode(), ThemeMode::System);
        assert_eq!(store.toggle(), ThemeMode::Light);

        let mut store = store_with(Rc::new(MemoryStorage::new()), ActiveTheme::Light);
        assert_eq!(store.toggle(), ThemeMode::Dark);
    }

    #[test]
    fn cycle_is_a_closed_three_cycle() {
        for start in ThemeMode::ALL {
            let mut store = store_with(Rc::new(MemoryStorage::new()), ActiveTheme::Light);
            store.set_mode(start);
            store.cycle();
            store.cycle();
            store.cycle();
            assert_eq!(store.mode(), start);
        }
    }

    #[test]
    fn invalid_mode_string_is_ignored() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store = store_with(storage.clone(), ActiveTheme::Light);
        store.set_mode(ThemeMode::Dark);
        assert!(!store.set_mode_str("purple"));
        assert_eq!(store.mode(), ThemeMode::Dark);
        assert_eq!(storage.read(THEME_STORAGE_KEY).unwrap(), Some("dark".to_string()));
        assert!(store.set_mode_str("light"));
        assert_eq!(storage.read(THEME_STORAGE_KEY).unwrap(), Some("light".to_string()));
    }

    #[test]
    fn unavailable_storage_keeps_mode_in_memory() {
        let mut store = store_with(Rc::new(UnavailableStorage), ActiveTheme::Light);
        store.set_mode(ThemeMode::Dark);
        assert_eq!(store.mode(), ThemeMode::Dark);
        assert_eq!(store.active_theme(), ActiveTheme::Dark);
    }

    #[test]
    fn system_change_only_matters_in_system_mode() {
        let mut store = store_with(Rc::new(MemoryStorage::new()), ActiveTheme::Dark);
        assert!(store.set_system_theme(ActiveTheme::Light));
        assert_eq!(store.active_theme(), ActiveTheme::Light);
        store.set_mode(ThemeMode::Dark);
        assert!(!store.set_system_theme(ActiveTheme::Dark));
        assert!(!store.set_system_theme(ActiveTheme::Light));
    }

    #[test]
    fn file_storage_persists_across_store_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        {
            let mut store = store_with(Rc::new(FileStorage::new(&path)), ActiveTheme::Light);
            store.cycle(); // system -> light
            store.cycle(); // light -> dark
        }
        let store = store_with(Rc::new(FileStorage::new(&path)), ActiveTheme::Light);
        assert_eq!(store.mode(), ThemeMode::Dark);
    }
}
