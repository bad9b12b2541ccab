pub mod settings;

pub use settings::ThemeSettings;
