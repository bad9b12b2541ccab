// Light and dark palettes for the site.
use site_shared::models::{ActiveTheme, ThemeColors, TransitionConfig};

fn c(value: &str) -> String {
    value.to_string()
}

pub fn light() -> ThemeColors {
    ThemeColors {
        primary: c("#7c3aed"),
        primary_hover: c("#6d28d9"),
        primary_active: c("#5b21b6"),
        secondary: c("#0f766e"),
        secondary_hover: c("#115e59"),
        secondary_active: c("#134e4a"),
        background: c("#ffffff"),
        background_secondary: c("#f8fafc"),
        background_tertiary: c("#f1f5f9"),
        surface: c("#ffffff"),
        text_primary: c("#0f172a"),
        text_secondary: c("#475569"),
        text_tertiary: c("#94a3b8"),
        text_inverse: c("#ffffff"),
        border: c("#e2e8f0"),
        divider: c("#cbd5e1"),
        success: c("#16a34a"),
        warning: c("#d97706"),
        error: c("#dc2626"),
        info: c("#2563eb"),
        accent: c("#db2777"),
        shadow: c("rgba(15, 23, 42, 0.08)"),
        overlay: c("rgba(15, 23, 42, 0.5)"),
    }
}

pub fn dark() -> ThemeColors {
    ThemeColors {
        primary: c("#a78bfa"),
        primary_hover: c("#c4b5fd"),
        primary_active: c("#ddd6fe"),
        secondary: c("#2dd4bf"),
        secondary_hover: c("#5eead4"),
        secondary_active: c("#99f6e4"),
        background: c("#0b1020"),
        background_secondary: c("#111827"),
        background_tertiary: c("#1f2937"),
        surface: c("#161e2e"),
        text_primary: c("#f8fafc"),
        text_secondary: c("#cbd5e1"),
        text_tertiary: c("#64748b"),
        text_inverse: c("#0f172a"),
        border: c("#334155"),
        divider: c("#1e293b"),
        success: c("#4ade80"),
        warning: c("#fbbf24"),
        error: c("#f87171"),
        info: c("#60a5fa"),
        accent: c("#f472b6"),
        shadow: c("rgba(0, 0, 0, 0.4)"),
        overlay: c("rgba(0, 0, 0, 0.7)"),
    }
}

pub fn colors_for(theme: ActiveTheme) -> ThemeColors {
    match theme {
        ActiveTheme::Light => light(),
        ActiveTheme::Dark => dark(),
    }
}

/// Every custom property written for `theme`: colors first, then transition timing.
pub fn css_properties(theme: ActiveTheme, transitions: &TransitionConfig) -> Vec<(String, String)> {
    let mut props = colors_for(theme).css_properties();
    props.extend(transitions.css_properties());
    props
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_define_the_same_roles() {
        let light_roles: Vec<&str> = light().roles().iter().map(|(r, _)| *r).collect();
        let dark_roles: Vec<&str> = dark().roles().iter().map(|(r, _)| *r).collect();
        assert_eq!(light_roles, dark_roles);
        assert!(light().roles().iter().all(|(_, v)| !v.is_empty()));
        assert!(dark().roles().iter().all(|(_, v)| !v.is_empty()));
    }

    #[test]
    fn css_properties_include_transitions() {
        let props = css_properties(ActiveTheme::Dark, &TransitionConfig::default());
        assert!(props.contains(&("--color-background".to_string(), "#0b1020".to_string())));
        assert!(props.contains(&("--transition-normal".to_string(), "300ms".to_string())));
    }
}
