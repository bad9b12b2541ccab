// Site stylesheet. Colors come from the custom properties the theme applier writes;
// the light palette is inlined on :root so the first paint already has values.
use site_engine::theme::palette;
use site_shared::models::{ActiveTheme, TransitionConfig};

const BASE_STYLESHEET: &str = r#"
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: "Inter", system-ui, sans-serif;
    background: var(--color-background);
    color: var(--color-text-primary);
}
html.theme-transitioning, html.theme-transitioning * {
    transition: background-color var(--transition-normal) var(--transition-easing),
                color var(--transition-normal) var(--transition-easing),
                border-color var(--transition-normal) var(--transition-easing);
}
html.theme-no-transition, html.theme-no-transition * { transition: none !important; }
html.theme-loading main { visibility: hidden; }

.site-nav {
    display: flex;
    align-items: center;
    gap: 1rem;
    padding: 1rem 2rem;
    background: var(--color-surface);
    border-bottom: 1px solid var(--color-border);
}
.site-nav .brand { font-weight: 700; margin-right: auto; }
.site-nav a { color: var(--color-text-secondary); cursor: pointer; text-decoration: none; }
.site-nav a.active { color: var(--color-primary); }

main { max-width: 960px; margin: 0 auto; padding: 2rem; }

button {
    background: var(--color-primary);
    color: var(--color-text-inverse);
    border: none;
    border-radius: 6px;
    padding: 0.5rem 1rem;
    cursor: pointer;
}
button:hover { background: var(--color-primary-hover); }
button:disabled { opacity: 0.6; cursor: default; }
button.secondary { background: var(--color-secondary); }

.theme-toggle { background: var(--color-background-tertiary); color: var(--color-text-primary); }

.card {
    background: var(--color-surface);
    border: 1px solid var(--color-border);
    border-radius: 8px;
    padding: 1.25rem;
    margin: 1rem 0;
    box-shadow: 0 1px 3px var(--color-shadow);
}

.overlay {
    position: fixed;
    inset: 0;
    background: var(--color-overlay);
    display: flex;
    align-items: flex-start;
    justify-content: center;
    overflow-y: auto;
    padding: 3rem 1rem;
}
.modal { background: var(--color-background); border-radius: 10px; padding: 2rem; width: min(640px, 100%); }
.modal fieldset { border: none; border-top: 1px solid var(--color-divider); padding: 1rem 0; }
.field { display: flex; flex-direction: column; gap: 0.25rem; margin-bottom: 0.75rem; }
.field input, .field select, .field textarea {
    padding: 0.5rem;
    border: 1px solid var(--color-border);
    border-radius: 4px;
    background: var(--color-background-secondary);
    color: var(--color-text-primary);
}
.field .help { color: var(--color-text-tertiary); font-size: 0.85rem; }
.field .error, .submission-error { color: var(--color-error); font-size: 0.85rem; }
.success { color: var(--color-success); }

.estimate .range { font-size: 1.5rem; color: var(--color-accent); }
.estimate .consult { color: var(--color-info); }
.recommendation.high { border-left: 4px solid var(--color-primary); }
.recommendation.medium { border-left: 4px solid var(--color-secondary); }
"#;

/// Full stylesheet for the page `<head>`.
pub fn stylesheet(transitions: &TransitionConfig) -> String {
    let root_vars: String = palette::css_properties(ActiveTheme::Light, transitions)
        .into_iter()
        .map(|(name, value)| format!("{}: {};", name, value))
        .collect::<Vec<_>>()
        .join(" ");
    format!(":root {{ {} }}\n{}", root_vars, BASE_STYLESHEET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_seeds_every_custom_property() {
        let css = stylesheet(&TransitionConfig::default());
        assert!(css.starts_with(":root {"));
        assert!(css.contains("--color-background: #ffffff;"));
        assert!(css.contains("--transition-easing: cubic-bezier(0.4, 0, 0.2, 1);"));
        assert!(css.contains("html.theme-no-transition"));
    }
}
