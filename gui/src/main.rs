// Desktop entry point for the musician site
#![allow(non_snake_case)]

use anyhow::Context;
use dioxus::prelude::*;
use dioxus_desktop::{Config as DesktopConfig, LogicalSize, WindowBuilder};
use site_engine::routing::decode_static_redirect;

mod app;
mod components;
mod config;
mod services;
mod state;

use app::{App, StartupPath};
use config::SiteConfig;

/// Accepts a plain path or the `?/path&query` form a static host's 404 page produces.
fn startup_path(arg: &str) -> Option<String> {
    if arg.starts_with('?') {
        decode_static_redirect(arg)
    } else {
        Some(arg.to_string())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let site_config = SiteConfig::load_default().context("loading the embedded site configuration")?;
    tracing::info!(version = %site_config.version, "Starting {}", site_config.site.name);

    let startup = StartupPath(std::env::args().nth(1).and_then(|arg| startup_path(&arg)));

    let window = WindowBuilder::new()
        .with_title(site_config.window.title.clone())
        .with_inner_size(LogicalSize::new(site_config.window.width, site_config.window.height));

    LaunchBuilder::desktop()
        .with_cfg(DesktopConfig::new().with_window(window))
        .with_context(site_config)
        .with_context(startup)
        .launch(App);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_path_decodes_static_redirects() {
        assert_eq!(startup_path("/teaching").as_deref(), Some("/teaching"));
        assert_eq!(startup_path("?/performance&utm=x").as_deref(), Some("/performance?utm=x"));
        assert_eq!(startup_path("?utm=x"), None);
    }
}
