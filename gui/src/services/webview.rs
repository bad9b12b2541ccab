// Platform services backed by the desktop webview.
//
// The Rust side keeps a mirror of what it has written so reads never need a round trip;
// nothing else in the page touches the root classes or the body overflow.
use dioxus::prelude::*;
use serde::Deserialize;
use site_engine::theme::platform::{
    Document, ManualMediaQuery, Scheduler, Task, DARK_SCHEME_QUERY, REDUCED_MOTION_QUERY,
};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

const FRAME: Duration = Duration::from_millis(16);

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn run_script(script: String) {
    // Fire and forget; the page has no reply for DOM writes.
    let _ = eval(&script);
}

#[derive(Debug, Default)]
pub struct WebviewDocument {
    classes: RefCell<BTreeSet<String>>,
    body_styles: RefCell<HashMap<String, String>>,
}

impl WebviewDocument {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Document for WebviewDocument {
    fn add_class(&self, class: &str) {
        if self.classes.borrow_mut().insert(class.to_string()) {
            run_script(format!("document.documentElement.classList.add({});", js_string(class)));
        }
    }

    fn remove_class(&self, class: &str) {
        if self.classes.borrow_mut().remove(class) {
            run_script(format!("document.documentElement.classList.remove({});", js_string(class)));
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    fn set_property(&self, name: &str, value: &str) {
        run_script(format!(
            "document.documentElement.style.setProperty({}, {});",
            js_string(name),
            js_string(value)
        ));
    }

    fn set_attribute(&self, name: &str, value: &str) {
        run_script(format!(
            "document.documentElement.setAttribute({}, {});",
            js_string(name),
            js_string(value)
        ));
    }

    fn body_style(&self, property: &str) -> Option<String> {
        self.body_styles.borrow().get(property).cloned()
    }

    fn set_body_style(&self, property: &str, value: Option<&str>) {
        let script = match value {
            Some(value) => {
                self.body_styles.borrow_mut().insert(property.to_string(), value.to_string());
                format!("document.body.style.setProperty({}, {});", js_string(property), js_string(value))
            }
            None => {
                self.body_styles.borrow_mut().remove(property);
                format!("document.body.style.removeProperty({});", js_string(property))
            }
        };
        run_script(script);
    }

    fn set_properties(&self, properties: &[(String, String)]) {
        let Ok(batch) = serde_json::to_string(properties) else {
            return;
        };
        run_script(format!(
            "for (const [k, v] of {}) document.documentElement.style.setProperty(k, v);",
            batch
        ));
    }
}

/// Timers on the tokio runtime the desktop shell already drives. The webview's own
/// animation frames aren't reachable from Rust, so a frame is one 16ms tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn request_animation_frame(&self, task: Task) -> Result<(), Task> {
        self.set_timeout(FRAME, task);
        Ok(())
    }

    fn set_timeout(&self, delay: Duration, task: Task) {
        let spawned = spawn_forever(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        if spawned.is_none() {
            warn!(?delay, "No runtime to schedule theme timer on");
        }
    }
}

#[derive(Debug, Deserialize)]
struct MediaReport {
    query: String,
    matches: bool,
}

fn media_bridge_script() -> String {
    format!(
        r#"
        for (const query of [{dark}, {motion}]) {{
            const mql = window.matchMedia(query);
            dioxus.send({{ query, matches: mql.matches }});
            mql.addEventListener("change", (e) => dioxus.send({{ query, matches: e.matches }}));
        }}
        "#,
        dark = js_string(DARK_SCHEME_QUERY),
        motion = js_string(REDUCED_MOTION_QUERY),
    )
}

/// Feeds the webview's media queries into `media` until the page goes away. `on_ready`
/// runs once both initial values are known, or as soon as the bridge fails.
pub async fn bridge_media_queries(media: Rc<ManualMediaQuery>, on_ready: impl FnOnce()) {
    let mut on_ready = Some(on_ready);
    let mut reported = HashSet::new();
    let mut bridge = eval(&media_bridge_script());

    loop {
        let report = match bridge.recv().await {
            Ok(value) => serde_json::from_value::<MediaReport>(value),
            Err(e) => {
                warn!("Media query bridge closed: {:?}", e);
                break;
            }
        };
        match report {
            Ok(report) => {
                debug!(query = %report.query, matches = report.matches, "Media query report");
                media.set(&report.query, report.matches);
                reported.insert(report.query);
            }
            Err(e) => warn!("Unreadable media query report: {}", e),
        }
        if reported.len() == 2 {
            if let Some(ready) = on_ready.take() {
                ready();
            }
        }
    }

    if let Some(ready) = on_ready.take() {
        ready();
    }
}
