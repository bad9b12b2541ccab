// Client-side route allow-list and the static-host 404 redirect decoding.
use serde::{Deserialize, Serialize};
use site_shared::models::Service;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Home,
    Teaching,
    Performance,
    Collaboration,
    About,
    Contact,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Home,
        Route::Teaching,
        Route::Performance,
        Route::Collaboration,
        Route::About,
        Route::Contact,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Teaching => "/teaching",
            Route::Performance => "/performance",
            Route::Collaboration => "/collaboration",
            Route::About => "/about",
            Route::Contact => "/contact",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Teaching => "Lessons",
            Route::Performance => "Performance",
            Route::Collaboration => "Collaboration",
            Route::About => "About",
            Route::Contact => "Contact",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        Route::ALL.iter().copied().find(|r| r.path() == path)
    }

    /// The service a page sells, if any.
    pub fn service(&self) -> Option<Service> {
        match self {
            Route::Teaching => Some(Service::Teaching),
            Route::Performance => Some(Service::Performance),
            Route::Collaboration => Some(Service::Collaboration),
            _ => None,
        }
    }
}

impl From<Service> for Route {
    fn from(service: Service) -> Self {
        match service {
            Service::Teaching => Route::Teaching,
            Service::Performance => Route::Performance,
            Service::Collaboration => Route::Collaboration,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(Route),
    Redirect { from: String, to: Route },
}

impl Resolution {
    pub fn route(&self) -> Route {
        match self {
            Resolution::Matched(route) => *route,
            Resolution::Redirect { to, .. } => *to,
        }
    }
}

fn normalize(path: &str) -> &str {
    let end = path.find(|c: char| c == '?' || c == '#').unwrap_or(path.len());
    let path = path[..end].trim();
    match path.strip_suffix('/') {
        Some("") | None => path,
        Some(stripped) => stripped,
    }
}

/// Unknown paths redirect home.
pub fn resolve(path: &str) -> Resolution {
    let normalized = normalize(path);
    let normalized = if normalized.is_empty() { "/" } else { normalized };
    match Route::from_path(normalized) {
        Some(route) => Resolution::Matched(route),
        None => {
            debug!(path, "unknown route, redirecting home");
            Resolution::Redirect {
                from: path.to_string(),
                to: Route::Home,
            }
        }
    }
}

/// Decodes `?/teaching&utm=x~and~y=z` into `/teaching?utm=x&y=z`. Returns `None` when the
/// search string doesn't carry a redirected path.
pub fn decode_static_redirect(search: &str) -> Option<String> {
    let encoded = search.strip_prefix('?').unwrap_or(search);
    if !encoded.starts_with('/') {
        return None;
    }
    let parts: Vec<String> = encoded.split('&').map(|part| part.replace("~and~", "&")).collect();
    let (path, query) = parts.split_first()?;
    if query.is_empty() {
        Some(path.clone())
    } else {
        Some(format!("{}?{}", path, query.join("&")))
    }
}

/// Inverse of [`decode_static_redirect`], as the 404 page would produce it.
pub fn encode_static_redirect(path: &str, query: Option<&str>) -> String {
    let mut encoded = format!("?{}", path.replace('&', "~and~"));
    if let Some(query) = query.map(|q| q.trim_start_matches('?')).filter(|q| !q.is_empty()) {
        encoded.push('&');
        encoded.push_str(&query.replace('&', "~and~"));
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_match() {
        assert_eq!(resolve("/"), Resolution::Matched(Route::Home));
        assert_eq!(resolve("/teaching"), Resolution::Matched(Route::Teaching));
        assert_eq!(resolve("/contact/"), Resolution::Matched(Route::Contact));
        assert_eq!(resolve("/about?ref=nav#bio"), Resolution::Matched(Route::About));
        assert_eq!(resolve(""), Resolution::Matched(Route::Home));
    }

    #[test]
    fn unknown_paths_redirect_home() {
        let resolution = resolve("/admin");
        assert_eq!(
            resolution,
            Resolution::Redirect { from: "/admin".into(), to: Route::Home }
        );
        assert_eq!(resolution.route(), Route::Home);
        assert_eq!(resolve("/Teaching").route(), Route::Home);
    }

    #[test]
    fn service_routes_round_trip() {
        for service in Service::ALL {
            let route = Route::from(service);
            assert_eq!(route.service(), Some(service));
            assert_eq!(route.path(), service.path());
        }
        assert_eq!(Route::About.service(), None);
    }

    #[test]
    fn decodes_static_host_redirects() {
        assert_eq!(decode_static_redirect("?/teaching").as_deref(), Some("/teaching"));
        assert_eq!(
            decode_static_redirect("?/performance&utm=mail~and~ref=x").as_deref(),
            Some("/performance?utm=mail&ref=x")
        );
        assert_eq!(decode_static_redirect("?utm=mail"), None);
        assert_eq!(decode_static_redirect(""), None);
    }

    #[test]
    fn encoder_matches_decoder() {
        let encoded = encode_static_redirect("/performance", Some("utm=mail&ref=x"));
        assert_eq!(encoded, "?/performance&utm=mail~and~ref=x");
        assert_eq!(decode_static_redirect(&encoded).as_deref(), Some("/performance?utm=mail&ref=x"));
    }
}
