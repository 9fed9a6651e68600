use std::fmt;

/// A page of the single-page site, addressed by hash fragment (`/#/projects/12`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Projects,
    Certificates,
    Contact,
    ProjectDetail(u32),
}

impl Route {
    /// Top-level pages, in navigation order.
    pub const PAGES: [Route; 5] = [
        Route::Home,
        Route::About,
        Route::Projects,
        Route::Certificates,
        Route::Contact,
    ];

    /// Parse a hash path such as `/projects/12`, `#/about` or `/#/contact`.
    /// Unknown paths resolve to `Home`.
    pub fn from_hash(hash: &str) -> Self {
        let path = hash.trim().trim_start_matches('/').trim_start_matches('#');
        let path = path.trim_matches('/');

        match path {
            "" => Route::Home,
            "about" => Route::About,
            "projects" => Route::Projects,
            "certificates" => Route::Certificates,
            "contact" => Route::Contact,
            other => other
                .strip_prefix("projects/")
                .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|id| id.parse().ok())
                .map(Route::ProjectDetail)
                .unwrap_or(Route::Home),
        }
    }

    /// Hash path without the leading `#`, e.g. `/projects/12`.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::Certificates => "/certificates".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::ProjectDetail(id) => format!("/projects/{id}"),
        }
    }

    /// Absolute URL of the page under `origin`. Home is the bare origin.
    pub fn url(&self, origin: &str) -> String {
        match self {
            Route::Home => origin.to_string(),
            other => format!("{origin}/#{}", other.path()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::About => "About",
            Route::Projects => "Projects",
            Route::Certificates => "Certificates",
            Route::Contact => "Contact",
            Route::ProjectDetail(_) => "Project Details",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::from_hash("/"), Route::Home);
        assert_eq!(Route::from_hash(""), Route::Home);
        assert_eq!(Route::from_hash("/about"), Route::About);
        assert_eq!(Route::from_hash("#/projects"), Route::Projects);
        assert_eq!(Route::from_hash("/#/certificates"), Route::Certificates);
        assert_eq!(Route::from_hash("/contact/"), Route::Contact);
        assert_eq!(Route::from_hash("/projects/12"), Route::ProjectDetail(12));
    }

    #[test]
    fn unknown_paths_fall_back_to_home() {
        assert_eq!(Route::from_hash("/blog"), Route::Home);
        assert_eq!(Route::from_hash("/projects/abc"), Route::Home);
        assert_eq!(Route::from_hash("/projects/"), Route::Projects);
        assert_eq!(Route::from_hash("/projects/-1"), Route::Home);
    }

    #[test]
    fn urls_use_hash_routing() {
        let origin = "https://example.com";
        assert_eq!(Route::Home.url(origin), "https://example.com");
        assert_eq!(Route::Projects.url(origin), "https://example.com/#/projects");
        assert_eq!(
            Route::ProjectDetail(7).url(origin),
            "https://example.com/#/projects/7"
        );
        assert_eq!(Route::from_hash(&Route::ProjectDetail(7).path()), Route::ProjectDetail(7));
    }
}
