/// Crawler-facing text artifacts: `sitemap.xml` and `robots.txt`.
use std::fmt::Write;

use quick_xml::escape::escape;

use crate::model::Portfolio;
use crate::route::Route;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const FEATURED_PRIORITY: &str = "0.8";
const PROJECT_PRIORITY: &str = "0.6";
const PROJECT_CHANGEFREQ: &str = "monthly";

/// Crawlers explicitly allowed after the wildcard block.
pub const NAMED_CRAWLERS: &[&str] = &["Googlebot", "Bingbot", "ChatGPT-User", "GPTBot", "CCBot"];

const DISALLOWED_PATHS: &[&str] = &["/admin/", "/private/"];

/// One `<url>` entry of the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub priority: &'static str,
    pub changefreq: &'static str,
}

fn page_hints(route: Route) -> (&'static str, &'static str) {
    match route {
        Route::Home => ("1.0", "monthly"),
        Route::About => ("0.9", "monthly"),
        Route::Projects => ("0.9", "weekly"),
        Route::Certificates => ("0.7", "monthly"),
        Route::Contact => ("0.8", "monthly"),
        Route::ProjectDetail(_) => (PROJECT_PRIORITY, PROJECT_CHANGEFREQ),
    }
}

/// Top-level pages followed by one entry per project, in display order.
pub fn sitemap_entries(portfolio: &Portfolio, base_url: &str) -> Vec<SitemapEntry> {
    let pages = Route::PAGES.iter().map(|&route| {
        let (priority, changefreq) = page_hints(route);
        SitemapEntry {
            loc: page_loc(route, base_url),
            priority,
            changefreq,
        }
    });

    let projects = portfolio.projects.iter().map(|project| SitemapEntry {
        loc: page_loc(Route::ProjectDetail(project.id), base_url),
        priority: if project.is_featured() {
            FEATURED_PRIORITY
        } else {
            PROJECT_PRIORITY
        },
        changefreq: PROJECT_CHANGEFREQ,
    });

    pages.chain(projects).collect()
}

// Sitemap locations keep the trailing slash on the home page.
fn page_loc(route: Route, base_url: &str) -> String {
    match route {
        Route::Home => format!("{base_url}/"),
        other => other.url(base_url),
    }
}

/// Render `sitemap.xml`.
pub fn generate_sitemap(portfolio: &Portfolio, base_url: &str) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{SITEMAP_NAMESPACE}\">");

    for entry in sitemap_entries(portfolio, base_url) {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape(entry.loc.as_str()));
        let _ = writeln!(xml, "    <priority>{}</priority>", entry.priority);
        let _ = writeln!(xml, "    <changefreq>{}</changefreq>", entry.changefreq);
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>");
    xml
}

/// Render `robots.txt`.
pub fn generate_robots_txt(base_url: &str) -> String {
    let mut txt = String::new();
    txt.push_str("User-agent: *\n");
    txt.push_str("Allow: /\n");
    txt.push_str("Allow: /#/\n");
    let _ = writeln!(txt, "Sitemap: {base_url}/sitemap.xml");
    let _ = writeln!(txt, "Sitemap: {base_url}/api/manifest.json");
    txt.push('\n');

    txt.push_str("# Disallow private/admin areas\n");
    for path in DISALLOWED_PATHS {
        let _ = writeln!(txt, "Disallow: {path}");
    }
    txt.push('\n');

    txt.push_str("# Allow specific crawlers\n");
    let blocks: Vec<String> = NAMED_CRAWLERS
        .iter()
        .map(|agent| format!("User-agent: {agent}\nAllow: /\n"))
        .collect();
    txt.push_str(&blocks.join("\n"));
    txt
}
