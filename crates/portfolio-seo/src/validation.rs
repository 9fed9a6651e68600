/// SEO and crawlability checks for a rendered page.
///
/// The page checks work on a `PageSnapshot`, a plain summary extracted from the parsed
/// HTML. The two remote checks fetch `robots.txt` and `sitemap.xml` from the site.
/// No check returns an error: every failure becomes a failed `ValidationResult`.
use std::collections::HashSet;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use quick_xml::events::Event;
use quick_xml::Reader;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use portfolio_common::http::FetchClient;

const SEMANTIC_ELEMENTS: &[&str] = &["header", "nav", "main", "section", "footer", "article"];
const META_NAMES: &[&str] = &["description", "viewport"];
const META_PROPERTIES: &[&str] = &["og:title", "og:description", "og:image"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub severity: Severity,
}

impl ValidationResult {
    fn new(name: impl Into<String>, passed: bool, message: impl Into<String>, on_fail: Severity) -> Self {
        Self {
            name: name.into(),
            passed,
            message: message.into(),
            severity: if passed { Severity::Info } else { on_fail },
        }
    }
}

/// What the checks need to know about a page, extracted once from its HTML.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    /// Raw text of every `<script type="application/ld+json">` block.
    pub json_ld_blocks: Vec<String>,
    /// Lower-cased `name` attributes of `<meta>` tags.
    pub meta_names: HashSet<String>,
    /// Lower-cased `property` attributes of `<meta>` tags.
    pub meta_properties: HashSet<String>,
    pub images: usize,
    pub images_with_alt: usize,
    pub h1_count: usize,
    pub semantic_count: usize,
}

impl PageSnapshot {
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        let mut snapshot = Self::default();

        let mut stack: Vec<Handle> = vec![dom.document.clone()];
        while let Some(node) = stack.pop() {
            if let NodeData::Element { name, attrs, .. } = &node.data {
                let attrs = attrs.borrow();
                let attr = |key: &str| {
                    attrs
                        .iter()
                        .find(|a| &*a.name.local == key)
                        .map(|a| a.value.to_string())
                };

                match &*name.local {
                    "script" => {
                        let is_json_ld = attr("type")
                            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
                        if is_json_ld {
                            snapshot.json_ld_blocks.push(text_content(&node));
                        }
                    }
                    "meta" => {
                        if let Some(n) = attr("name") {
                            snapshot.meta_names.insert(n.trim().to_ascii_lowercase());
                        }
                        if let Some(p) = attr("property") {
                            snapshot.meta_properties.insert(p.trim().to_ascii_lowercase());
                        }
                    }
                    "img" => {
                        snapshot.images += 1;
                        if attr("alt").is_some_and(|alt| !alt.is_empty()) {
                            snapshot.images_with_alt += 1;
                        }
                    }
                    "h1" => snapshot.h1_count += 1,
                    tag if SEMANTIC_ELEMENTS.contains(&tag) => snapshot.semantic_count += 1,
                    _ => {}
                }
            }

            let children = node.children.borrow();
            stack.extend(children.iter().rev().cloned());
        }

        snapshot
    }

    /// `@type` of every JSON-LD block that parses; malformed blocks are ignored.
    fn json_ld_types(&self) -> Vec<String> {
        self.json_ld_blocks
            .iter()
            .filter_map(|block| {
                serde_json::from_str::<serde_json::Value>(block)
                    .inspect_err(|e| debug!(error = %e, "ignoring malformed JSON-LD block"))
                    .ok()
            })
            .filter_map(|doc| doc.get("@type").and_then(|t| t.as_str()).map(str::to_string))
            .collect()
    }
}

fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    for child in node.children.borrow().iter() {
        if let NodeData::Text { contents } = &child.data {
            out.push_str(&contents.borrow());
        }
    }
    out
}

pub fn validate_schema_markup(page: &PageSnapshot) -> Vec<ValidationResult> {
    let count = page.json_ld_blocks.len();
    let has_person = page
        .json_ld_types()
        .iter()
        .any(|t| t == "Person" || t == "CreativeWork");

    vec![
        ValidationResult::new(
            "JSON-LD Schema",
            count > 0,
            format!("Found {count} JSON-LD schema(s)"),
            Severity::Error,
        ),
        ValidationResult::new(
            "Person/CreativeWork Schema",
            has_person,
            if has_person {
                "Person or CreativeWork schema found"
            } else {
                "No Person/CreativeWork schema found"
            },
            Severity::Warning,
        ),
    ]
}

pub fn validate_meta_tags(page: &PageSnapshot) -> Vec<ValidationResult> {
    let by_name = META_NAMES.iter().map(|&n| (n, page.meta_names.contains(n)));
    let by_property = META_PROPERTIES
        .iter()
        .map(|&p| (p, page.meta_properties.contains(p)));

    by_name
        .chain(by_property)
        .map(|(tag, found)| {
            ValidationResult::new(
                format!("Meta: {tag}"),
                found,
                if found {
                    format!("{tag} meta tag found")
                } else {
                    format!("{tag} meta tag missing")
                },
                Severity::Warning,
            )
        })
        .collect()
}

pub fn validate_accessibility(page: &PageSnapshot) -> Vec<ValidationResult> {
    vec![
        ValidationResult::new(
            "Image Alt Text",
            page.images_with_alt == page.images,
            format!("{}/{} images have alt text", page.images_with_alt, page.images),
            Severity::Warning,
        ),
        ValidationResult::new(
            "H1 Tags",
            page.h1_count > 0,
            format!("Found {} H1 tag(s)", page.h1_count),
            Severity::Warning,
        ),
        ValidationResult::new(
            "Semantic HTML",
            page.semantic_count > 0,
            format!("Found {} semantic element(s)", page.semantic_count),
            Severity::Warning,
        ),
    ]
}

/// All checks that only need the page itself, in report order.
pub fn validate_page(page: &PageSnapshot) -> Vec<ValidationResult> {
    let mut results = validate_schema_markup(page);
    results.extend(validate_meta_tags(page));
    results.extend(validate_accessibility(page));
    results
}

pub async fn validate_robots_txt(client: &FetchClient, base_url: &str) -> ValidationResult {
    let url = format!("{}/robots.txt", base_url.trim_end_matches('/'));
    match client.fetch_text(&url).await {
        Ok(content) => {
            let has_sitemap = content.contains("Sitemap:");
            let has_user_agent = content.contains("User-agent:");
            ValidationResult::new(
                "robots.txt",
                has_sitemap && has_user_agent,
                format!(
                    "robots.txt found with {} and {}",
                    if has_sitemap { "sitemap" } else { "no sitemap" },
                    if has_user_agent { "user-agent" } else { "no user-agent" },
                ),
                Severity::Warning,
            )
        }
        Err(e) => {
            warn!(url, error = %e, "robots.txt check failed");
            ValidationResult::new("robots.txt", false, "robots.txt not found", Severity::Error)
        }
    }
}

pub async fn validate_sitemap(client: &FetchClient, base_url: &str) -> ValidationResult {
    let url = format!("{}/sitemap.xml", base_url.trim_end_matches('/'));
    match client.fetch_text(&url).await {
        Ok(content) => {
            let url_count = count_sitemap_urls(&content);
            ValidationResult::new(
                "sitemap.xml",
                url_count > 0,
                format!("sitemap.xml found with {url_count} URL(s)"),
                Severity::Warning,
            )
        }
        Err(e) => {
            warn!(url, error = %e, "sitemap.xml check failed");
            ValidationResult::new("sitemap.xml", false, "sitemap.xml not found", Severity::Error)
        }
    }
}

/// Number of `<url>` elements, counted up to the first XML error.
pub fn count_sitemap_urls(content: &str) -> usize {
    let mut reader = Reader::from_str(content);
    let mut count = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"url" => count += 1,
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!(error = %e, urls = count, "sitemap XML error, stopping count");
                break;
            }
            _ => {}
        }
    }
    count
}

/// Page checks followed by the robots.txt and sitemap.xml checks.
///
/// The two fetches are independent and run concurrently.
pub async fn run_all_validations(
    page: &PageSnapshot,
    client: &FetchClient,
    base_url: &str,
) -> Vec<ValidationResult> {
    let mut results = validate_page(page);
    let (robots, sitemap) = futures::join!(
        validate_robots_txt(client, base_url),
        validate_sitemap(client, base_url)
    );
    results.push(robots);
    results.push(sitemap);
    results
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationSummary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl ValidationSummary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let count = |severity| results.iter().filter(|r| r.severity == severity).count();
        Self {
            total: results.len(),
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            infos: count(Severity::Info),
        }
    }
}

/// Human-readable report grouped by severity.
pub fn format_report(results: &[ValidationResult]) -> String {
    let mut out = String::from("=== SEO & Crawlability Validation ===\n");

    for (heading, severity) in [
        ("ERRORS", Severity::Error),
        ("WARNINGS", Severity::Warning),
        ("INFO", Severity::Info),
    ] {
        let group: Vec<&ValidationResult> =
            results.iter().filter(|r| r.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{heading}:\n"));
        for r in group {
            out.push_str(&format!("  - {}: {}\n", r.name, r.message));
        }
    }

    let summary = ValidationSummary::from_results(results);
    out.push_str(&format!(
        "\n=== Summary ===\nTotal: {} | Errors: {} | Warnings: {} | Info: {}\n",
        summary.total, summary.errors, summary.warnings, summary.infos
    ));
    out
}
