/// schema.org JSON-LD documents for the site, and their injection into a page head.
///
/// Every generator takes the site origin explicitly. Optional fields are only emitted
/// when the project actually has a non-empty value for them.
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::model::{Portfolio, Project, SiteIdentity};
use crate::route::Route;

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Element id used by `inject_schema` when the caller has no specific one.
pub const DEFAULT_SCHEMA_ID: &str = "schema-markup";

pub const BREADCRUMB_SCHEMA_ID: &str = "breadcrumb-schema";

/// Element id of the JSON-LD block describing one project.
pub fn project_schema_id(project_id: u32) -> String {
    format!("project-schema-{project_id}")
}

fn author(identity: &SiteIdentity, origin: &str) -> Value {
    json!({
        "@type": "Person",
        "name": identity.name,
        "url": origin,
    })
}

/// `CreativeWork` document for a single project.
pub fn project_schema(project: &Project, identity: &SiteIdentity, origin: &str) -> Value {
    let url = Route::ProjectDetail(project.id).url(origin);

    let mut doc = Map::new();
    doc.insert("@context".into(), json!(SCHEMA_CONTEXT));
    doc.insert("@type".into(), json!("CreativeWork"));
    doc.insert("@id".into(), json!(url));
    doc.insert("name".into(), json!(project.title));
    doc.insert("description".into(), json!(project.description));
    doc.insert("url".into(), json!(url));
    doc.insert("author".into(), author(identity, origin));
    doc.insert("datePublished".into(), json!(project.date_published()));
    doc.insert("keywords".into(), json!(project.technologies.join(", ")));
    doc.insert(
        "about".into(),
        Value::Array(
            project
                .technologies
                .iter()
                .map(|tech| json!({"@type": "Thing", "name": tech}))
                .collect(),
        ),
    );

    if !project.role.is_empty() {
        doc.insert("jobTitle".into(), json!(project.role));
    }
    if !project.project_type.is_empty() {
        doc.insert("genre".into(), json!(project.project_type));
    }
    if let Some(weeks) = project.duration_weeks() {
        doc.insert("duration".into(), json!(format!("P{weeks}W")));
    }
    if let Some(outcomes) = project.outcomes.as_deref().filter(|o| !o.is_empty()) {
        let result: Vec<&str> = outcomes.iter().map(|o| o.text()).collect();
        doc.insert("result".into(), json!(result.join("; ")));
    }
    if let Some(links) = project.links.as_deref().filter(|l| !l.is_empty()) {
        let same_as: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        doc.insert("sameAs".into(), json!(same_as));
    }

    Value::Object(doc)
}

/// `BreadcrumbList` for the page at `route`.
///
/// Home is always first; project pages add "Projects", and a single project adds
/// "Project Details" after it.
pub fn breadcrumb_schema(route: Route, origin: &str) -> Value {
    let mut crumbs: Vec<(&str, String)> = vec![(Route::Home.label(), Route::Home.url(origin))];

    match route {
        Route::Projects => {
            crumbs.push((Route::Projects.label(), Route::Projects.url(origin)));
        }
        Route::ProjectDetail(_) => {
            crumbs.push((Route::Projects.label(), Route::Projects.url(origin)));
            crumbs.push((route.label(), route.url(origin)));
        }
        _ => {}
    }

    let items: Vec<Value> = crumbs
        .into_iter()
        .enumerate()
        .map(|(index, (name, url))| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": name,
                "item": url,
            })
        })
        .collect();

    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

/// `WebSite` document summarizing every project, served as `/api/manifest.json`.
pub fn api_manifest(portfolio: &Portfolio, origin: &str) -> Value {
    let identity = &portfolio.identity;
    let projects: Vec<Value> = portfolio
        .projects
        .iter()
        .map(|project| manifest_entry(project, origin))
        .collect();

    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "WebSite",
        "name": identity.name,
        "url": origin,
        "description": identity.bio,
        "author": author(identity, origin),
        "projects": projects,
    })
}

fn manifest_entry(project: &Project, origin: &str) -> Value {
    let url = Route::ProjectDetail(project.id).url(origin);

    let mut entry = Map::new();
    entry.insert("@type".into(), json!("CreativeWork"));
    entry.insert("@id".into(), json!(url));
    entry.insert("name".into(), json!(project.title));
    entry.insert("description".into(), json!(project.description));
    entry.insert("url".into(), json!(url));
    entry.insert("datePublished".into(), json!(project.date_published()));
    entry.insert("keywords".into(), json!(project.technologies.join(", ")));
    entry.insert("technologies".into(), json!(project.technologies));
    entry.insert("role".into(), json!(project.role));
    entry.insert("projectType".into(), json!(project.project_type));
    if let Some(weeks) = project.duration_weeks() {
        entry.insert("duration".into(), json!(format!("{weeks} weeks")));
    }
    if let Some(outcomes) = &project.outcomes {
        entry.insert("outcomes".into(), json!(outcomes));
    }
    if let Some(links) = &project.links {
        entry.insert("links".into(), json!(links));
    }
    Value::Object(entry)
}

/// Upsert a `<script type="application/ld+json" id="{id}">` block into the page head.
///
/// Any existing block with the same id is removed first, so calling this repeatedly
/// with one id leaves exactly one block carrying the latest document.
pub fn inject_schema(html: &str, document: &Value, id: &str) -> String {
    let attr_id = quick_xml::escape::escape(id);
    let existing = Regex::new(&format!(
        r#"(?is)<script\b[^>]*?\sid\s*=\s*["']{}["'][^>]*>.*?</script>[ \t]*\r?\n?"#,
        regex::escape(&attr_id)
    ))
    .expect("valid regex");
    let cleaned = existing.replace_all(html, "");

    // `</` inside a string literal would end the script element early.
    let payload = document.to_string().replace("</", "<\\/");
    let block = format!(r#"<script type="application/ld+json" id="{attr_id}">{payload}</script>"#);

    let head_close = Regex::new(r"(?i)</head\s*>").expect("valid regex");
    if let Some(m) = head_close.find(&cleaned) {
        let mut out = String::with_capacity(cleaned.len() + block.len() + 1);
        out.push_str(&cleaned[..m.start()]);
        out.push_str(&block);
        out.push('\n');
        out.push_str(&cleaned[m.start()..]);
        return out;
    }

    let html_open = Regex::new(r"(?i)<html\b[^>]*>").expect("valid regex");
    let head = format!("<head>{block}</head>");
    match html_open.find(&cleaned) {
        Some(m) => format!("{}{head}{}", &cleaned[..m.end()], &cleaned[m.end()..]),
        None => format!("{head}{cleaned}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChallengeEntry, Contact, Link, LinkKind, DEFAULT_RANKING};

    const ORIGIN: &str = "https://example.com";

    fn identity() -> SiteIdentity {
        SiteIdentity {
            name: "Ada Example".to_string(),
            title: "Engineer".to_string(),
            bio: "Builds things.".to_string(),
            base_url: ORIGIN.to_string(),
            contact: Contact::default(),
        }
    }

    fn minimal_project() -> Project {
        Project {
            id: 3,
            ranking: DEFAULT_RANKING,
            title: "Bar".to_string(),
            description: String::new(),
            technologies: vec!["Go".to_string()],
            year: 2022,
            month: 11,
            duration: None,
            role: String::new(),
            project_type: String::new(),
            infrastructure: None,
            skills_required: None,
            challenges_faced: None,
            outcomes: None,
            links: None,
            github_url: None,
            demo_url: None,
            achievement_log: None,
        }
    }

    fn full_project() -> Project {
        Project {
            id: 29,
            ranking: 1,
            title: "Foo".to_string(),
            technologies: vec!["Rust".to_string(), "Tokio".to_string()],
            year: 2023,
            month: 5,
            duration: Some(6),
            role: "Lead".to_string(),
            project_type: "Open Source".to_string(),
            outcomes: Some(vec![
                ChallengeEntry::PlainText("Shipped v1".to_string()),
                ChallengeEntry::Detailed {
                    name: "Cut latency".to_string(),
                    description: Some("by half".to_string()),
                },
            ]),
            links: Some(vec![Link {
                kind: LinkKind::Github,
                url: "https://github.com/a/foo".to_string(),
                label: None,
            }]),
            ..minimal_project()
        }
    }

    #[test]
    fn test_minimal_project_schema_omits_absent_fields() {
        let doc = project_schema(&minimal_project(), &identity(), ORIGIN);
        assert_eq!(doc["@type"], "CreativeWork");
        assert_eq!(doc["@id"], "https://example.com/#/projects/3");
        assert_eq!(doc["datePublished"], "2022-11-01");
        assert_eq!(doc["keywords"], "Go");
        assert_eq!(doc["about"][0], json!({"@type": "Thing", "name": "Go"}));
        assert_eq!(doc["author"]["name"], "Ada Example");

        let obj = doc.as_object().unwrap();
        for key in ["duration", "jobTitle", "genre", "result", "sameAs"] {
            assert!(!obj.contains_key(key), "unexpected key {key}");
        }
    }

    #[test]
    fn test_full_project_schema_includes_optional_fields() {
        let doc = project_schema(&full_project(), &identity(), ORIGIN);
        assert_eq!(doc["keywords"], "Rust, Tokio");
        assert_eq!(doc["jobTitle"], "Lead");
        assert_eq!(doc["genre"], "Open Source");
        assert_eq!(doc["duration"], "P6W");
        assert_eq!(doc["result"], "Shipped v1; Cut latency");
        assert_eq!(doc["sameAs"], json!(["https://github.com/a/foo"]));
    }

    #[test]
    fn test_empty_outcomes_and_links_are_omitted() {
        let project = Project {
            outcomes: Some(vec![]),
            links: Some(vec![]),
            ..minimal_project()
        };
        let doc = project_schema(&project, &identity(), ORIGIN);
        let obj = doc.as_object().unwrap();
        assert!(!obj.contains_key("result"));
        assert!(!obj.contains_key("sameAs"));
    }

    #[test]
    fn test_breadcrumbs_by_route() {
        let home = breadcrumb_schema(Route::Home, ORIGIN);
        assert_eq!(home["itemListElement"].as_array().unwrap().len(), 1);

        let about = breadcrumb_schema(Route::About, ORIGIN);
        assert_eq!(about["itemListElement"].as_array().unwrap().len(), 1);

        let projects = breadcrumb_schema(Route::Projects, ORIGIN);
        let items = projects["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["item"], "https://example.com/#/projects");

        let detail = breadcrumb_schema(Route::ProjectDetail(29), ORIGIN);
        let items = detail["itemListElement"].as_array().unwrap();
        let names: Vec<&str> = items.iter().map(|i| i["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Home", "Projects", "Project Details"]);
        let positions: Vec<u64> = items.iter().map(|i| i["position"].as_u64().unwrap()).collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(items[2]["item"], "https://example.com/#/projects/29");
    }

    #[test]
    fn test_api_manifest_summarizes_projects() {
        let portfolio = Portfolio {
            identity: identity(),
            projects: vec![full_project(), minimal_project()],
        };
        let manifest = api_manifest(&portfolio, ORIGIN);
        assert_eq!(manifest["@type"], "WebSite");
        assert_eq!(manifest["description"], "Builds things.");

        let projects = manifest["projects"].as_array().unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0]["duration"], "6 weeks");
        assert_eq!(projects[0]["outcomes"][0], "Shipped v1");
        assert_eq!(projects[0]["outcomes"][1]["name"], "Cut latency");
        assert_eq!(projects[0]["links"][0]["type"], "github");
        assert_eq!(projects[1]["technologies"], json!(["Go"]));
        let minimal = projects[1].as_object().unwrap();
        assert!(!minimal.contains_key("duration"));
        assert!(!minimal.contains_key("links"));
    }

    #[test]
    fn test_inject_schema_is_an_upsert() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        let id = project_schema_id(29);

        let once = inject_schema(html, &json!({"v": 1}), &id);
        let twice = inject_schema(&once, &json!({"v": 2}), &id);

        assert_eq!(twice.matches(r#"id="project-schema-29""#).count(), 1);
        assert!(twice.contains(r#"{"v":2}"#));
        assert!(!twice.contains(r#"{"v":1}"#));
        assert!(twice.find("application/ld+json").unwrap() < twice.find("</head>").unwrap());

        let other = inject_schema(&twice, &json!({"v": 3}), DEFAULT_SCHEMA_ID);
        assert_eq!(other.matches("application/ld+json").count(), 2);
    }

    #[test]
    fn test_inject_schema_escapes_script_close() {
        let html = "<html><head></head><body></body></html>";
        let out = inject_schema(html, &json!({"name": "</script><b>"}), DEFAULT_SCHEMA_ID);
        assert_eq!(out.matches("</script>").count(), 1);
        assert!(out.contains(r#"<\/script>"#));
    }

    #[test]
    fn test_inject_schema_without_head() {
        let out = inject_schema("<html><body></body></html>", &json!({}), "x");
        assert!(out.starts_with(r#"<html><head><script type="application/ld+json" id="x">"#));

        let bare = inject_schema("<p>hi</p>", &json!({}), "x");
        assert!(bare.starts_with("<head>"));
        assert!(bare.ends_with("<p>hi</p>"));
    }

    #[test]
    fn test_inject_schema_ignores_prefixed_id_attributes() {
        let html = r#"<html><head><script data-id="schema-markup" src="/app.js"></script></head></html>"#;
        let out = inject_schema(html, &json!({}), DEFAULT_SCHEMA_ID);
        assert!(out.contains(r#"<script data-id="schema-markup" src="/app.js"></script>"#));
        assert_eq!(out.matches("application/ld+json").count(), 1);

        let again = inject_schema(&out, &json!({"v": 2}), DEFAULT_SCHEMA_ID);
        assert!(again.contains("/app.js"));
        assert_eq!(again.matches("application/ld+json").count(), 1);
    }
}
