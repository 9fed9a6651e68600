use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProjectIdParams {
    /// Numeric project ID, e.g. 29.
    pub project_id: u32,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BreadcrumbParams {
    /// Hash route of the current page, e.g. "/", "/projects" or "/projects/29".
    pub route: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InjectSchemaParams {
    /// Full HTML document to modify.
    pub html: String,
    /// JSON-LD document to embed.
    pub schema: serde_json::Value,
    /// Element id of the script block (default: "schema-markup").
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ValidatePageParams {
    /// Rendered HTML of the page to inspect.
    pub html: String,
    /// Site origin used for the robots.txt and sitemap.xml fetches.
    /// Defaults to the configured base URL.
    pub base_url: Option<String>,
    /// Skip the robots.txt and sitemap.xml fetches when false (default: true).
    pub remote: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectSummary {
    pub id: u32,
    pub ranking: u32,
    pub title: String,
    pub year: i32,
    pub month: u32,
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JsonLdResponse {
    pub document: serde_json::Value,
    /// Element id to pass to `inject_schema` for this document.
    pub script_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextArtifactResponse {
    /// MIME type the artifact is served with.
    pub content_type: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HtmlResponse {
    pub html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReloadProjectsResponse {
    pub project_count: usize,
    pub featured_count: usize,
}
