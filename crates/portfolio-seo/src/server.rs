/// MCP server implementation for the portfolio SEO tooling.
///
/// Exposes tools for:
/// - browsing projects: `list_projects`, `list_featured_projects`, `list_other_projects`,
///   `get_project`
/// - structured data: `project_schema`, `breadcrumb_schema`, `api_manifest`, `inject_schema`
/// - crawler files: `generate_sitemap`, `generate_robots_txt`
/// - checks: `validate_page`
/// - maintenance: `reload_projects`
use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::loader;
use crate::model::Project;
use crate::route::Route;
use crate::schema;
use crate::site::SharedPortfolio;
use crate::sitemap;
use crate::validation::{self, PageSnapshot, ValidationResult, ValidationSummary};
use portfolio_common::http::FetchClient;
use portfolio_common::mcp_api::{
    BreadcrumbParams, HtmlResponse, InjectSchemaParams, JsonLdResponse, ProjectIdParams,
    ProjectListResponse, ProjectSummary, ReloadProjectsResponse, TextArtifactResponse,
    ValidatePageParams,
};

#[derive(Debug, Serialize, JsonSchema)]
struct ValidationReportResponse {
    results: Vec<ValidationResult>,
    summary: ValidationSummary,
    /// Plain-text report grouped by severity.
    report: String,
}

#[derive(Clone)]
pub struct PortfolioServer {
    state: SharedPortfolio,
    fetch: FetchClient,
    config: Config,
    tool_router: ToolRouter<PortfolioServer>,
}

impl PortfolioServer {
    pub fn new(state: SharedPortfolio, fetch: FetchClient, config: Config) -> Self {
        Self {
            state,
            fetch,
            config,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl PortfolioServer {
    #[tool(description = "List all projects in display order (ranking ascending, then ID).")]
    async fn list_projects(&self) -> Result<Json<ProjectListResponse>, String> {
        let state = self.state.read().await;
        Ok(Json(summarize(&state.projects)))
    }

    #[tool(description = "List featured projects (ranking 1-4) in display order.")]
    async fn list_featured_projects(&self) -> Result<Json<ProjectListResponse>, String> {
        let state = self.state.read().await;
        Ok(Json(summarize(loader::featured_projects(&state.projects))))
    }

    #[tool(description = "List non-featured projects (ranking above 4, including unranked) in display order.")]
    async fn list_other_projects(&self) -> Result<Json<ProjectListResponse>, String> {
        let state = self.state.read().await;
        Ok(Json(summarize(loader::other_projects(&state.projects))))
    }

    #[tool(description = "Get the full normalized record of a project by numeric ID.")]
    async fn get_project(
        &self,
        Parameters(params): Parameters<ProjectIdParams>,
    ) -> Result<Json<Project>, String> {
        let state = self.state.read().await;
        state
            .project(params.project_id)
            .cloned()
            .map(Json)
            .ok_or_else(|| AppError::NotFound(params.project_id).to_string())
    }

    #[tool(description = "Generate the schema.org CreativeWork JSON-LD document for a project.")]
    async fn project_schema(
        &self,
        Parameters(params): Parameters<ProjectIdParams>,
    ) -> Result<Json<JsonLdResponse>, String> {
        let state = self.state.read().await;
        let project = state
            .project(params.project_id)
            .ok_or_else(|| AppError::NotFound(params.project_id).to_string())?;
        let document = schema::project_schema(project, &state.identity, state.base_url());
        Ok(Json(JsonLdResponse {
            document,
            script_id: schema::project_schema_id(project.id),
        }))
    }

    #[tool(description = "Generate the schema.org BreadcrumbList JSON-LD document for a hash route such as '/', '/projects' or '/projects/29'.")]
    async fn breadcrumb_schema(
        &self,
        Parameters(params): Parameters<BreadcrumbParams>,
    ) -> Result<Json<JsonLdResponse>, String> {
        let route = Route::from_hash(&params.route);
        let state = self.state.read().await;
        let document = schema::breadcrumb_schema(route, state.base_url());
        Ok(Json(JsonLdResponse {
            document,
            script_id: schema::BREADCRUMB_SCHEMA_ID.to_string(),
        }))
    }

    #[tool(description = "Generate the site-wide API manifest (WebSite document summarizing every project), as served at /api/manifest.json.")]
    async fn api_manifest(&self) -> Result<Json<JsonLdResponse>, String> {
        let state = self.state.read().await;
        let document = schema::api_manifest(&state, state.base_url());
        Ok(Json(JsonLdResponse {
            document,
            script_id: schema::DEFAULT_SCHEMA_ID.to_string(),
        }))
    }

    #[tool(description = "Generate sitemap.xml listing the top-level pages and every project.")]
    async fn generate_sitemap(&self) -> Result<Json<TextArtifactResponse>, String> {
        let state = self.state.read().await;
        Ok(Json(TextArtifactResponse {
            content_type: "application/xml".to_string(),
            content: sitemap::generate_sitemap(&state, state.base_url()),
        }))
    }

    #[tool(description = "Generate robots.txt for the site.")]
    async fn generate_robots_txt(&self) -> Result<Json<TextArtifactResponse>, String> {
        let state = self.state.read().await;
        Ok(Json(TextArtifactResponse {
            content_type: "text/plain".to_string(),
            content: sitemap::generate_robots_txt(state.base_url()),
        }))
    }

    #[tool(description = "Insert or replace a JSON-LD script block with the given element id in the <head> of an HTML document.")]
    async fn inject_schema(
        &self,
        Parameters(params): Parameters<InjectSchemaParams>,
    ) -> Result<Json<HtmlResponse>, String> {
        let id = params
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(schema::DEFAULT_SCHEMA_ID);
        Ok(Json(HtmlResponse {
            html: schema::inject_schema(&params.html, &params.schema, id),
        }))
    }

    #[tool(description = "Run the SEO and crawlability checklist against rendered HTML: JSON-LD, meta tags, image alt text, headings, semantic elements, and (unless remote=false) the site's robots.txt and sitemap.xml.")]
    async fn validate_page(
        &self,
        Parameters(params): Parameters<ValidatePageParams>,
    ) -> Result<Json<ValidationReportResponse>, String> {
        if params.html.trim().is_empty() {
            return Err("html must not be empty".to_string());
        }

        let page = PageSnapshot::parse(&params.html);
        let results = if params.remote.unwrap_or(true) {
            let base_url = match params.base_url {
                Some(url) => url.trim().trim_end_matches('/').to_string(),
                None => self.state.read().await.base_url().to_string(),
            };
            validation::run_all_validations(&page, &self.fetch, &base_url).await
        } else {
            validation::validate_page(&page)
        };

        let summary = ValidationSummary::from_results(&results);
        info!(
            total = summary.total,
            errors = summary.errors,
            warnings = summary.warnings,
            "page validated"
        );
        Ok(Json(ValidationReportResponse {
            report: validation::format_report(&results),
            summary,
            results,
        }))
    }

    #[tool(description = "Re-read site.json and the project files from the data directory and replace the in-memory data set.")]
    async fn reload_projects(&self) -> Result<Json<ReloadProjectsResponse>, String> {
        info!("reload_projects tool invoked");

        let portfolio =
            loader::load_portfolio(&self.config).map_err(|e| format!("reload failed: {e}"))?;
        let response = ReloadProjectsResponse {
            project_count: portfolio.projects.len(),
            featured_count: loader::featured_projects(&portfolio.projects).len(),
        };

        *self.state.write().await = portfolio;
        info!(projects = response.project_count, "in-memory portfolio replaced");
        Ok(Json(response))
    }
}

fn summarize<'a>(projects: impl IntoIterator<Item = &'a Project>) -> ProjectListResponse {
    ProjectListResponse {
        projects: projects
            .into_iter()
            .map(|project| ProjectSummary {
                id: project.id,
                ranking: project.ranking,
                title: project.title.clone(),
                year: project.year,
                month: project.month,
                featured: project.is_featured(),
            })
            .collect(),
    }
}

#[tool_handler]
impl ServerHandler for PortfolioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "portfolio-seo".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Portfolio SEO MCP server. Use list_projects / get_project to browse the \
                 portfolio data, project_schema / breadcrumb_schema / api_manifest for JSON-LD, \
                 generate_sitemap / generate_robots_txt for crawler files, inject_schema to embed \
                 JSON-LD into a page, validate_page to audit rendered HTML, and reload_projects \
                 after editing the data directory."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::RwLock;

    use super::*;
    use crate::model::{Contact, Portfolio, SiteIdentity, DEFAULT_RANKING};
    use portfolio_common::http::FetchClientConfig;

    fn project(id: u32, ranking: u32) -> Project {
        Project {
            id,
            ranking,
            title: format!("Project {id}"),
            description: String::new(),
            technologies: vec!["Rust".to_string()],
            year: 2024,
            month: 2,
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

    fn server() -> PortfolioServer {
        let portfolio = Portfolio {
            identity: SiteIdentity {
                name: "Ada".to_string(),
                title: String::new(),
                bio: String::new(),
                base_url: "https://example.com".to_string(),
                contact: Contact::default(),
            },
            projects: vec![project(29, 1), project(7, DEFAULT_RANKING)],
        };
        let config = Config {
            data_path: "./data/portfolio".to_string(),
            base_url_override: None,
            export_dir: None,
            http_listen_addr: None,
            mcp_tcp_listen_addr: None,
        };
        PortfolioServer::new(
            Arc::new(RwLock::new(portfolio)),
            FetchClient::new(FetchClientConfig::default()).unwrap(),
            config,
        )
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = PortfolioServer::tool_router().list_all();
        for name in [
            "list_projects",
            "list_featured_projects",
            "list_other_projects",
            "get_project",
            "project_schema",
            "breadcrumb_schema",
            "api_manifest",
            "generate_sitemap",
            "generate_robots_txt",
            "inject_schema",
            "validate_page",
            "reload_projects",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[tokio::test]
    async fn featured_and_other_lists_split_projects() {
        let server = server();
        let Json(featured) = server.list_featured_projects().await.unwrap();
        let Json(other) = server.list_other_projects().await.unwrap();
        assert_eq!(featured.projects.len(), 1);
        assert_eq!(featured.projects[0].id, 29);
        assert!(featured.projects[0].featured);
        assert_eq!(other.projects[0].id, 7);
    }

    #[tokio::test]
    async fn project_schema_carries_its_script_id() {
        let Json(response) = server()
            .project_schema(Parameters(ProjectIdParams { project_id: 29 }))
            .await
            .unwrap();
        assert_eq!(response.document["@type"], "CreativeWork");
        assert_eq!(response.script_id, "project-schema-29");
    }

    #[tokio::test]
    async fn unknown_project_is_reported() {
        let err = server()
            .get_project(Parameters(ProjectIdParams { project_id: 99 }))
            .await
            .err()
            .unwrap();
        assert_eq!(err, "project not found: 99");
    }

    #[tokio::test]
    async fn breadcrumb_tool_parses_routes() {
        let Json(response) = server()
            .breadcrumb_schema(Parameters(BreadcrumbParams {
                route: "/projects/29".to_string(),
            }))
            .await
            .unwrap();
        let items = response.document["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(response.script_id, "breadcrumb-schema");
    }

    #[tokio::test]
    async fn validate_page_without_remote_checks() {
        let Json(report) = server()
            .validate_page(Parameters(ValidatePageParams {
                html: "<html><body><h1>Hi</h1></body></html>".to_string(),
                base_url: None,
                remote: Some(false),
            }))
            .await
            .unwrap();
        assert_eq!(report.results.len(), 10);
        assert_eq!(report.summary.errors, 1);
        assert!(report.report.contains("ERRORS:\n  - JSON-LD Schema"));
    }
}
