/// HTTP listener serving the crawler artifacts.
///
/// Artifacts are regenerated from the current portfolio on every request, so a
/// `reload_projects` call through MCP is visible here immediately.
use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::AppError;
use crate::model::Portfolio;
use crate::{schema, sitemap};

pub type SharedPortfolio = Arc<RwLock<Portfolio>>;

pub fn router(state: SharedPortfolio) -> Router {
    Router::new()
        .route("/robots.txt", get(robots_txt))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/api/manifest.json", get(manifest_json))
        .with_state(state)
}

async fn robots_txt(State(state): State<SharedPortfolio>) -> impl IntoResponse {
    let portfolio = state.read().await;
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        sitemap::generate_robots_txt(portfolio.base_url()),
    )
}

async fn sitemap_xml(State(state): State<SharedPortfolio>) -> impl IntoResponse {
    let portfolio = state.read().await;
    (
        [(header::CONTENT_TYPE, "application/xml")],
        sitemap::generate_sitemap(&portfolio, portfolio.base_url()),
    )
}

async fn manifest_json(State(state): State<SharedPortfolio>) -> Json<serde_json::Value> {
    let portfolio = state.read().await;
    Json(schema::api_manifest(&portfolio, portfolio.base_url()))
}

/// Serve on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, state: SharedPortfolio) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    info!(listen_addr = %addr, "serving site artifacts over HTTP");
    axum::serve(listener, router(state))
        .await
        .map_err(|source| AppError::Serve { addr, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contact, Project, SiteIdentity, DEFAULT_RANKING};
    use crate::validation::{validate_robots_txt, validate_sitemap};
    use portfolio_common::http::{FetchClient, FetchClientConfig};

    fn portfolio() -> Portfolio {
        let project = Project {
            id: 12,
            ranking: DEFAULT_RANKING,
            title: "Twelve".to_string(),
            description: String::new(),
            technologies: vec!["Rust".to_string()],
            year: 2024,
            month: 3,
            duration: Some(4),
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
        };
        Portfolio {
            identity: SiteIdentity {
                name: "Ada".to_string(),
                title: String::new(),
                bio: String::new(),
                base_url: "https://example.com".to_string(),
                contact: Contact::default(),
            },
            projects: vec![project],
        }
    }

    #[tokio::test]
    async fn served_artifacts_pass_remote_checks() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let state = Arc::new(RwLock::new(portfolio()));
        tokio::spawn(serve(listener, state));

        let client = FetchClient::new(FetchClientConfig::default()).unwrap();
        let robots = validate_robots_txt(&client, &base).await;
        assert!(robots.passed, "{robots:?}");
        let sitemap = validate_sitemap(&client, &base).await;
        assert!(sitemap.passed, "{sitemap:?}");
        assert_eq!(sitemap.message, "sitemap.xml found with 6 URL(s)");

        let manifest = client
            .fetch_text(&format!("{base}/api/manifest.json"))
            .await
            .unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
        assert_eq!(manifest["projects"][0]["duration"], "4 weeks");
    }
}
