use std::path::{Path, PathBuf};

use crate::error::AppError;

const SITE_FILE: &str = "site.json";
const PROJECTS_DIR: &str = "projects";

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `site.json` and the `projects/` folder.
    pub data_path: String,
    /// Overrides the `base_url` recorded in `site.json` (e.g. for staging deploys).
    pub base_url_override: Option<String>,
    /// When set, artifacts are written here and the process exits.
    pub export_dir: Option<PathBuf>,
    /// When set, robots.txt / sitemap.xml / manifest are served over HTTP on this address.
    pub http_listen_addr: Option<String>,
    /// When set, MCP is served over TCP instead of stdio.
    pub mcp_tcp_listen_addr: Option<String>,
}

impl Config {
    /// Required:
    /// - `PORTFOLIO_DATA_PATH`: directory containing `site.json` and `projects/*.json`
    ///
    /// Optional:
    /// - `PORTFOLIO_BASE_URL`
    /// - `PORTFOLIO_EXPORT_DIR`
    /// - `PORTFOLIO_HTTP_LISTEN_ADDR`
    /// - `MCP_TCP_LISTEN_ADDR`
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let data_path = lookup("PORTFOLIO_DATA_PATH").ok_or_else(|| {
            AppError::Config("PORTFOLIO_DATA_PATH environment variable is required".to_string())
        })?;

        let site_file = Path::new(&data_path).join(SITE_FILE);
        if !site_file.exists() {
            return Err(AppError::Config(format!(
                "required file not found: {}",
                site_file.display()
            )));
        }

        let base_url_override = lookup("PORTFOLIO_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            data_path,
            base_url_override,
            export_dir: lookup("PORTFOLIO_EXPORT_DIR").map(PathBuf::from),
            http_listen_addr: lookup("PORTFOLIO_HTTP_LISTEN_ADDR"),
            mcp_tcp_listen_addr: lookup("MCP_TCP_LISTEN_ADDR"),
        })
    }

    pub fn site_file_path(&self) -> PathBuf {
        Path::new(&self.data_path).join(SITE_FILE)
    }

    pub fn projects_dir(&self) -> PathBuf {
        Path::new(&self.data_path).join(PROJECTS_DIR)
    }
}
