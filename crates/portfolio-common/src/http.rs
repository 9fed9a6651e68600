/// Plain-text HTTP fetcher used by the remote site checks.
///
/// Each fetch is a single GET with the configured timeout. There is no retry: a check
/// runs exactly once and a failure is reported to the caller as-is.
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::CommonError;

#[derive(Clone, Debug)]
pub struct FetchClientConfig {
    pub timeout: Duration,
    pub max_body_bytes: usize,
    pub user_agent: String,
}

impl Default for FetchClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_body_bytes: 1024 * 1024,
            user_agent: "portfolio-seo/validator".to_string(),
        }
    }
}

impl FetchClientConfig {
    /// Optional:
    /// - `PORTFOLIO_FETCH_TIMEOUT_SECS` (default: 10)
    /// - `PORTFOLIO_MAX_BODY_BYTES` (default: 1 MiB)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout = std::env::var("PORTFOLIO_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let max_body_bytes = std::env::var("PORTFOLIO_MAX_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_body_bytes);

        Self {
            timeout,
            max_body_bytes,
            ..defaults
        }
    }
}

#[derive(Clone)]
pub struct FetchClient {
    config: FetchClientConfig,
    http: reqwest::Client,
}

impl FetchClient {
    pub fn new(config: FetchClientConfig) -> Result<Self, CommonError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &FetchClientConfig {
        &self.config
    }

    /// GET `url` and return the body as text, truncated to `max_body_bytes`.
    ///
    /// Non-success statuses are errors, so a 404 page is never mistaken for content.
    pub async fn fetch_text(&self, url: &str) -> Result<String, CommonError> {
        debug!(url, "fetching");
        let resp = self
            .http
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "fetch returned non-success status");
            return Err(CommonError::Status {
                status,
                url: url.to_string(),
            });
        }

        let mut body = resp.bytes().await?;
        if body.len() > self.config.max_body_bytes {
            warn!(
                url,
                len = body.len(),
                limit = self.config.max_body_bytes,
                "response body truncated"
            );
            body.truncate(self.config.max_body_bytes);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
