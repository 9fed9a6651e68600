/// The static files crawlers look for at the site root.
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::model::Portfolio;
use crate::schema;
use crate::sitemap;

pub const ROBOTS_PATH: &str = "robots.txt";
pub const SITEMAP_PATH: &str = "sitemap.xml";
pub const MANIFEST_PATH: &str = "api/manifest.json";

/// Generated crawler artifacts for one snapshot of the portfolio.
#[derive(Debug, Clone)]
pub struct SiteArtifacts {
    pub robots_txt: String,
    pub sitemap_xml: String,
    pub manifest: Value,
}

impl SiteArtifacts {
    pub fn build(portfolio: &Portfolio) -> Self {
        let base_url = portfolio.base_url();
        Self {
            robots_txt: sitemap::generate_robots_txt(base_url),
            sitemap_xml: sitemap::generate_sitemap(portfolio, base_url),
            manifest: schema::api_manifest(portfolio, base_url),
        }
    }

    pub fn manifest_json(&self) -> String {
        // Value serialization cannot fail: every map key is a string.
        serde_json::to_string_pretty(&self.manifest).unwrap_or_else(|_| self.manifest.to_string())
    }

    /// Write every artifact under `dir`, creating subdirectories as needed.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        let files = [
            (ROBOTS_PATH, self.robots_txt.clone()),
            (SITEMAP_PATH, self.sitemap_xml.clone()),
            (MANIFEST_PATH, self.manifest_json()),
        ];

        let mut written = Vec::with_capacity(files.len());
        for (rel, content) in files {
            let path = dir.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
            }
            std::fs::write(&path, content).map_err(|e| AppError::io(&path, e))?;
            info!(path = %path.display(), "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Contact, SiteIdentity};

    fn portfolio() -> Portfolio {
        Portfolio {
            identity: SiteIdentity {
                name: "Ada".to_string(),
                title: String::new(),
                bio: "Bio".to_string(),
                base_url: "https://example.com".to_string(),
                contact: Contact::default(),
            },
            projects: vec![],
        }
    }

    #[test]
    fn write_to_creates_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = SiteArtifacts::build(&portfolio());
        let written = artifacts.write_to(dir.path()).unwrap();
        assert_eq!(written.len(), 3);

        let robots = std::fs::read_to_string(dir.path().join(ROBOTS_PATH)).unwrap();
        assert!(robots.contains("Sitemap: https://example.com/sitemap.xml"));

        let manifest: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(MANIFEST_PATH)).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest["name"], "Ada");
        assert_eq!(manifest["projects"], serde_json::json!([]));

        let sitemap = std::fs::read_to_string(dir.path().join(SITEMAP_PATH)).unwrap();
        assert_eq!(sitemap.matches("<url>").count(), 5);
    }
}
