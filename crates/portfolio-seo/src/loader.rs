/// Loader for per-project JSON files.
///
/// Filenames carry the project identity:
/// - `X{id}.{ext}`: legacy form, unranked
/// - `{id}_{ranking}.json`: ranked
/// - `{id}.json`: unranked
///
/// An `id` / `ranking` field inside the record overrides the filename, so files can
/// be renamed freely once they carry their identity explicitly. Anything that can't
/// be turned into a `Project` is skipped with a warning; loading never fails because
/// of a single bad file.
use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::model::{Portfolio, Project, ProjectSource, SiteIdentity, DEFAULT_RANKING};

/// Identity recovered from a project filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileKey {
    pub id: u32,
    pub ranking: Option<u32>,
}

struct FilenamePatterns {
    legacy: Regex,
    ranked: Regex,
    plain: Regex,
}

impl FilenamePatterns {
    fn new() -> Self {
        Self {
            legacy: Regex::new(r"^X(\d+)\.").expect("valid regex"),
            ranked: Regex::new(r"^(\d+)_(\d+)\.json$").expect("valid regex"),
            plain: Regex::new(r"^(\d+)\.json$").expect("valid regex"),
        }
    }

    fn parse(&self, filename: &str) -> Option<FileKey> {
        if let Some(caps) = self.legacy.captures(filename) {
            return Some(FileKey {
                id: caps[1].parse().ok()?,
                ranking: None,
            });
        }
        if let Some(caps) = self.ranked.captures(filename) {
            return Some(FileKey {
                id: caps[1].parse().ok()?,
                ranking: Some(caps[2].parse().ok()?),
            });
        }
        if let Some(caps) = self.plain.captures(filename) {
            return Some(FileKey {
                id: caps[1].parse().ok()?,
                ranking: None,
            });
        }
        None
    }
}

/// An explicit `id` / `ranking` is honored only as a non-negative integer that fits a `u32`.
fn explicit_u32(filename: &str, field: &'static str, value: Option<&Value>) -> Option<u32> {
    let value = value?;
    let parsed = value.as_u64().and_then(|n| u32::try_from(n).ok());
    if parsed.is_none() {
        warn!(filename, field, value = %value, "unusable explicit field, using the filename");
    }
    parsed
}

/// Normalize `(filename, parsed JSON)` pairs into projects ordered by `(ranking, id)`.
///
/// Entries are visited in filename order, so when two files claim the same id the
/// lexicographically first one is kept.
pub fn load_projects<I>(entries: I) -> Vec<Project>
where
    I: IntoIterator<Item = (String, Value)>,
{
    let patterns = FilenamePatterns::new();

    let mut entries: Vec<(String, Value)> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut seen: HashSet<u32> = HashSet::new();
    let mut projects: Vec<Project> = Vec::new();

    for (filename, value) in entries {
        if !value.is_object() {
            warn!(filename, "project file is not a JSON object, skipping");
            continue;
        }

        let source: ProjectSource = match serde_json::from_value(value) {
            Ok(source) => source,
            Err(e) => {
                warn!(filename, error = %e, "malformed project file, skipping");
                continue;
            }
        };

        let key = patterns.parse(&filename);
        let explicit_id = explicit_u32(&filename, "id", source.id.as_ref());
        let explicit_ranking = explicit_u32(&filename, "ranking", source.ranking.as_ref());
        let Some(id) = explicit_id.or(key.map(|k| k.id)) else {
            debug!(filename, "filename carries no project id, skipping");
            continue;
        };
        let ranking = explicit_ranking
            .or(key.and_then(|k| k.ranking))
            .unwrap_or(DEFAULT_RANKING);

        if !seen.insert(id) {
            warn!(filename, id, "duplicate project id, keeping the first file");
            continue;
        }

        projects.push(Project::from_source(id, ranking, source));
    }

    projects.sort_by_key(|p| (p.ranking, p.id));
    projects
}

/// Read every `*.json` file directly inside `dir` and load them as projects.
///
/// Unreadable or unparseable files are skipped; only a missing directory is an error.
pub fn load_projects_dir(dir: &Path) -> Result<Vec<Project>, AppError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| AppError::io(dir, e))?;

    let mut entries: Vec<(String, Value)> = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()).map(str::to_string)
        else {
            continue;
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read project file, skipping");
                continue;
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(value) => entries.push((filename, value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid JSON in project file, skipping");
            }
        }
    }

    let projects = load_projects(entries);
    info!(
        dir = %dir.display(),
        projects = projects.len(),
        featured = featured_projects(&projects).len(),
        "loaded projects"
    );
    Ok(projects)
}

/// Projects ranked 1 through 4, in display order.
pub fn featured_projects(projects: &[Project]) -> Vec<&Project> {
    projects.iter().filter(|p| p.is_featured()).collect()
}

/// Everything that isn't featured, unranked projects included, in display order.
pub fn other_projects(projects: &[Project]) -> Vec<&Project> {
    projects.iter().filter(|p| !p.is_featured()).collect()
}

/// Build the site data set from the configured data directory.
pub fn load_portfolio(config: &Config) -> Result<Portfolio, AppError> {
    let site_path = config.site_file_path();
    let content = std::fs::read_to_string(&site_path).map_err(|e| AppError::io(&site_path, e))?;
    let mut identity: SiteIdentity =
        serde_json::from_str(&content).map_err(|source| AppError::SiteData {
            path: site_path.clone(),
            source,
        })?;

    if let Some(base_url) = &config.base_url_override {
        identity.base_url = base_url.clone();
    }
    identity.base_url = identity.base_url.trim_end_matches('/').to_string();

    let projects = load_projects_dir(&config.projects_dir())?;
    Ok(Portfolio { identity, projects })
}
