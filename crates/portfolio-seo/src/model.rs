use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ranking given to projects that don't declare one. Sorts after every ranked project.
pub const DEFAULT_RANKING: u32 = 999;

/// Projects ranked at or below this are featured.
pub const FEATURED_MAX_RANKING: u32 = 4;

/// A technology as authored in a project file, e.g. `{"name": "Rust"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Technology {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An infrastructure component with its provisioning steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Infrastructure {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Github,
    Demo,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A challenge or outcome line. Project files use either bare strings or
/// `{name, description}` objects; the shape is resolved once when the file is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ChallengeEntry {
    PlainText(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl ChallengeEntry {
    /// One-line text for the entry: the string itself, or the name of a detailed entry.
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText(text) => text,
            Self::Detailed { name, .. } => name,
        }
    }
}

/// One project file exactly as authored.
///
/// `id` and `ranking` are normally encoded in the filename (`29_1.json`); when present
/// in the record they take precedence.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSource {
    /// Kept loose so an unusable value falls back to the filename instead of
    /// rejecting the whole record.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub ranking: Option<Value>,
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies_used: Vec<Technology>,
    pub year: i32,
    pub month: u32,
    /// Duration in weeks.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub infrastructure: Option<Vec<Infrastructure>>,
    #[serde(default)]
    pub skills_required: Option<Vec<Skill>>,
    #[serde(default)]
    pub challenges_faced: Option<Vec<ChallengeEntry>>,
    #[serde(default)]
    pub outcomes: Option<Vec<ChallengeEntry>>,
    #[serde(default)]
    pub links: Option<Vec<Link>>,
    #[serde(default)]
    pub achievement_log: Option<String>,
}

/// A normalized project, as consumed by the generators and the tool server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u32,
    pub ranking: u32,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub year: i32,
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub role: String,
    pub project_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infrastructure: Option<Vec<Infrastructure>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills_required: Option<Vec<Skill>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenges_faced: Option<Vec<ChallengeEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<Vec<ChallengeEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievement_log: Option<String>,
}

impl Project {
    pub fn from_source(id: u32, ranking: u32, source: ProjectSource) -> Self {
        let github_url = first_link_url(source.links.as_deref(), LinkKind::Github);
        let demo_url = first_link_url(source.links.as_deref(), LinkKind::Demo);

        Self {
            id,
            ranking,
            title: source.project_name,
            description: source.description,
            technologies: source
                .technologies_used
                .into_iter()
                .map(|tech| tech.name)
                .collect(),
            year: source.year,
            month: source.month,
            duration: source.duration,
            role: source.role,
            project_type: source.project_type,
            infrastructure: source.infrastructure,
            skills_required: source.skills_required,
            challenges_faced: source.challenges_faced,
            outcomes: source.outcomes,
            links: source.links,
            github_url,
            demo_url,
            achievement_log: source.achievement_log,
        }
    }

    pub fn is_featured(&self) -> bool {
        self.ranking <= FEATURED_MAX_RANKING
    }

    /// First day of the project's month, e.g. "2023-05-01".
    pub fn date_published(&self) -> String {
        format!("{}-{:02}-01", self.year, self.month)
    }

    /// Duration in weeks, if the project declares a non-zero one.
    pub fn duration_weeks(&self) -> Option<u32> {
        self.duration.filter(|&weeks| weeks > 0)
    }
}

fn first_link_url(links: Option<&[Link]>, kind: LinkKind) -> Option<String> {
    links?
        .iter()
        .find(|link| link.kind == kind)
        .map(|link| link.url.clone())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// Who the site is about, read from `site.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SiteIdentity {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    /// Canonical origin, without a trailing slash, e.g. "https://example.com".
    pub base_url: String,
    #[serde(default)]
    pub contact: Contact,
}

/// The full site data set, built once at start-up and shared read-only.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub identity: SiteIdentity,
    pub projects: Vec<Project>,
}

impl Portfolio {
    pub fn base_url(&self) -> &str {
        &self.identity.base_url
    }

    pub fn project(&self, id: u32) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}
