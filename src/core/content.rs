//! Content - Core data structures
//!
//! The knowledge base is made of four record kinds plus tags:
//!
//! - **Group**: one of three fixed top-level categories
//! - **Subsection**: a named grouping of articles inside a group
//! - **Article**: a single document with metadata and an HTML body
//! - **UpdateEntry**: a "what's new" feed record
//!
//! All records are immutable once loaded. References between them are by
//! identifier (tag id, group id, subsection slug) and are not enforced.
//!
//! Field names serialize in camelCase so datasets stay compatible with the
//! JSON shape used by the web front-end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::KbError;

/// A content tag (reference data)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Top-level content category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Group {
    Departments,
    ResourceCentre,
    Tools,
}

impl Group {
    /// All groups in display order
    pub const ALL: [Group; 3] = [Group::Departments, Group::ResourceCentre, Group::Tools];

    /// Wire identifier (`departments`, `resource-centre`, `tools`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Departments => "departments",
            Group::ResourceCentre => "resource-centre",
            Group::Tools => "tools",
        }
    }

    /// Parse a list of group identifiers, dropping the ones that are not
    /// recognized.
    pub fn parse_many<S: AsRef<str>>(values: &[S]) -> Vec<Group> {
        values
            .iter()
            .filter_map(|v| v.as_ref().parse().ok())
            .collect()
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Group {
    type Err = KbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "departments" => Ok(Group::Departments),
            "resource-centre" => Ok(Group::ResourceCentre),
            "tools" => Ok(Group::Tools),
            _ => Err(KbError::UnknownGroup(s.to_string())),
        }
    }
}

/// Display metadata for a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub id: Group,
    pub title: String,
    pub description: String,
    /// Icon name used by the front-end
    pub icon: String,
}

/// The three group records shipped with every dataset
pub fn default_groups() -> Vec<GroupInfo> {
    vec![
        GroupInfo {
            id: Group::Departments,
            title: "Departments".to_string(),
            description: "Resources organized by department and team functions".to_string(),
            icon: "Building2".to_string(),
        },
        GroupInfo {
            id: Group::ResourceCentre,
            title: "Resource Centre".to_string(),
            description: "Comprehensive knowledge base and documentation".to_string(),
            icon: "BookOpen".to_string(),
        },
        GroupInfo {
            id: Group::Tools,
            title: "Tools".to_string(),
            description: "Development tools, utilities, and platform guides".to_string(),
            icon: "Wrench".to_string(),
        },
    ]
}

/// A named grouping of articles within a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subsection {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub group: Group,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub child_count: u32,
    #[serde(default)]
    pub article_count: u32,
    pub updated_at: DateTime<Utc>,
}

/// A single content document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Renderable body markup
    pub html: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub group: Group,
    /// Slug of the owning subsection (not enforced)
    pub subsection: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub read_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Article {
    /// Number of this article's tags whose id appears in `tag_ids`
    pub fn shared_tag_count(&self, tag_ids: &[String]) -> usize {
        self.tags
            .iter()
            .filter(|tag| tag_ids.contains(&tag.id))
            .count()
    }

    /// Tag ids of this article, in order
    pub fn tag_ids(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.id.clone()).collect()
    }
}

/// Kind of a feed entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    New,
    Update,
    Announcement,
}

impl std::fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateKind::New => write!(f, "new"),
            UpdateKind::Update => write!(f, "update"),
            UpdateKind::Announcement => write!(f, "announcement"),
        }
    }
}

/// A "what's new" feed record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub title: String,
    pub summary: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,
}

/// True when `tags` contains at least one id from `wanted`.
/// An empty `wanted` list matches everything.
pub fn has_any_tag(tags: &[Tag], wanted: &[String]) -> bool {
    wanted.is_empty() || tags.iter().any(|tag| wanted.contains(&tag.id))
}
