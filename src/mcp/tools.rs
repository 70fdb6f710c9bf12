//! MCP tool argument structs
//!
//! Simple structs for deserializing tool arguments. Limits are signed so
//! that negative values from clients can be clamped rather than rejected.

use serde::Deserialize;

/// Tool names, in the order `tools/list` reports them
pub const TOOL_NAMES: &[&str] = &[
    "kb_list_groups",
    "kb_list_subsections",
    "kb_get_subsection",
    "kb_list_articles",
    "kb_get_article",
    "kb_popular",
    "kb_recent",
    "kb_related",
    "kb_search",
    "kb_whats_new",
    "kb_list_tags",
];

/// List subsections in a group
#[derive(Debug, Deserialize)]
pub struct ListSubsectionsTool {
    /// departments, resource-centre or tools
    pub group: String,
}

/// Get a subsection (and its articles) by slug
#[derive(Debug, Deserialize)]
pub struct GetSubsectionTool {
    pub slug: String,
}

/// List articles of a subsection
#[derive(Debug, Deserialize)]
pub struct ListArticlesTool {
    pub subsection: String,
}

/// Get a single article by slug
#[derive(Debug, Deserialize)]
pub struct GetArticleTool {
    pub slug: String,
    /// Append the article body
    #[serde(default = "default_true")]
    pub include_body: bool,
}

/// Popular or recent list
#[derive(Debug, Deserialize)]
pub struct LimitTool {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Articles related by tags
#[derive(Debug, Deserialize)]
pub struct RelatedTool {
    /// Tag ids to match
    #[serde(default)]
    pub tags: Vec<String>,
    /// Slug to leave out (usually the current article)
    #[serde(default)]
    pub exclude: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Search articles and subsections
#[derive(Debug, Deserialize)]
pub struct SearchTool {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_true() -> bool {
    true
}
