//! Search - Filter, classify and sort over the content store
//!
//! A plain full scan: no index, no ranking. The candidate set is every
//! article followed by every subsection; filters narrow it, and the
//! requested sort reorders it with a stable sort.
//!
//! # Pipeline
//! 1. Group filter (no-op when empty)
//! 2. Tag filter, any-of (no-op when empty)
//! 3. Text filter per [`SearchMode`] (empty query matches everything)
//! 4. matchType classification: title > tag > content
//! 5. Snippet from the excerpt (articles) or description (subsections)
//! 6. Sort per [`SortOrder`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::content::{has_any_tag, Article, Group, Subsection};
use super::snippet::{self, contains_ci};
use super::store::ContentStore;

/// Which fields the text query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    All,
    Title,
    Tags,
    Content,
}

impl SearchMode {
    /// Parse a mode name; anything unrecognized means `All`
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "title" => SearchMode::Title,
            "tags" => SearchMode::Tags,
            "content" => SearchMode::Content,
            _ => SearchMode::All,
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::All => write!(f, "all"),
            SearchMode::Title => write!(f, "title"),
            SearchMode::Tags => write!(f, "tags"),
            SearchMode::Content => write!(f, "content"),
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Filter-pass order: articles, then subsections
    #[default]
    Relevance,
    /// Newest `updatedAt` first
    Date,
    /// Most viewed first (subsections count as 0)
    Views,
}

impl SortOrder {
    /// Parse a sort name; anything unrecognized means `Relevance`
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "date" => SortOrder::Date,
            "views" => SortOrder::Views,
            _ => SortOrder::Relevance,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Relevance => write!(f, "relevance"),
            SortOrder::Date => write!(f, "date"),
            SortOrder::Views => write!(f, "views"),
        }
    }
}

/// Why an item matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Title,
    Tag,
    Content,
}

/// Source type of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Article,
    Subsection,
}

/// Search query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Free text (case-insensitive substring)
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub mode: SearchMode,

    /// Tag ids, any-of
    #[serde(default)]
    pub tags: Vec<String>,

    /// Groups, any-of
    #[serde(default)]
    pub groups: Vec<Group>,

    #[serde(default)]
    pub sort: SortOrder,
}

impl SearchFilters {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// The matched record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchItem {
    Article(Article),
    Subsection(Subsection),
}

/// A single search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub item: SearchItem,
    pub match_type: MatchType,
    pub snippet: String,
}

impl SearchResult {
    pub fn slug(&self) -> &str {
        match &self.item {
            SearchItem::Article(a) => &a.slug,
            SearchItem::Subsection(s) => &s.slug,
        }
    }

    pub fn title(&self) -> &str {
        match &self.item {
            SearchItem::Article(a) => &a.title,
            SearchItem::Subsection(s) => &s.title,
        }
    }

    pub fn group(&self) -> Group {
        match &self.item {
            SearchItem::Article(a) => a.group,
            SearchItem::Subsection(s) => s.group,
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        match &self.item {
            SearchItem::Article(a) => a.updated_at,
            SearchItem::Subsection(s) => s.updated_at,
        }
    }

    /// View count; subsections have none
    pub fn views(&self) -> u64 {
        match &self.item {
            SearchItem::Article(a) => a.views,
            SearchItem::Subsection(_) => 0,
        }
    }
}

/// Run a search over the store
pub fn search(store: &ContentStore, filters: &SearchFilters) -> Vec<SearchResult> {
    let needle = filters.query.as_str();

    let articles = store
        .articles()
        .iter()
        .filter(|a| in_groups(a.group, &filters.groups))
        .filter(|a| has_any_tag(&a.tags, &filters.tags))
        .filter(|a| article_matches(a, needle, filters.mode))
        .map(|a| SearchResult {
            kind: ResultKind::Article,
            match_type: classify(a, needle),
            snippet: snippet::generate(&a.excerpt, &filters.query),
            item: SearchItem::Article(a.clone()),
        });

    let subsections = store
        .subsections()
        .iter()
        .filter(|s| in_groups(s.group, &filters.groups))
        .filter(|s| has_any_tag(&s.tags, &filters.tags))
        .filter(|s| subsection_matches(s, needle))
        .map(|s| SearchResult {
            kind: ResultKind::Subsection,
            match_type: MatchType::Title,
            snippet: snippet::generate(&s.description, &filters.query),
            item: SearchItem::Subsection(s.clone()),
        });

    let mut results: Vec<SearchResult> = articles.chain(subsections).collect();

    match filters.sort {
        SortOrder::Relevance => {}
        SortOrder::Date => results.sort_by(|a, b| b.updated_at().cmp(&a.updated_at())),
        SortOrder::Views => results.sort_by(|a, b| b.views().cmp(&a.views())),
    }

    debug!(
        query = %filters.query,
        mode = %filters.mode,
        sort = %filters.sort,
        hits = results.len(),
        "search"
    );

    results
}

fn in_groups(group: Group, wanted: &[Group]) -> bool {
    wanted.is_empty() || wanted.contains(&group)
}

fn tag_name_matches(article: &Article, needle: &str) -> bool {
    article.tags.iter().any(|t| contains_ci(&t.name, needle))
}

fn article_matches(article: &Article, needle: &str, mode: SearchMode) -> bool {
    if needle.is_empty() {
        return true;
    }

    match mode {
        SearchMode::Title => contains_ci(&article.title, needle),
        SearchMode::Tags => tag_name_matches(article, needle),
        SearchMode::Content => {
            contains_ci(&article.html, needle) || contains_ci(&article.excerpt, needle)
        }
        SearchMode::All => {
            contains_ci(&article.title, needle)
                || contains_ci(&article.excerpt, needle)
                || contains_ci(&article.html, needle)
                || tag_name_matches(article, needle)
        }
    }
}

/// Subsections match on title or description whatever the mode
fn subsection_matches(subsection: &Subsection, needle: &str) -> bool {
    needle.is_empty()
        || contains_ci(&subsection.title, needle)
        || contains_ci(&subsection.description, needle)
}

/// Title beats tag beats content, independent of the active mode
fn classify(article: &Article, needle: &str) -> MatchType {
    if needle.is_empty() || contains_ci(&article.title, needle) {
        MatchType::Title
    } else if tag_name_matches(article, needle) {
        MatchType::Tag
    } else {
        MatchType::Content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ContentStore {
        ContentStore::builtin().unwrap()
    }

    #[test]
    fn test_title_mode_kubernetes() {
        let store = store();
        let filters = SearchFilters::new("kubernetes").with_mode(SearchMode::Title);
        let results = search(&store, &filters);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, ResultKind::Article);
        assert_eq!(results[0].slug(), "kubernetes-basics");
        assert_eq!(results[0].match_type, MatchType::Title);
    }

    #[test]
    fn test_group_filter_only_tools() {
        let store = store();
        let filters = SearchFilters::new("").with_groups(vec![Group::Tools]);
        let results = search(&store, &filters);

        // 1 article + 3 subsections
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.group() == Group::Tools));
    }

    #[test]
    fn test_empty_query_returns_everything_articles_first() {
        let store = store();
        let results = search(&store, &SearchFilters::default());
        assert_eq!(results.len(), 16);
        assert!(results[..5].iter().all(|r| r.kind == ResultKind::Article));
        assert!(results[5..].iter().all(|r| r.kind == ResultKind::Subsection));
        assert!(results.iter().all(|r| r.match_type == MatchType::Title));
    }

    #[test]
    fn test_tag_filter_any_of() {
        let store = store();
        let filters = SearchFilters::new("").with_tags(vec!["9".to_string()]);
        let results = search(&store, &filters);
        let slugs: Vec<&str> = results.iter().map(|r| r.slug()).collect();
        assert_eq!(slugs, vec!["kubernetes-basics", "api-authentication", "it-devops"]);
    }

    #[test]
    fn test_tags_mode_matches_tag_names() {
        let store = store();
        let filters = SearchFilters::new("security").with_mode(SearchMode::Tags);
        let results = search(&store, &filters);
        let articles: Vec<&SearchResult> = results
            .iter()
            .filter(|r| r.kind == ResultKind::Article)
            .collect();
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|r| r.match_type == MatchType::Tag));
    }

    #[test]
    fn test_content_mode_matches_body() {
        let store = store();
        let filters = SearchFilters::new("rakwireless").with_mode(SearchMode::Content);
        let results = search(&store, &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].slug(), "onboarding-checklist");
        assert_eq!(results[0].match_type, MatchType::Content);
    }

    #[test]
    fn test_match_type_priority_ignores_mode() {
        let store = store();
        // "api" is in the title and in a tag name; title wins even in tags mode
        let filters = SearchFilters::new("api").with_mode(SearchMode::Tags);
        let results = search(&store, &filters);
        let auth = results
            .iter()
            .find(|r| r.slug() == "api-authentication")
            .unwrap();
        assert_eq!(auth.match_type, MatchType::Title);
    }

    #[test]
    fn test_subsections_ignore_mode() {
        let store = store();
        let filters = SearchFilters::new("escalation").with_mode(SearchMode::Title);
        let results = search(&store, &filters);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, ResultKind::Subsection);
        assert_eq!(results[0].slug(), "customer-support");
    }

    #[test]
    fn test_sort_by_views() {
        let store = store();
        let filters = SearchFilters::new("").with_sort(SortOrder::Views);
        let results = search(&store, &filters);
        assert_eq!(results[0].slug(), "api-authentication");
        for pair in results.windows(2) {
            assert!(pair[0].views() >= pair[1].views());
        }
        // subsections keep their relative order at the tail
        assert_eq!(results[5].slug(), "customer-support");
    }

    #[test]
    fn test_sort_by_date() {
        let store = store();
        let filters = SearchFilters::new("").with_sort(SortOrder::Date);
        let results = search(&store, &filters);
        for pair in results.windows(2) {
            assert!(pair[0].updated_at() >= pair[1].updated_at());
        }
        // api-authentication and technical-support share a timestamp; the
        // article came first in filter order
        assert_eq!(results[0].slug(), "api-authentication");
        assert_eq!(results[1].slug(), "technical-support");
    }

    #[test]
    fn test_snippet_contains_query() {
        let store = store();
        let filters = SearchFilters::new("ORCHESTRATION");
        let results = search(&store, &filters);
        assert!(!results.is_empty());
        assert!(results[0].snippet.to_lowercase().contains("orchestration"));
    }

    #[test]
    fn test_content_hits_show_the_match() {
        let excerpt = format!("{} Our İstanbul office runs the regional help desk.", "Intro. ".repeat(25));
        let dataset = serde_json::json!({
            "articles": [{
                "id": "regional-offices",
                "slug": "regional-offices",
                "title": "Regional Offices",
                "excerpt": excerpt,
                "html": "",
                "group": "departments",
                "subsection": "customer-support",
                "updatedAt": "2024-03-01T00:00:00Z",
            }]
        });
        let store = ContentStore::from_json(&dataset.to_string()).unwrap();

        let results = search(&store, &SearchFilters::new("İSTANBUL"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].match_type, MatchType::Content);
        assert!(results[0].snippet.starts_with("..."));
        assert!(results[0].snippet.contains("İstanbul office"));

        // Matching is char by char, so a decomposed dotted i finds nothing
        assert!(search(&store, &SearchFilters::new("i\u{307}stanbul")).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let store = store();
        let filters = SearchFilters::new("management").with_sort(SortOrder::Date);
        assert_eq!(search(&store, &filters), search(&store, &filters));
    }

    #[test]
    fn test_lenient_parsing() {
        assert_eq!(SearchMode::parse_lenient("TITLE"), SearchMode::Title);
        assert_eq!(SearchMode::parse_lenient("bogus"), SearchMode::All);
        assert_eq!(SortOrder::parse_lenient("views"), SortOrder::Views);
        assert_eq!(SortOrder::parse_lenient("random"), SortOrder::Relevance);
    }

    #[test]
    fn test_result_json_shape() {
        let store = store();
        let results = search(&store, &SearchFilters::new("kubernetes").with_mode(SearchMode::Title));
        let json = serde_json::to_value(&results[0]).unwrap();
        assert_eq!(json["type"], "article");
        assert_eq!(json["matchType"], "title");
        assert_eq!(json["item"]["slug"], "kubernetes-basics");

        let back: SearchResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, results[0]);
    }

    #[test]
    fn test_filters_deserialize_defaults() {
        let filters: SearchFilters = serde_json::from_str(r#"{"query": "x"}"#).unwrap();
        assert_eq!(filters.mode, SearchMode::All);
        assert_eq!(filters.sort, SortOrder::Relevance);
        assert!(filters.tags.is_empty());
    }
}
