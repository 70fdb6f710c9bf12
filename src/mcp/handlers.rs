//! MCP tool handlers
//!
//! Each handler returns Markdown text. Unknown slugs produce a plain
//! "... not found" message rather than an error, so clients can tell an
//! empty answer from a broken call.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::tools::*;
use crate::config::QueryConfig;
use crate::core::content::{Article, Group, Subsection};
use crate::core::query::{self, clamp_limit};
use crate::core::search::{self, SearchFilters, SearchItem, SearchMode, SortOrder};
use crate::core::store::ContentStore;

/// Result type for tool handlers
pub type ToolResult = Result<String, String>;

fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T, String> {
    // Tools without required fields accept a missing arguments object
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args.clone()
    };
    serde_json::from_value(args).map_err(|e| format!("Invalid params: {}", e))
}

/// Dispatch a tool call to the appropriate handler
pub fn dispatch_tool(
    store: &ContentStore,
    limits: &QueryConfig,
    name: &str,
    args: &Value,
) -> ToolResult {
    match name {
        "kb_list_groups" => Ok(do_list_groups(store)),
        "kb_list_subsections" => do_list_subsections(store, args),
        "kb_get_subsection" => do_get_subsection(store, args),
        "kb_list_articles" => do_list_articles(store, args),
        "kb_get_article" => do_get_article(store, args),
        "kb_popular" => do_popular(store, limits, args),
        "kb_recent" => do_recent(store, limits, args),
        "kb_related" => do_related(store, limits, args),
        "kb_search" => do_search(store, args),
        "kb_whats_new" => Ok(do_whats_new(store)),
        "kb_list_tags" => Ok(do_list_tags(store)),
        _ => Err(format!("Unknown tool: {}", name)),
    }
}

fn do_list_groups(store: &ContentStore) -> String {
    let mut out = String::from("# Groups\n\n");
    for group in query::list_groups(store) {
        let count = query::list_subsections(store, group.id).len();
        out.push_str(&format!(
            "## {} (`{}`)\n{}\n{} subsection(s)\n\n",
            group.title, group.id, group.description, count
        ));
    }
    out
}

fn do_list_subsections(store: &ContentStore, args: &Value) -> ToolResult {
    let tool_args: ListSubsectionsTool = parse_args(args)?;

    let group: Group = match tool_args.group.parse() {
        Ok(g) => g,
        Err(_) => return Ok(format!("Group not found: {}", tool_args.group)),
    };

    let subsections = query::list_subsections(store, group);
    if subsections.is_empty() {
        return Ok(format!("No subsections in {}.", group));
    }

    let mut out = format!("# {} ({} subsections)\n\n", group, subsections.len());
    for subsection in subsections {
        out.push_str(&render_subsection_summary(subsection));
    }
    Ok(out)
}

fn do_get_subsection(store: &ContentStore, args: &Value) -> ToolResult {
    let tool_args: GetSubsectionTool = parse_args(args)?;

    let Some(subsection) = query::get_subsection(store, &tool_args.slug) else {
        return Ok(format!("Subsection not found: {}", tool_args.slug));
    };

    let mut out = render_subsection_summary(subsection);
    let articles = query::list_articles(store, &subsection.slug);
    out.push_str(&format!("### Articles ({})\n\n", articles.len()));
    for article in articles {
        out.push_str(&render_article_summary(article));
    }
    Ok(out)
}

fn do_list_articles(store: &ContentStore, args: &Value) -> ToolResult {
    let tool_args: ListArticlesTool = parse_args(args)?;
    let articles = query::list_articles(store, &tool_args.subsection);
    Ok(render_article_list(
        &format!("Articles in {}", tool_args.subsection),
        &articles,
    ))
}

fn do_get_article(store: &ContentStore, args: &Value) -> ToolResult {
    let tool_args: GetArticleTool = parse_args(args)?;

    let Some(article) = query::get_article(store, &tool_args.slug) else {
        return Ok(format!("Article not found: {}", tool_args.slug));
    };

    let mut out = format!("# {}\n\n", article.title);
    out.push_str(&format!(
        "**Slug:** {}\n**Group:** {} / {}\n**Updated:** {}\n**Views:** {} | **Read:** {} min\n",
        article.slug,
        article.group,
        article.subsection,
        article.updated_at.format("%Y-%m-%d"),
        article.views,
        article.read_minutes
    ));
    if let Some(author) = &article.author {
        out.push_str(&format!("**Author:** {}\n", author));
    }
    if !article.tags.is_empty() {
        let names: Vec<&str> = article.tags.iter().map(|t| t.name.as_str()).collect();
        out.push_str(&format!("**Tags:** {}\n", names.join(", ")));
    }
    out.push_str(&format!("\n{}\n", article.excerpt));
    if tool_args.include_body {
        out.push_str(&format!("\n---\n\n{}\n", article.html));
    }
    Ok(out)
}

fn do_popular(store: &ContentStore, limits: &QueryConfig, args: &Value) -> ToolResult {
    let tool_args: LimitTool = parse_args(args)?;
    let limit = clamp_limit(tool_args.limit, limits.popular_limit);
    Ok(render_article_list(
        "Popular articles",
        &query::popular_articles(store, limit),
    ))
}

fn do_recent(store: &ContentStore, limits: &QueryConfig, args: &Value) -> ToolResult {
    let tool_args: LimitTool = parse_args(args)?;
    let limit = clamp_limit(tool_args.limit, limits.recent_limit);
    Ok(render_article_list(
        "Recently updated",
        &query::recent_articles(store, limit),
    ))
}

fn do_related(store: &ContentStore, limits: &QueryConfig, args: &Value) -> ToolResult {
    let tool_args: RelatedTool = parse_args(args)?;
    let limit = clamp_limit(tool_args.limit, limits.related_limit);
    let related = query::related_articles(store, &tool_args.tags, &tool_args.exclude, limit);
    Ok(render_article_list("Related articles", &related))
}

fn do_search(store: &ContentStore, args: &Value) -> ToolResult {
    let tool_args: SearchTool = parse_args(args)?;

    let filters = SearchFilters {
        query: tool_args.query,
        mode: SearchMode::parse_lenient(tool_args.mode.as_deref().unwrap_or_default()),
        tags: tool_args.tags,
        groups: Group::parse_many(&tool_args.groups),
        sort: SortOrder::parse_lenient(tool_args.sort.as_deref().unwrap_or_default()),
    };

    let results = search::search(store, &filters);
    if results.is_empty() {
        return Ok("No results found.".to_string());
    }

    let mut out = format!("Found {} result(s):\n\n", results.len());
    for result in &results {
        let kind = match &result.item {
            SearchItem::Article(_) => "article",
            SearchItem::Subsection(_) => "subsection",
        };
        out.push_str(&format!(
            "## {} ({} `{}`, matched on {:?})\n{}\n\n",
            result.title(),
            kind,
            result.slug(),
            result.match_type,
            result.snippet
        ));
    }
    Ok(out)
}

fn do_whats_new(store: &ContentStore) -> String {
    let updates = query::whats_new(store);
    if updates.is_empty() {
        return "No updates yet.".to_string();
    }

    let mut out = String::from("# What's New\n\n");
    for update in updates {
        out.push_str(&format!(
            "- **[{}] {}** ({})\n  {}\n",
            update.kind,
            update.title,
            update.date.format("%Y-%m-%d"),
            update.summary
        ));
        if let Some(slug) = &update.article_slug {
            out.push_str(&format!("  Article: `{}`\n", slug));
        }
    }
    out
}

fn do_list_tags(store: &ContentStore) -> String {
    let mut out = String::from("# Tags\n\n");
    for tag in query::all_tags(store) {
        out.push_str(&format!("- `{}` {} ({})\n", tag.id, tag.name, tag.slug));
    }
    out
}

fn render_subsection_summary(subsection: &Subsection) -> String {
    format!(
        "## {} (`{}`)\n{}\n{} article(s), updated {}\n\n",
        subsection.title,
        subsection.slug,
        subsection.description,
        subsection.article_count,
        subsection.updated_at.format("%Y-%m-%d")
    )
}

fn render_article_summary(article: &Article) -> String {
    format!(
        "- **{}** (`{}`) {} views, {} min\n  {}\n",
        article.title, article.slug, article.views, article.read_minutes, article.excerpt
    )
}

fn render_article_list(heading: &str, articles: &[&Article]) -> String {
    if articles.is_empty() {
        return format!("{}: no articles.", heading);
    }
    let mut out = format!("# {}\n\n", heading);
    for article in articles {
        out.push_str(&render_article_summary(article));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(name: &str, args: Value) -> ToolResult {
        let store = ContentStore::builtin().unwrap();
        dispatch_tool(&store, &QueryConfig::default(), name, &args)
    }

    #[test]
    fn test_get_article_not_found_is_text() {
        let text = call("kb_get_article", json!({"slug": "nonexistent-slug"})).unwrap();
        assert_eq!(text, "Article not found: nonexistent-slug");
    }

    #[test]
    fn test_get_article_renders_body() {
        let text = call("kb_get_article", json!({"slug": "kubernetes-basics"})).unwrap();
        assert!(text.starts_with("# Kubernetes Deployment Basics"));
        assert!(text.contains("**Author:** Alex Chen"));
        assert!(text.contains("<h2>Introduction to Kubernetes</h2>"));

        let text = call(
            "kb_get_article",
            json!({"slug": "kubernetes-basics", "include_body": false}),
        )
        .unwrap();
        assert!(!text.contains("<h2>"));
    }

    #[test]
    fn test_list_subsections_unknown_group() {
        let text = call("kb_list_subsections", json!({"group": "marketing"})).unwrap();
        assert_eq!(text, "Group not found: marketing");
    }

    #[test]
    fn test_popular_negative_limit() {
        let text = call("kb_popular", json!({"limit": -5})).unwrap();
        assert_eq!(text, "Popular articles: no articles.");
    }

    #[test]
    fn test_popular_without_arguments() {
        let text = call("kb_popular", Value::Null).unwrap();
        assert!(text.contains("API Authentication Methods"));
    }

    #[test]
    fn test_search_unknown_mode_falls_back() {
        let text = call("kb_search", json!({"query": "kubernetes", "mode": "weird"})).unwrap();
        assert!(text.starts_with("Found 1 result(s)"));
        assert!(text.contains("`kubernetes-basics`"));
    }

    #[test]
    fn test_related_excludes_current() {
        let text = call(
            "kb_related",
            json!({"tags": ["1"], "exclude": "getting-started-support"}),
        )
        .unwrap();
        assert!(text.contains("`onboarding-checklist`"));
        assert!(!text.contains("`getting-started-support`"));
    }

    #[test]
    fn test_missing_required_arg() {
        let err = call("kb_get_article", json!({})).unwrap_err();
        assert!(err.starts_with("Invalid params"));
    }

    #[test]
    fn test_unknown_tool() {
        assert!(call("kb_delete", json!({})).is_err());
    }

    #[test]
    fn test_every_listed_tool_dispatches() {
        for name in TOOL_NAMES {
            let result = call(
                name,
                json!({"group": "tools", "slug": "x", "subsection": "x"}),
            );
            assert!(result.is_ok(), "{} failed: {:?}", name, result);
        }
    }
}
