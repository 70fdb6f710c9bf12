//! Query - Read-only lookups over the content store
//!
//! Every function here is a pure, synchronous scan of the store. Lookups
//! by slug return `None` for unknown identifiers, and a `limit` of zero
//! yields an empty list. All sorts are stable, so ties keep insertion order.

use super::content::{Article, Group, GroupInfo, Subsection, Tag, UpdateEntry};
use super::store::ContentStore;

/// Default number of entries for the popular list
pub const DEFAULT_POPULAR_LIMIT: usize = 6;
/// Default number of entries for the recent list
pub const DEFAULT_RECENT_LIMIT: usize = 6;
/// Default number of related articles
pub const DEFAULT_RELATED_LIMIT: usize = 4;

/// Resolve a caller-supplied signed limit: absent means `default`,
/// zero or negative means nothing.
pub fn clamp_limit(limit: Option<i64>, default: usize) -> usize {
    match limit {
        Some(n) if n <= 0 => 0,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
        None => default,
    }
}

/// All group records, fixed order
pub fn list_groups(store: &ContentStore) -> &[GroupInfo] {
    store.groups()
}

/// Metadata for a single group
pub fn get_group(store: &ContentStore, group: Group) -> Option<&GroupInfo> {
    store.groups().iter().find(|g| g.id == group)
}

/// Subsections belonging to `group`, insertion order
pub fn list_subsections(store: &ContentStore, group: Group) -> Vec<&Subsection> {
    store
        .subsections()
        .iter()
        .filter(|s| s.group == group)
        .collect()
}

pub fn get_subsection<'a>(store: &'a ContentStore, slug: &str) -> Option<&'a Subsection> {
    store.subsections().iter().find(|s| s.slug == slug)
}

/// Articles whose `subsection` equals `subsection_slug`, insertion order
pub fn list_articles<'a>(store: &'a ContentStore, subsection_slug: &str) -> Vec<&'a Article> {
    store
        .articles()
        .iter()
        .filter(|a| a.subsection == subsection_slug)
        .collect()
}

pub fn get_article<'a>(store: &'a ContentStore, slug: &str) -> Option<&'a Article> {
    store.articles().iter().find(|a| a.slug == slug)
}

/// Most viewed articles first
pub fn popular_articles(store: &ContentStore, limit: usize) -> Vec<&Article> {
    let mut articles: Vec<&Article> = store.articles().iter().collect();
    articles.sort_by(|a, b| b.views.cmp(&a.views));
    articles.truncate(limit);
    articles
}

/// Most recently updated articles first
pub fn recent_articles(store: &ContentStore, limit: usize) -> Vec<&Article> {
    let mut articles: Vec<&Article> = store.articles().iter().collect();
    articles.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    articles.truncate(limit);
    articles
}

/// Articles sharing at least one tag with `tag_ids`, excluding
/// `exclude_slug`, ordered by number of shared tags (descending).
pub fn related_articles<'a>(
    store: &'a ContentStore,
    tag_ids: &[String],
    exclude_slug: &str,
    limit: usize,
) -> Vec<&'a Article> {
    let mut scored: Vec<(usize, &Article)> = store
        .articles()
        .iter()
        .filter(|a| a.slug != exclude_slug)
        .map(|a| (a.shared_tag_count(tag_ids), a))
        .filter(|(shared, _)| *shared > 0)
        .collect();

    scored.sort_by(|(a, _), (b, _)| b.cmp(a));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, article)| article)
        .collect()
}

/// Feed entries, newest first
pub fn whats_new(store: &ContentStore) -> Vec<&UpdateEntry> {
    let mut updates: Vec<&UpdateEntry> = store.updates().iter().collect();
    updates.sort_by(|a, b| b.date.cmp(&a.date));
    updates
}

pub fn all_tags(store: &ContentStore) -> &[Tag] {
    store.tags()
}
