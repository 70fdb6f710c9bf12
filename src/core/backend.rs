//! Backend abstraction
//!
//! Gives the outer surfaces one async interface over either the local
//! in-memory store or a remote kbh HTTP server.
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │          ContentBackend             │
//! │  ┌──────────────┬──────────────┐    │
//! │  │ LocalBackend │ RemoteBackend│    │
//! │  │ (store+delay)│  (HTTP API)  │    │
//! │  └──────────────┴──────────────┘    │
//! └─────────────────────────────────────┘
//! ```
//!
//! `LocalBackend` can sleep before each call to emulate network latency
//! for UI loading states. The delay has no effect on results.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::content::{Article, Group, GroupInfo, Subsection, Tag, UpdateEntry};
use super::query;
use super::search::{self, SearchFilters, SearchResult};
use super::store::ContentStore;
use crate::config::Config;
use crate::remote::RemoteClient;

/// Async read access to a knowledge base
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn list_groups(&self) -> Result<Vec<GroupInfo>>;

    async fn list_subsections(&self, group: Group) -> Result<Vec<Subsection>>;

    async fn get_subsection(&self, slug: &str) -> Result<Option<Subsection>>;

    async fn list_articles(&self, subsection_slug: &str) -> Result<Vec<Article>>;

    async fn get_article(&self, slug: &str) -> Result<Option<Article>>;

    async fn popular_articles(&self, limit: usize) -> Result<Vec<Article>>;

    async fn recent_articles(&self, limit: usize) -> Result<Vec<Article>>;

    async fn related_articles(
        &self,
        tag_ids: &[String],
        exclude_slug: &str,
        limit: usize,
    ) -> Result<Vec<Article>>;

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<SearchResult>>;

    async fn whats_new(&self) -> Result<Vec<UpdateEntry>>;

    async fn all_tags(&self) -> Result<Vec<Tag>>;

    /// Human-readable name
    fn name(&self) -> &str;
}

/// Backend over an in-process [`ContentStore`]
#[derive(Debug, Clone)]
pub struct LocalBackend {
    store: Arc<ContentStore>,
    latency: Duration,
}

impl LocalBackend {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self {
            store,
            latency: Duration::ZERO,
        }
    }

    /// Open the store configured in `config` (dataset file or seed)
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = ContentStore::open(config.store.dataset.as_deref())?;
        Ok(Self::new(Arc::new(store)).with_latency(config.store.latency()))
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn owned<T: Clone>(items: Vec<&T>) -> Vec<T> {
    items.into_iter().cloned().collect()
}

#[async_trait]
impl ContentBackend for LocalBackend {
    async fn list_groups(&self) -> Result<Vec<GroupInfo>> {
        self.delay().await;
        Ok(query::list_groups(&self.store).to_vec())
    }

    async fn list_subsections(&self, group: Group) -> Result<Vec<Subsection>> {
        self.delay().await;
        Ok(owned(query::list_subsections(&self.store, group)))
    }

    async fn get_subsection(&self, slug: &str) -> Result<Option<Subsection>> {
        self.delay().await;
        Ok(query::get_subsection(&self.store, slug).cloned())
    }

    async fn list_articles(&self, subsection_slug: &str) -> Result<Vec<Article>> {
        self.delay().await;
        Ok(owned(query::list_articles(&self.store, subsection_slug)))
    }

    async fn get_article(&self, slug: &str) -> Result<Option<Article>> {
        self.delay().await;
        Ok(query::get_article(&self.store, slug).cloned())
    }

    async fn popular_articles(&self, limit: usize) -> Result<Vec<Article>> {
        self.delay().await;
        Ok(owned(query::popular_articles(&self.store, limit)))
    }

    async fn recent_articles(&self, limit: usize) -> Result<Vec<Article>> {
        self.delay().await;
        Ok(owned(query::recent_articles(&self.store, limit)))
    }

    async fn related_articles(
        &self,
        tag_ids: &[String],
        exclude_slug: &str,
        limit: usize,
    ) -> Result<Vec<Article>> {
        self.delay().await;
        Ok(owned(query::related_articles(
            &self.store,
            tag_ids,
            exclude_slug,
            limit,
        )))
    }

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<SearchResult>> {
        self.delay().await;
        Ok(search::search(&self.store, filters))
    }

    async fn whats_new(&self) -> Result<Vec<UpdateEntry>> {
        self.delay().await;
        Ok(owned(query::whats_new(&self.store)))
    }

    async fn all_tags(&self) -> Result<Vec<Tag>> {
        self.delay().await;
        Ok(query::all_tags(&self.store).to_vec())
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// Backend over a remote kbh HTTP server
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: RemoteClient,
    name: String,
}

impl RemoteBackend {
    pub fn new(server_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = RemoteClient::new(server_url, timeout_secs)?;
        Ok(Self {
            client,
            name: server_url.to_string(),
        })
    }

    /// Get the client for operations not in the trait
    pub fn client(&self) -> &RemoteClient {
        &self.client
    }
}

#[async_trait]
impl ContentBackend for RemoteBackend {
    async fn list_groups(&self) -> Result<Vec<GroupInfo>> {
        self.client.groups().await
    }

    async fn list_subsections(&self, group: Group) -> Result<Vec<Subsection>> {
        Ok(self
            .client
            .category(group)
            .await?
            .map(|c| c.subsections)
            .unwrap_or_default())
    }

    async fn get_subsection(&self, slug: &str) -> Result<Option<Subsection>> {
        self.client.subsection(slug).await
    }

    async fn list_articles(&self, subsection_slug: &str) -> Result<Vec<Article>> {
        self.client.subsection_articles(subsection_slug).await
    }

    async fn get_article(&self, slug: &str) -> Result<Option<Article>> {
        self.client.article(slug).await
    }

    async fn popular_articles(&self, limit: usize) -> Result<Vec<Article>> {
        self.client.popular(limit).await
    }

    async fn recent_articles(&self, limit: usize) -> Result<Vec<Article>> {
        self.client.recent(limit).await
    }

    async fn related_articles(
        &self,
        tag_ids: &[String],
        exclude_slug: &str,
        limit: usize,
    ) -> Result<Vec<Article>> {
        self.client.related(tag_ids, exclude_slug, limit).await
    }

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<SearchResult>> {
        self.client.search(filters).await
    }

    async fn whats_new(&self) -> Result<Vec<UpdateEntry>> {
        self.client.whats_new().await
    }

    async fn all_tags(&self) -> Result<Vec<Tag>> {
        self.client.tags().await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Pick a backend: remote when a server URL is given (flag or config),
/// local otherwise.
pub fn from_args(server: Option<&str>, config: &Config) -> Result<Box<dyn ContentBackend>> {
    let url = server.map(str::to_string).or_else(|| config.server.url.clone());

    match url {
        Some(url) => {
            debug!(%url, "using remote backend");
            Ok(Box::new(RemoteBackend::new(&url, config.server.timeout_secs)?))
        }
        None => {
            debug!("using local backend");
            Ok(Box::new(LocalBackend::from_config(config)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn backend() -> LocalBackend {
        LocalBackend::new(Arc::new(ContentStore::builtin().unwrap()))
    }

    #[tokio::test]
    async fn test_local_get_article() {
        let backend = backend();
        let article = backend.get_article("api-authentication").await.unwrap();
        assert_eq!(article.unwrap().views, 412);
        assert!(backend.get_article("nonexistent-slug").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_local_matches_query_layer() {
        let backend = backend();
        let popular = backend.popular_articles(2).await.unwrap();
        let direct = query::popular_articles(backend.store(), 2);
        assert_eq!(popular.len(), 2);
        assert_eq!(popular[0], *direct[0]);
        assert_eq!(popular[1], *direct[1]);
    }

    #[tokio::test]
    async fn test_local_latency_applied() {
        let backend = backend().with_latency(Duration::from_millis(30));
        let start = Instant::now();
        let groups = backend.list_groups().await.unwrap();
        assert_eq!(groups.len(), 3);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_concurrent_queries_independent() {
        let backend = backend().with_latency(Duration::from_millis(5));
        let (groups, tags, feed) = futures::try_join!(
            backend.list_groups(),
            backend.all_tags(),
            backend.whats_new()
        )
        .unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(tags.len(), 10);
        assert_eq!(feed[0].id, "3");
    }

    #[tokio::test]
    async fn test_from_args_defaults_to_local() {
        let backend = from_args(None, &Config::default()).unwrap();
        assert_eq!(backend.name(), "local");
        assert_eq!(backend.list_subsections(Group::Tools).await.unwrap().len(), 3);
    }

    #[test]
    fn test_from_args_remote_when_url_given() {
        let backend = from_args(Some("http://localhost:9999"), &Config::default()).unwrap();
        assert_eq!(backend.name(), "http://localhost:9999");
    }

    /// Serve the HTTP API on an ephemeral port and return its base URL
    async fn spawn_server() -> String {
        use crate::config::QueryConfig;
        use crate::server::{router, AppState};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(AppState::new(backend(), QueryConfig::default()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_remote_agrees_with_local() {
        let local = backend();
        let remote = RemoteBackend::new(&spawn_server().await, 5).unwrap();

        for slug in [
            "kubernetes-basics",
            "kubernetes-basics?x=1",
            "../groups",
            "kubernetes-basics#top",
            "nonexistent-slug",
        ] {
            let expected = local.get_article(slug).await.unwrap().map(|a| a.slug);
            let actual = remote.get_article(slug).await.unwrap().map(|a| a.slug);
            assert_eq!(actual, expected, "slug {:?}", slug);
        }

        let expected = local.get_subsection("it-devops").await.unwrap();
        assert_eq!(remote.get_subsection("it-devops").await.unwrap(), expected);
        assert!(remote.get_subsection("../tags").await.unwrap().is_none());
        assert!(remote
            .list_articles("it-devops?x=1")
            .await
            .unwrap()
            .is_empty());

        let filters = SearchFilters::new("kubernetes");
        assert_eq!(
            remote.search(&filters).await.unwrap(),
            local.search(&filters).await.unwrap()
        );
        assert_eq!(
            remote.popular_articles(3).await.unwrap(),
            local.popular_articles(3).await.unwrap()
        );
    }

    #[test]
    fn test_from_args_rejects_bad_url() {
        assert!(from_args(Some("not a url"), &Config::default()).is_err());
    }
}
