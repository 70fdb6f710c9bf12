//! Remote server HTTP client
//!
//! Async client for the kbh HTTP API (`kbh serve --transport http`).

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use url::Url;

use super::types::*;
use crate::core::content::{Article, Group, GroupInfo, Subsection, Tag, UpdateEntry};
use crate::core::search::{SearchFilters, SearchResult};

/// HTTP client for a remote kbh server
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: Url,
}

impl RemoteClient {
    /// Create new client with explicit parameters
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid server URL: {}", base_url))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a URL from path segments; each segment is percent-encoded,
    /// so a slug can never change the route or add a query string
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Server URL cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ============== Health ==============

    /// Check server health
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.url(&["health"])?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to connect to server")?;

        if !resp.status().is_success() {
            anyhow::bail!("Server health check failed: {}", resp.status());
        }

        resp.json().await.context("Failed to parse health response")
    }

    // ============== Categories ==============

    pub async fn groups(&self) -> Result<Vec<GroupInfo>> {
        self.get_json(&["api", "v1", "groups"], &[]).await
    }

    pub async fn tags(&self) -> Result<Vec<Tag>> {
        self.get_json(&["api", "v1", "tags"], &[]).await
    }

    /// A group with its subsections, `None` when the server does not know it
    pub async fn category(&self, group: Group) -> Result<Option<CategoryResponse>> {
        self.get_optional(&["api", "v1", "category", group.as_str()], &[])
            .await
    }

    pub async fn subsection(&self, slug: &str) -> Result<Option<Subsection>> {
        self.get_optional(&["api", "v1", "subsections", slug], &[])
            .await
    }

    pub async fn subsection_articles(&self, slug: &str) -> Result<Vec<Article>> {
        self.get_json(&["api", "v1", "subsections", slug, "articles"], &[])
            .await
    }

    // ============== Articles ==============

    pub async fn article(&self, slug: &str) -> Result<Option<Article>> {
        self.get_optional(&["api", "v1", "articles", slug], &[])
            .await
    }

    pub async fn popular(&self, limit: usize) -> Result<Vec<Article>> {
        self.get_json(&["api", "v1", "popular"], &[("limit", limit.to_string())])
            .await
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<Article>> {
        self.get_json(&["api", "v1", "recent"], &[("limit", limit.to_string())])
            .await
    }

    pub async fn related(
        &self,
        tag_ids: &[String],
        exclude_slug: &str,
        limit: usize,
    ) -> Result<Vec<Article>> {
        let params = [
            ("tags", tag_ids.join(",")),
            ("exclude", exclude_slug.to_string()),
            ("limit", limit.to_string()),
        ];
        self.get_json(&["api", "v1", "related"], &params).await
    }

    pub async fn whats_new(&self) -> Result<Vec<UpdateEntry>> {
        self.get_json(&["api", "v1", "whats-new"], &[]).await
    }

    // ============== Search ==============

    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<SearchResult>> {
        let groups: Vec<String> = filters.groups.iter().map(|g| g.to_string()).collect();
        let params = [
            ("q", filters.query.clone()),
            ("mode", filters.mode.to_string()),
            ("tags", filters.tags.join(",")),
            ("groups", groups.join(",")),
            ("sort", filters.sort.to_string()),
        ];
        self.get_json(&["api", "v1", "search"], &params).await
    }

    // ============== Helpers ==============

    async fn send(&self, segments: &[&str], params: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = self.url(segments)?;
        self.client
            .get(url.clone())
            .query(params)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T> {
        let resp = self.send(segments, params).await?;
        self.handle_response(resp).await
    }

    /// Like `get_json`, but a 404 becomes `Ok(None)`
    async fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<Option<T>> {
        let resp = self.send(segments, params).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.handle_response(resp).await.map(Some)
    }

    /// Handle response and deserialize
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T> {
        let status = resp.status();

        if status == StatusCode::NOT_FOUND {
            anyhow::bail!("Resource not found");
        }

        if !status.is_success() {
            let err = self.extract_error(resp).await;
            anyhow::bail!("API error ({}): {}", status, err);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Extract error message from response
    async fn extract_error(&self, resp: reqwest::Response) -> String {
        if let Ok(err) = resp.json::<ApiErrorResponse>().await {
            err.error
        } else {
            "Unknown error".to_string()
        }
    }
}
