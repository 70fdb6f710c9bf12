//! HTTP API server
//!
//! JSON endpoints over a [`LocalBackend`]. Paths mirror the web front-end
//! routes (`/category/{group}/{subsection}`, `/article/{slug}`, ...) under
//! `/api/v1`.
//!
//! Unknown slugs and groups answer 404 with `{"error": "..."}`. Bad query
//! values never fail: limits clamp at zero, unknown modes and sorts fall
//! back to `all` and `relevance`, unknown groups in a filter are dropped.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::QueryConfig;
use crate::core::backend::{ContentBackend, LocalBackend};
use crate::core::content::{Article, Group, GroupInfo, Subsection, Tag, UpdateEntry};
use crate::core::error::KbError;
use crate::core::query::clamp_limit;
use crate::core::search::{SearchFilters, SearchMode, SearchResult, SortOrder};
use crate::remote::{ApiErrorResponse, CategoryResponse, HealthResponse, SubsectionResponse};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    backend: LocalBackend,
    limits: QueryConfig,
}

impl AppState {
    pub fn new(backend: LocalBackend, limits: QueryConfig) -> Self {
        Self { backend, limits }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/groups", get(list_groups))
        .route("/api/v1/tags", get(list_tags))
        .route("/api/v1/category/{group}", get(category))
        .route("/api/v1/category/{group}/{subsection}", get(category_subsection))
        .route("/api/v1/subsections/{slug}", get(get_subsection))
        .route("/api/v1/subsections/{slug}/articles", get(subsection_articles))
        .route("/api/v1/articles/{slug}", get(get_article))
        .route("/api/v1/articles/{slug}/related", get(article_related))
        .route("/api/v1/popular", get(popular))
        .route("/api/v1/recent", get(recent))
        .route("/api/v1/related", get(related))
        .route("/api/v1/search", get(search))
        .route("/api/v1/whats-new", get(whats_new))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP API listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Handler error, rendered as JSON
pub enum ApiError {
    NotFound(String),
    Internal(String),
}

impl From<KbError> for ApiError {
    fn from(err: KbError) -> Self {
        if err.is_not_found() {
            ApiError::NotFound(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ApiErrorResponse { error })).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// `?limit=` parameter, kept raw so a malformed value can't reject the
/// request
#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<String>,
}

/// Unparsable limits mean "use the default"; negatives clamp to zero
fn lenient_limit(raw: Option<&str>, default: usize) -> usize {
    clamp_limit(raw.and_then(|s| s.trim().parse::<i64>().ok()), default)
}

fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize)]
struct RelatedQuery {
    tags: Option<String>,
    exclude: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    mode: Option<String>,
    tags: Option<String>,
    groups: Option<String>,
    sort: Option<String>,
}

impl SearchQuery {
    fn into_filters(self) -> SearchFilters {
        SearchFilters {
            query: self.q.unwrap_or_default(),
            mode: SearchMode::parse_lenient(self.mode.as_deref().unwrap_or_default()),
            tags: split_csv(self.tags.as_deref()),
            groups: Group::parse_many(&split_csv(self.groups.as_deref())),
            sort: SortOrder::parse_lenient(self.sort.as_deref().unwrap_or_default()),
        }
    }
}

// API Handlers

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_groups(State(state): State<AppState>) -> ApiResult<Vec<GroupInfo>> {
    Ok(Json(state.backend.list_groups().await?))
}

async fn list_tags(State(state): State<AppState>) -> ApiResult<Vec<Tag>> {
    Ok(Json(state.backend.all_tags().await?))
}

async fn category(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> ApiResult<CategoryResponse> {
    let group: Group = group.parse()?;
    let info = state
        .backend
        .list_groups()
        .await?
        .into_iter()
        .find(|g| g.id == group)
        .ok_or_else(|| KbError::not_found("Group", group.to_string()))?;
    let subsections = state.backend.list_subsections(group).await?;

    Ok(Json(CategoryResponse {
        group: info,
        subsections,
    }))
}

async fn category_subsection(
    State(state): State<AppState>,
    Path((group, slug)): Path<(String, String)>,
) -> ApiResult<SubsectionResponse> {
    let group: Group = group.parse()?;
    let subsection = state
        .backend
        .get_subsection(&slug)
        .await?
        .filter(|s| s.group == group)
        .ok_or_else(|| KbError::not_found("Subsection", slug.clone()))?;
    let articles = state.backend.list_articles(&slug).await?;

    Ok(Json(SubsectionResponse {
        subsection,
        articles,
    }))
}

async fn get_subsection(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Subsection> {
    let subsection = state
        .backend
        .get_subsection(&slug)
        .await?
        .ok_or_else(|| KbError::not_found("Subsection", slug))?;
    Ok(Json(subsection))
}

async fn subsection_articles(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Vec<Article>> {
    Ok(Json(state.backend.list_articles(&slug).await?))
}

async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Article> {
    let article = state
        .backend
        .get_article(&slug)
        .await?
        .ok_or_else(|| KbError::not_found("Article", slug))?;
    Ok(Json(article))
}

async fn article_related(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<LimitQuery>,
) -> ApiResult<Vec<Article>> {
    let article = state
        .backend
        .get_article(&slug)
        .await?
        .ok_or_else(|| KbError::not_found("Article", slug.clone()))?;
    let limit = lenient_limit(params.limit.as_deref(), state.limits.related_limit);
    let related = state
        .backend
        .related_articles(&article.tag_ids(), &article.slug, limit)
        .await?;
    Ok(Json(related))
}

async fn popular(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> ApiResult<Vec<Article>> {
    let limit = lenient_limit(params.limit.as_deref(), state.limits.popular_limit);
    Ok(Json(state.backend.popular_articles(limit).await?))
}

async fn recent(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> ApiResult<Vec<Article>> {
    let limit = lenient_limit(params.limit.as_deref(), state.limits.recent_limit);
    Ok(Json(state.backend.recent_articles(limit).await?))
}

async fn related(
    State(state): State<AppState>,
    Query(params): Query<RelatedQuery>,
) -> ApiResult<Vec<Article>> {
    let tags = split_csv(params.tags.as_deref());
    let limit = lenient_limit(params.limit.as_deref(), state.limits.related_limit);
    let exclude = params.exclude.unwrap_or_default();
    Ok(Json(
        state.backend.related_articles(&tags, &exclude, limit).await?,
    ))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Vec<SearchResult>> {
    let filters = params.into_filters();
    Ok(Json(state.backend.search(&filters).await?))
}

async fn whats_new(State(state): State<AppState>) -> ApiResult<Vec<UpdateEntry>> {
    Ok(Json(state.backend.whats_new().await?))
}
