//! Remote API types
//!
//! DTOs shared by the HTTP server and the remote client.

use serde::{Deserialize, Serialize};

use crate::core::content::{Article, GroupInfo, Subsection};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// A group with its subsections (`/category/{group}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub group: GroupInfo,
    pub subsections: Vec<Subsection>,
}

/// A subsection with its articles (`/category/{group}/{subsection}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsectionResponse {
    pub subsection: Subsection,
    pub articles: Vec<Article>,
}

/// Error payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
