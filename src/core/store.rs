//! Store - Immutable in-memory content collection
//!
//! The store is built once (from the embedded seed dataset or a JSON
//! dataset file) and never mutated afterwards. Every query is a read over
//! these vectors in insertion order.
//!
//! # Dataset format
//! ```json
//! {
//!   "tags": [...],
//!   "groups": [...],        // optional, defaults to the three fixed groups
//!   "subsections": [...],
//!   "articles": [...],
//!   "updates": [...]        // optional
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::content::{default_groups, Article, GroupInfo, Subsection, Tag, UpdateEntry};
use super::error::{KbError, Result};

const SEED_DATASET: &str = include_str!("../../data/seed.json");

/// Serialized form of a whole knowledge base
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default = "default_groups")]
    pub groups: Vec<GroupInfo>,

    #[serde(default)]
    pub subsections: Vec<Subsection>,

    #[serde(default)]
    pub articles: Vec<Article>,

    #[serde(default)]
    pub updates: Vec<UpdateEntry>,
}

/// Read-only content store
#[derive(Debug, Clone)]
pub struct ContentStore {
    data: Dataset,
}

impl ContentStore {
    /// Build a store from an already parsed dataset
    pub fn new(data: Dataset) -> Self {
        debug!(
            tags = data.tags.len(),
            subsections = data.subsections.len(),
            articles = data.articles.len(),
            updates = data.updates.len(),
            "content store loaded"
        );
        Self { data }
    }

    /// The dataset compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(SEED_DATASET)
    }

    /// Parse a dataset from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Dataset = serde_json::from_str(json)?;
        Ok(Self::new(data))
    }

    /// Load a dataset from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| KbError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Load from `path` when given, otherwise fall back to the builtin seed
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }

    /// The raw dataset (e.g. for export)
    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    pub fn tags(&self) -> &[Tag] {
        &self.data.tags
    }

    pub fn groups(&self) -> &[GroupInfo] {
        &self.data.groups
    }

    pub fn subsections(&self) -> &[Subsection] {
        &self.data.subsections
    }

    pub fn articles(&self) -> &[Article] {
        &self.data.articles
    }

    pub fn updates(&self) -> &[UpdateEntry] {
        &self.data.updates
    }
}
