//! Error types for the content store and its ambient pieces
//!
//! The query layer itself never fails: lookups return `Option` and bad
//! filter values fall back to permissive defaults. These errors cover
//! dataset loading, preference persistence and strict lookups done by
//! the outer surfaces.

use std::path::PathBuf;

use thiserror::Error;

/// kbhub error type
#[derive(Error, Debug)]
pub enum KbError {
    /// Requested entity does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Group identifier outside the fixed set
    #[error("Unknown group: {0} (expected departments, resource-centre or tools)")]
    UnknownGroup(String),

    /// Dataset file could not be read
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dataset JSON is malformed
    #[error("Invalid dataset: {0}")]
    Json(#[from] serde_json::Error),

    /// Preference file could not be read, parsed or written
    #[error("Preferences error: {0}")]
    Prefs(String),
}

impl KbError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        KbError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Whether this error is a NotFound signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, KbError::NotFound { .. } | KbError::UnknownGroup(_))
    }
}

/// Result alias for kbhub library operations
pub type Result<T> = std::result::Result<T, KbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = KbError::not_found("Article", "missing-slug");
        assert_eq!(err.to_string(), "Article not found: missing-slug");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unknown_group_is_not_found() {
        let err = KbError::UnknownGroup("sales".to_string());
        assert!(err.is_not_found());
        assert!(err.to_string().contains("sales"));
    }

    #[test]
    fn test_prefs_is_not_not_found() {
        let err = KbError::Prefs("bad toml".to_string());
        assert!(!err.is_not_found());
    }
}
