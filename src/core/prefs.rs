//! Prefs - Persisted UI preferences
//!
//! A tiny key/value store for boolean UI state that survives across
//! sessions (currently only whether the sidebar is collapsed). The file
//! backend is a TOML document edited in place with `toml_edit`, so
//! comments and unrelated keys are preserved.
//!
//! ```toml
//! sidebar-collapsed = true
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use toml_edit::{value, DocumentMut};
use tracing::debug;

use super::error::{KbError, Result};

/// Key for the sidebar collapsed flag
pub const SIDEBAR_COLLAPSED: &str = "sidebar-collapsed";

/// Keys accepted by the CLI
pub const KNOWN_KEYS: &[&str] = &[SIDEBAR_COLLAPSED];

/// Boolean preference storage
pub trait PreferenceStore {
    /// Read a flag; `None` when it was never set
    fn get_bool(&self, key: &str) -> Result<Option<bool>>;

    /// Persist a flag
    fn set_bool(&mut self, key: &str, value: bool) -> Result<()>;

    /// Read a flag, treating unset as `false`
    fn flag(&self, key: &str) -> Result<bool> {
        Ok(self.get_bool(key)?.unwrap_or(false))
    }
}

/// In-memory preferences (tests, ephemeral sessions)
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, bool>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.values.get(key).copied())
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences stored in a TOML file
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<DocumentMut> {
        if !self.path.exists() {
            return Ok(DocumentMut::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| KbError::Prefs(format!("{}: {}", self.path.display(), e)))?;
        content
            .parse::<DocumentMut>()
            .map_err(|e| KbError::Prefs(format!("{}: {}", self.path.display(), e)))
    }
}

impl PreferenceStore for FilePreferences {
    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let doc = self.read_document()?;
        Ok(doc.get(key).and_then(|item| item.as_bool()))
    }

    fn set_bool(&mut self, key: &str, flag: bool) -> Result<()> {
        let mut doc = self.read_document()?;
        doc[key] = value(flag);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| KbError::Prefs(e.to_string()))?;
            }
        }
        fs::write(&self.path, doc.to_string()).map_err(|e| KbError::Prefs(e.to_string()))?;

        debug!(key, value = flag, path = %self.path.display(), "preference saved");
        Ok(())
    }
}
