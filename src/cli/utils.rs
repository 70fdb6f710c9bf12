//! CLI utility functions
//!
//! Common helper functions shared across CLI commands:
//! - Backend selection (`--server` flag or `server.url` in config)
//! - Output format handling
//! - Small formatting helpers

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::config::Config;
use crate::core::backend::{self, ContentBackend};
use crate::core::content::Tag;

/// Output format shared by read commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable, colored
    #[default]
    Pretty,
    /// Pretty-printed JSON
    Json,
}

/// Flags every read command accepts
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Query a remote kbh HTTP server instead of the local dataset
    #[arg(long, env = "KBH_SERVER_URL")]
    pub server: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}

impl SourceArgs {
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Open the backend these flags select
    pub fn backend(&self, config: &Config) -> Result<Box<dyn ContentBackend>> {
        backend::from_args(self.server.as_deref(), config)
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `2024-01-22`
pub fn short_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Comma-joined tag names, `-` when empty
pub fn tag_names(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "-".to_string();
    }
    tags.iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names() {
        let tags = vec![
            Tag {
                id: "2".to_string(),
                name: "Advanced".to_string(),
                slug: "advanced".to_string(),
            },
            Tag {
                id: "9".to_string(),
                name: "Security".to_string(),
                slug: "security".to_string(),
            },
        ];
        assert_eq!(tag_names(&tags), "Advanced, Security");
        assert_eq!(tag_names(&[]), "-");
    }

    #[test]
    fn test_short_date() {
        let date: DateTime<Utc> = "2024-01-22T16:45:00Z".parse().unwrap();
        assert_eq!(short_date(&date), "2024-01-22");
    }
}
