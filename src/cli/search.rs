//! `kbh search` command
//!
//! Searches articles and subsections (local or remote).
//!
//! # Usage
//! ```bash
//! kbh search kubernetes
//! kbh search kubernetes --mode title
//! kbh search --tags 1,8 --sort views        # Tag filter only
//! kbh search api --groups resource-centre --format json
//! ```
//!
//! Unknown modes and sorts fall back to `all` and `relevance`; unknown
//! groups are ignored.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::{print_json, short_date, SourceArgs};
use crate::config::Config;
use crate::core::content::Group;
use crate::core::search::{MatchType, ResultKind, SearchFilters, SearchMode, SearchResult, SortOrder};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive substring (empty matches everything)
    #[arg(default_value = "")]
    pub query: String,

    /// Field to match: all, title, tags, content
    #[arg(short, long, default_value = "all")]
    pub mode: String,

    /// Tag ids (comma-separated, any-of)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Groups (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub groups: Vec<String>,

    /// Ordering: relevance, date, views
    #[arg(short, long, default_value = "relevance")]
    pub sort: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl SearchArgs {
    pub fn filters(&self) -> SearchFilters {
        SearchFilters::new(self.query.clone())
            .with_mode(SearchMode::parse_lenient(&self.mode))
            .with_tags(self.tags.clone())
            .with_groups(Group::parse_many(&self.groups))
            .with_sort(SortOrder::parse_lenient(&self.sort))
    }
}

pub async fn run(args: SearchArgs, config: &Config) -> Result<()> {
    let backend = args.source.backend(config)?;
    let results = backend.search(&args.filters()).await?;

    if args.source.is_json() {
        return print_json(&results);
    }
    print_pretty(&results);
    Ok(())
}

fn print_pretty(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    println!("\nFound {} result(s):\n", results.len());

    for (i, result) in results.iter().enumerate() {
        let kind = match result.kind {
            ResultKind::Article => "article".green(),
            ResultKind::Subsection => "subsection".blue(),
        };
        let matched = match result.match_type {
            MatchType::Title => "title",
            MatchType::Tag => "tag",
            MatchType::Content => "content",
        };
        println!("{}. {} [{}]", i + 1, result.title().cyan().bold(), kind);
        println!(
            "   {} | {} | matched on {} | {}",
            result.slug(),
            result.group(),
            matched,
            short_date(&result.updated_at())
        );
        println!("   {}\n", result.snippet.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        search: SearchArgs,
    }

    #[test]
    fn test_lenient_flags() {
        let cli = TestCli::parse_from([
            "kbh", "deploy", "--mode", "weird", "--sort", "views", "--groups", "tools,marketing",
            "--tags", "1,8",
        ]);
        let filters = cli.search.filters();
        assert_eq!(filters.query, "deploy");
        assert_eq!(filters.mode, SearchMode::All);
        assert_eq!(filters.sort, SortOrder::Views);
        assert_eq!(filters.groups, vec![Group::Tools]);
        assert_eq!(filters.tags, vec!["1", "8"]);
    }

    #[test]
    fn test_empty_query_default() {
        let cli = TestCli::parse_from(["kbh"]);
        let filters = cli.search.filters();
        assert!(filters.query.is_empty());
        assert_eq!(filters.mode, SearchMode::All);
        assert_eq!(filters.sort, SortOrder::Relevance);
    }
}
