//! `kbh articles`, `kbh popular`, `kbh recent`, `kbh related` commands
//!
//! Article listings. Limits may be negative; they clamp to zero.
//!
//! # Usage
//! ```bash
//! kbh articles it-devops
//! kbh popular --limit 3
//! kbh recent
//! kbh related 1,8 --exclude onboarding-checklist
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::{print_json, short_date, tag_names, SourceArgs};
use crate::config::Config;
use crate::core::content::Article;
use crate::core::query::clamp_limit;

#[derive(Args, Debug)]
pub struct ArticlesArgs {
    /// Subsection slug
    pub subsection: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct LimitArgs {
    /// Maximum results (default from config)
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct RelatedArgs {
    /// Tag ids (comma-separated)
    #[arg(value_delimiter = ',', required = true)]
    pub tags: Vec<String>,

    /// Article slug to leave out
    #[arg(short, long, default_value = "")]
    pub exclude: String,

    /// Maximum results (default from config)
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    #[command(flatten)]
    pub source: SourceArgs,
}

pub async fn run_articles(args: ArticlesArgs, config: &Config) -> Result<()> {
    let backend = args.source.backend(config)?;
    let articles = backend.list_articles(&args.subsection).await?;
    output(&articles, &args.source, &format!("Articles in {}", args.subsection))
}

pub async fn run_popular(args: LimitArgs, config: &Config) -> Result<()> {
    let limit = clamp_limit(args.limit, config.query.popular_limit);
    let backend = args.source.backend(config)?;
    let articles = backend.popular_articles(limit).await?;
    output(&articles, &args.source, "Popular articles")
}

pub async fn run_recent(args: LimitArgs, config: &Config) -> Result<()> {
    let limit = clamp_limit(args.limit, config.query.recent_limit);
    let backend = args.source.backend(config)?;
    let articles = backend.recent_articles(limit).await?;
    output(&articles, &args.source, "Recently updated")
}

pub async fn run_related(args: RelatedArgs, config: &Config) -> Result<()> {
    let limit = clamp_limit(args.limit, config.query.related_limit);
    let backend = args.source.backend(config)?;
    let articles = backend
        .related_articles(&args.tags, &args.exclude, limit)
        .await?;
    output(&articles, &args.source, "Related articles")
}

fn output(articles: &[Article], source: &SourceArgs, heading: &str) -> Result<()> {
    if source.is_json() {
        return print_json(articles);
    }
    print_article_list(heading, articles);
    Ok(())
}

/// Numbered article listing used by several commands
pub fn print_article_list(heading: &str, articles: &[Article]) {
    if articles.is_empty() {
        println!("{}: {}", heading.bold(), "no articles".dimmed());
        return;
    }

    println!("{} ({})\n", heading.bold(), articles.len());
    for (i, article) in articles.iter().enumerate() {
        println!("{}. {}", i + 1, article.title.cyan().bold());
        println!(
            "   {} | {} | {} views | {} min | {}",
            article.slug,
            short_date(&article.updated_at),
            article.views,
            article.read_minutes,
            tag_names(&article.tags)
        );
        println!("   {}\n", article.excerpt.dimmed());
    }
}
