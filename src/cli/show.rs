//! `kbh show` command
//!
//! Displays a single article followed by its related articles (shared
//! tags, the article itself excluded).
//!
//! # Usage
//! ```bash
//! kbh show kubernetes-basics
//! kbh show kubernetes-basics --no-body
//! kbh show api-authentication --format json
//! ```

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use super::utils::{print_json, short_date, tag_names, SourceArgs};
use crate::config::Config;
use crate::core::query::clamp_limit;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Article slug
    pub slug: String,

    /// Omit the article body
    #[arg(long)]
    pub no_body: bool,

    /// Number of related articles to list (default from config)
    #[arg(long, allow_negative_numbers = true)]
    pub related: Option<i64>,

    #[command(flatten)]
    pub source: SourceArgs,
}

pub async fn run(args: ShowArgs, config: &Config) -> Result<()> {
    let backend = args.source.backend(config)?;

    let Some(article) = backend.get_article(&args.slug).await? else {
        bail!("Article not found: {}", args.slug);
    };

    let limit = clamp_limit(args.related, config.query.related_limit);
    let related = backend
        .related_articles(&article.tag_ids(), &article.slug, limit)
        .await?;

    if args.source.is_json() {
        return print_json(&serde_json::json!({
            "article": article,
            "related": related,
        }));
    }

    println!("{}", article.title.cyan().bold());
    println!("{}", "═".repeat(60));
    println!("Slug:     {}", article.slug);
    println!("Location: {} / {}", article.group, article.subsection);
    if let Some(author) = &article.author {
        println!("Author:   {}", author);
    }
    println!("Updated:  {}", short_date(&article.updated_at));
    println!(
        "Stats:    {} views, {} min read",
        article.views, article.read_minutes
    );
    println!("Tags:     {}", tag_names(&article.tags));
    println!("\n{}", article.excerpt.italic());

    if !args.no_body {
        println!("\n{}", "Content".bold());
        println!("{}", "─".repeat(40));
        println!("{}", article.html);
    }

    if !related.is_empty() {
        println!("\n{}", "Related".bold());
        for other in &related {
            println!("  {} {}", other.slug.cyan(), other.title.dimmed());
        }
    }

    Ok(())
}
