//! `kbh home` command
//!
//! Dashboard view: popular articles, recent articles and the update feed,
//! fetched concurrently from the backend.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::articles::print_article_list;
use super::utils::{print_json, SourceArgs};
use super::whats_new::print_updates;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct HomeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub async fn run(args: HomeArgs, config: &Config) -> Result<()> {
    let backend = args.source.backend(config)?;

    let (popular, recent, updates) = futures::try_join!(
        backend.popular_articles(config.query.popular_limit),
        backend.recent_articles(config.query.recent_limit),
        backend.whats_new(),
    )?;

    if args.source.is_json() {
        return print_json(&serde_json::json!({
            "popular": popular,
            "recent": recent,
            "whatsNew": updates,
        }));
    }

    println!("{} ({})\n", "Knowledge Hub".bold(), backend.name().dimmed());
    print_article_list("Popular", &popular);
    print_article_list("Recently updated", &recent);
    println!("{}\n", "What's new".bold());
    print_updates(&updates);
    Ok(())
}
