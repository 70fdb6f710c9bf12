//! `kbh groups`, `kbh subsections`, `kbh subsection`, `kbh tags` commands
//!
//! Browse the group > subsection hierarchy.
//!
//! # Usage
//! ```bash
//! kbh groups                       # The three top-level groups
//! kbh subsections departments      # Subsections of a group
//! kbh subsection it-devops         # One subsection with its articles
//! kbh tags --format json
//! ```

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use super::utils::{print_json, short_date, tag_names, SourceArgs};
use crate::config::Config;
use crate::core::content::{Group, Subsection};

#[derive(Args, Debug)]
pub struct GroupsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct SubsectionsArgs {
    /// Group id: departments, resource-centre or tools
    pub group: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct SubsectionArgs {
    /// Subsection slug
    pub slug: String,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args, Debug)]
pub struct TagsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Tabled)]
struct SubsectionRow {
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Articles")]
    articles: u32,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Subsection> for SubsectionRow {
    fn from(s: &Subsection) -> Self {
        Self {
            slug: s.slug.clone(),
            title: s.title.clone(),
            articles: s.article_count,
            updated: short_date(&s.updated_at),
        }
    }
}

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Slug")]
    slug: String,
}

pub async fn run_groups(args: GroupsArgs, config: &Config) -> Result<()> {
    let backend = args.source.backend(config)?;
    let groups = backend.list_groups().await?;

    if args.source.is_json() {
        return print_json(&groups);
    }

    for group in &groups {
        let count = backend.list_subsections(group.id).await?.len();
        println!(
            "{} {}",
            group.title.bold(),
            format!("({})", group.id).dimmed()
        );
        println!("   {}", group.description);
        println!("   {} subsection(s)\n", count);
    }
    Ok(())
}

pub async fn run_subsections(args: SubsectionsArgs, config: &Config) -> Result<()> {
    let group: Group = args.group.parse()?;
    let backend = args.source.backend(config)?;
    let subsections = backend.list_subsections(group).await?;

    if args.source.is_json() {
        return print_json(&subsections);
    }

    if subsections.is_empty() {
        println!("No subsections in {}.", group);
        return Ok(());
    }

    println!("{}", group.to_string().bold());
    let rows: Vec<SubsectionRow> = subsections.iter().map(SubsectionRow::from).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

pub async fn run_subsection(args: SubsectionArgs, config: &Config) -> Result<()> {
    let backend = args.source.backend(config)?;

    let Some(subsection) = backend.get_subsection(&args.slug).await? else {
        bail!("Subsection not found: {}", args.slug);
    };
    let articles = backend.list_articles(&subsection.slug).await?;

    if args.source.is_json() {
        return print_json(&serde_json::json!({
            "subsection": subsection,
            "articles": articles,
        }));
    }

    println!("{}", subsection.title.cyan().bold());
    println!("{}", "═".repeat(60));
    println!("Slug:     {}", subsection.slug);
    println!("Group:    {}", subsection.group);
    println!("Tags:     {}", tag_names(&subsection.tags));
    println!("Updated:  {}", short_date(&subsection.updated_at));
    println!("\n{}\n", subsection.description);

    if articles.is_empty() {
        println!("{}", "No articles yet.".dimmed());
        return Ok(());
    }

    println!("{} ({})", "Articles".bold(), articles.len());
    for article in &articles {
        println!(
            "  {} {}",
            article.slug.cyan(),
            format!("{} views, {} min", article.views, article.read_minutes).dimmed()
        );
        println!("     {}", article.title);
    }
    Ok(())
}

pub async fn run_tags(args: TagsArgs, config: &Config) -> Result<()> {
    let backend = args.source.backend(config)?;
    let tags = backend.all_tags().await?;

    if args.source.is_json() {
        return print_json(&tags);
    }

    let rows: Vec<TagRow> = tags
        .into_iter()
        .map(|t| TagRow {
            id: t.id,
            name: t.name,
            slug: t.slug,
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}
