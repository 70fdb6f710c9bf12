//! `kbh whats-new` command
//!
//! Prints the update feed, newest first.

use anyhow::Result;
use clap::Args;
use colored::{ColoredString, Colorize};

use super::utils::{print_json, short_date, SourceArgs};
use crate::config::Config;
use crate::core::content::{UpdateEntry, UpdateKind};

#[derive(Args, Debug)]
pub struct WhatsNewArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub async fn run(args: WhatsNewArgs, config: &Config) -> Result<()> {
    let backend = args.source.backend(config)?;
    let updates = backend.whats_new().await?;

    if args.source.is_json() {
        return print_json(&updates);
    }
    print_updates(&updates);
    Ok(())
}

pub fn print_updates(updates: &[UpdateEntry]) {
    if updates.is_empty() {
        println!("No updates yet.");
        return;
    }

    for update in updates {
        println!(
            "{} {} {}",
            badge(update.kind),
            update.title.bold(),
            short_date(&update.date).dimmed()
        );
        println!("   {}", update.summary);
        if let Some(slug) = &update.article_slug {
            println!("   {} kbh show {}", "→".dimmed(), slug);
        }
    }
}

fn badge(kind: UpdateKind) -> ColoredString {
    let label = format!("[{}]", kind);
    match kind {
        UpdateKind::New => label.green(),
        UpdateKind::Update => label.blue(),
        UpdateKind::Announcement => label.yellow(),
    }
}
