//! kbh CLI - Entry point
//!
//! Usage: kbh <command> [options]

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kbhub::cli::{Cli, Commands};
use kbhub::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output and MCP responses
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    // `init` and `config` manage config files, so they don't load one
    let config_path = cli.config.clone();
    let load = || Config::load_with(config_path.as_deref().map(Path::new));

    match cli.command {
        Commands::Init(args) => kbhub::cli::init::run(args),
        Commands::Config(args) => kbhub::cli::config::run(args),
        Commands::Home(args) => kbhub::cli::home::run(args, &load()?).await,
        Commands::Groups(args) => kbhub::cli::category::run_groups(args, &load()?).await,
        Commands::Subsections(args) => kbhub::cli::category::run_subsections(args, &load()?).await,
        Commands::Subsection(args) => kbhub::cli::category::run_subsection(args, &load()?).await,
        Commands::Articles(args) => kbhub::cli::articles::run_articles(args, &load()?).await,
        Commands::Show(args) => kbhub::cli::show::run(args, &load()?).await,
        Commands::Popular(args) => kbhub::cli::articles::run_popular(args, &load()?).await,
        Commands::Recent(args) => kbhub::cli::articles::run_recent(args, &load()?).await,
        Commands::Related(args) => kbhub::cli::articles::run_related(args, &load()?).await,
        Commands::Search(args) => kbhub::cli::search::run(args, &load()?).await,
        Commands::WhatsNew(args) => kbhub::cli::whats_new::run(args, &load()?).await,
        Commands::Tags(args) => kbhub::cli::category::run_tags(args, &load()?).await,
        Commands::Prefs(args) => kbhub::cli::prefs::run(args, &load()?),
        Commands::Serve(args) => kbhub::cli::serve::run(args, &load()?).await,
    }
}
