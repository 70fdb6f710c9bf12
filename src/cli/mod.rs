//! CLI module - Command definitions and handlers

use clap::{Parser, Subcommand};

pub mod articles;
pub mod category;
pub mod config;
pub mod home;
pub mod init;
pub mod prefs;
pub mod search;
pub mod serve;
pub mod show;
pub mod utils;
pub mod whats_new;

/// kbh - Knowledge hub CLI
///
/// Browse and search a knowledge base of groups, subsections and articles,
/// or serve it over MCP (stdio) and HTTP.
#[derive(Parser, Debug)]
#[command(name = "kbh")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, env = "KBH_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a .kbh directory
    Init(init::InitArgs),

    /// Popular, recent and what's new at a glance
    Home(home::HomeArgs),

    /// List top-level groups
    Groups(category::GroupsArgs),

    /// List subsections of a group
    Subsections(category::SubsectionsArgs),

    /// Show a subsection and its articles
    Subsection(category::SubsectionArgs),

    /// List articles of a subsection
    Articles(articles::ArticlesArgs),

    /// Show an article by slug
    Show(show::ShowArgs),

    /// Most viewed articles
    Popular(articles::LimitArgs),

    /// Most recently updated articles
    Recent(articles::LimitArgs),

    /// Articles sharing tags
    Related(articles::RelatedArgs),

    /// Search articles and subsections
    Search(search::SearchArgs),

    /// Update feed
    WhatsNew(whats_new::WhatsNewArgs),

    /// List all tags
    Tags(category::TagsArgs),

    /// Get or set UI preferences
    Prefs(prefs::PrefsArgs),

    /// Get or set configuration
    Config(config::ConfigArgs),

    /// Start MCP or HTTP server
    Serve(serve::ServeArgs),
}
