//! `kbh init` command
//!
//! Creates a `.kbh/` directory with a default config.
//!
//! # Usage
//! ```bash
//! kbh init                    # Initialize in current directory
//! kbh init /path/to/project   # Initialize in specific path
//! kbh init --export-dataset   # Also write the builtin content to .kbh/dataset.json
//! kbh init --global           # Initialize global ~/.kbh
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use crate::config::{Config, KBH_DIR};
use crate::core::store::ContentStore;

/// File name of the exported dataset inside `.kbh/`
const DATASET_FILE: &str = "dataset.json";

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to initialize (default: current directory)
    pub path: Option<PathBuf>,

    /// Initialize global config (~/.kbh)
    #[arg(long)]
    pub global: bool,

    /// Write the builtin dataset next to the config and point the config at it
    #[arg(long)]
    pub export_dataset: bool,

    /// Force re-initialization
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let base_path = if args.global {
        directories::UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        args.path.clone().unwrap_or_else(|| PathBuf::from("."))
    };

    let kbh_dir = base_path.join(KBH_DIR);

    if is_kbh_dir(&base_path) && !args.force {
        bail!(
            "Directory {} is already initialized. Use --force to reinitialize.",
            base_path.display()
        );
    }

    println!("Initializing kbh in: {}", base_path.display());

    fs::create_dir_all(&kbh_dir)
        .with_context(|| format!("Failed to create {}", kbh_dir.display()))?;

    let mut config = Config::default();

    if args.export_dataset {
        let dataset_path = kbh_dir.join(DATASET_FILE);
        export_dataset(&dataset_path)?;
        // Relative to the project root (parent of .kbh)
        config.store.dataset = Some(PathBuf::from(KBH_DIR).join(DATASET_FILE));
        println!("   Dataset: {}", dataset_path.display());
    }

    let config_path = kbh_dir.join("config.toml");
    config.save_to(&config_path)?;

    println!("\n{} Initialized kbh", "✓".green());
    println!("   Config: {}", config_path.display());
    println!("\nNext steps:");
    println!("  kbh groups");
    println!("  kbh search \"kubernetes\"");
    println!("  kbh serve --transport http");

    Ok(())
}

/// Serialize the builtin content so it can be edited by hand
fn export_dataset(path: &Path) -> Result<()> {
    let store = ContentStore::builtin()?;
    let json = serde_json::to_string_pretty(store.dataset())?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn is_kbh_dir(path: &Path) -> bool {
    path.join(KBH_DIR).exists()
}
