//! `kbh prefs` command
//!
//! Get or set persisted UI preferences.
//!
//! # Usage
//! ```bash
//! kbh prefs                                # Show all preferences
//! kbh prefs sidebar-collapsed              # Get value
//! kbh prefs sidebar-collapsed true         # Set value
//! kbh prefs sidebar-collapsed --toggle     # Flip value
//! ```

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use crate::config::Config;
use crate::core::prefs::{FilePreferences, PreferenceStore, KNOWN_KEYS};

#[derive(Args, Debug)]
pub struct PrefsArgs {
    /// Preference key (e.g., sidebar-collapsed)
    pub key: Option<String>,

    /// Value to set (true or false)
    pub value: Option<String>,

    /// Flip the current value
    #[arg(long, conflicts_with = "value")]
    pub toggle: bool,
}

pub fn run(args: PrefsArgs, config: &Config) -> Result<()> {
    let mut prefs = FilePreferences::new(config.prefs_path());

    let Some(key) = args.key.as_deref() else {
        println!("Preferences ({}):\n", prefs.path().display());
        for key in KNOWN_KEYS {
            println!("  {} = {}", key.cyan(), prefs.flag(key)?);
        }
        return Ok(());
    };

    if !KNOWN_KEYS.contains(&key) {
        bail!(
            "Unknown preference: {}. Known keys: {}",
            key,
            KNOWN_KEYS.join(", ")
        );
    }

    if args.toggle {
        let flipped = !prefs.flag(key)?;
        prefs.set_bool(key, flipped)?;
        println!("{} {} = {}", "✓".green(), key, flipped);
        return Ok(());
    }

    match args.value.as_deref() {
        Some(raw) => {
            let flag = parse_bool(raw)
                .with_context(|| format!("Invalid value for {}: {}", key, raw))?;
            prefs.set_bool(key, flag)?;
            println!("{} {} = {}", "✓".green(), key, flag);
        }
        None => println!("{}", prefs.flag(key)?),
    }

    Ok(())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => bail!("expected true or false"),
    }
}
