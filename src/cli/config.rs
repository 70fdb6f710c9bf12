//! `kbh config` command
//!
//! Get or set configuration values.
//!
//! # Usage
//! ```bash
//! kbh config                          # Show all config
//! kbh config query.popular_limit      # Get specific value
//! kbh config server.port 9090         # Set value
//! kbh config --path                   # Show config file locations
//! kbh config --global store.latency_ms 300
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use toml_edit::{value, DocumentMut};

use crate::config::{Config, KBH_DIR};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config key (e.g., query.popular_limit, server.url)
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Use global config (~/.kbh/config.toml) instead of local
    #[arg(short, long)]
    pub global: bool,
}

fn get_config_path(global: bool) -> PathBuf {
    if global {
        Config::global_config_path().unwrap_or_else(|| PathBuf::from(KBH_DIR).join("config.toml"))
    } else {
        Config::find_local_dir()
            .unwrap_or_else(|| PathBuf::from(KBH_DIR))
            .join("config.toml")
    }
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let config_path = get_config_path(args.global);

    if args.path {
        println!("Global: {}", get_config_path(true).display());
        println!("Local:  {}", get_config_path(false).display());
        println!();
        if config_path.exists() {
            println!("{} Active: {}", "✓".green(), config_path.display());
        } else {
            println!("{} No config file found at {}", "⚠".yellow(), config_path.display());
        }
        return Ok(());
    }

    let Some(key) = &args.key else {
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            println!("Configuration ({}):\n", config_path.display());
            println!("{}", content);
        } else {
            println!("No config file at {}", config_path.display());
            println!();
            println!("Create one with:");
            println!("  kbh init");
            println!("  kbh config query.popular_limit 10");
        }
        return Ok(());
    };

    match &args.value {
        Some(val) => {
            set_config_value(&config_path, key, val)?;
            println!(
                "{} Set {} = {} (in {})",
                "✓".green(),
                key,
                val,
                config_path.display()
            );
        }
        None => match get_config_value(&config_path, key)? {
            Some(v) => println!("{}", v),
            None => println!("(not set)"),
        },
    }

    Ok(())
}

/// Set a nested config value using dot notation (e.g., "server.port")
fn set_config_value(path: &Path, key: &str, val: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = content.parse().context("Failed to parse config.toml")?;

    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        [top] => doc[*top] = value(parse_toml_value(val)),
        [section, field] => {
            if doc.get(section).is_none() {
                doc[*section] = toml_edit::table();
            }
            doc[*section][*field] = value(parse_toml_value(val));
        }
        _ => bail!("Key too deep: {}. Max depth is section.key", key),
    }

    let updated = doc.to_string();
    toml::from_str::<Config>(&updated)
        .with_context(|| format!("{} = {} is not a valid setting", key, val))?;

    fs::write(path, updated)?;
    Ok(())
}

/// Get a config value by dot notation key
fn get_config_value(path: &Path, key: &str) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let doc: toml::Value = content.parse().context("Failed to parse config.toml")?;

    let val = match key.split('.').collect::<Vec<_>>().as_slice() {
        [top] => doc.get(top),
        [section, field] => doc.get(section).and_then(|t| t.get(field)),
        _ => None,
    };

    Ok(val.map(|v| match v {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }))
}

/// Parse string value to appropriate TOML type
fn parse_toml_value(s: &str) -> toml_edit::Value {
    if let Ok(b) = s.parse::<bool>() {
        return b.into();
    }
    if let Ok(i) = s.parse::<i64>() {
        return i.into();
    }
    if let Ok(f) = s.parse::<f64>() {
        return f.into();
    }
    s.into()
}
