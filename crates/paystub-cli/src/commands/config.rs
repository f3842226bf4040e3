//! Config command - inspect and create paystub settings.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use console::style;
use serde_json::Value;

use paystub_core::PaystubConfig;

use super::load_config;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration, or one section of it
    Show {
        /// Section to show
        #[arg(value_enum)]
        section: Option<Section>,
    },

    /// Write a configuration file with the default settings
    Init(InitArgs),

    /// Print one setting by its dotted key (e.g. "conversion.cache_dir")
    Get { key: String },

    /// Show where the configuration file is read from
    Path,
}

/// Top-level configuration sections.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Section {
    Input,
    Conversion,
    Output,
}

impl Section {
    fn key(self) -> &'static str {
        match self {
            Section::Input => "input",
            Section::Conversion => "conversion",
            Section::Output => "output",
        }
    }
}

#[derive(Args)]
struct InitArgs {
    /// Where to write the file (defaults to the user config directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { section } => show(config_path, section),
        ConfigCommand::Init(init_args) => init(init_args),
        ConfigCommand::Get { key } => get(config_path, &key),
        ConfigCommand::Path => path(config_path),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paystub")
        .join("config.json")
}

/// Effective settings (after `--config` or the default file) as JSON.
fn effective(config_path: Option<&str>) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(load_config(config_path)?)?)
}

fn show(config_path: Option<&str>, section: Option<Section>) -> anyhow::Result<()> {
    let settings = effective(config_path)?;
    let shown = match section {
        Some(section) => lookup(&settings, section.key())?,
        None => &settings,
    };

    println!("{}", serde_json::to_string_pretty(shown)?);
    Ok(())
}

fn init(args: InitArgs) -> anyhow::Result<()> {
    let target = args.output.unwrap_or_else(default_config_path);

    if target.exists() && !args.force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            target.display()
        );
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    PaystubConfig::default().save(&target)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        target.display()
    );
    Ok(())
}

fn get(config_path: Option<&str>, key: &str) -> anyhow::Result<()> {
    let settings = effective(config_path)?;
    println!("{}", serde_json::to_string_pretty(lookup(&settings, key)?)?);
    Ok(())
}

fn path(config_path: Option<&str>) -> anyhow::Result<()> {
    let (file, source) = match config_path {
        Some(p) => (PathBuf::from(p), "--config"),
        None => (default_config_path(), "default"),
    };

    println!("Configuration file ({}): {}", source, file.display());
    if file.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!("Built-in defaults apply. Run 'paystub config init' to write them out.");
    }
    Ok(())
}

/// Resolve a dotted key; unknown keys report every valid one.
fn lookup<'v>(settings: &'v Value, key: &str) -> anyhow::Result<&'v Value> {
    key.split('.')
        .try_fold(settings, |node, part| node.get(part))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown setting '{}'. Valid keys: {}",
                key,
                setting_keys(settings).join(", ")
            )
        })
}

/// Dotted keys of every leaf setting, sorted.
fn setting_keys(settings: &Value) -> Vec<String> {
    fn walk(prefix: &str, node: &Value, keys: &mut Vec<String>) {
        match node {
            Value::Object(fields) => {
                for (name, child) in fields {
                    let key = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{}.{}", prefix, name)
                    };
                    walk(&key, child, keys);
                }
            }
            _ => keys.push(prefix.to_string()),
        }
    }

    let mut keys = Vec::new();
    walk("", settings, &mut keys);
    keys
}
