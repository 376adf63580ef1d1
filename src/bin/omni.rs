use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use omni_layout::common::config::{Config, config_file};
use omni_layout::common::log;
use omni_layout::layout_engine::replay::{self, Record};
use omni_layout::layout_engine::{LayoutEvent, NoopHost, OmniLayout};
use tracing::{debug, info};

#[derive(Parser)]
struct Cli {
    /// Check the configuration file and exit.
    #[arg(long)]
    validate: bool,

    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild a layout from a recorded event log and print it.
    Replay {
        file: PathBuf,

        /// Print the final layout as JSON instead of a tree.
        #[arg(long)]
        json: bool,
    },
    /// Drive a layout with RON events read from stdin, recording them to FILE.
    /// Overwrites the file if it exists.
    Record { file: PathBuf },
}

fn main() {
    sigpipe::reset();
    let opt = Cli::parse();
    log::init_logging();

    let config_path = opt.config.clone().unwrap_or_else(config_file);
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {e:#}", config_path.display());
            process::exit(1);
        }
    };

    if opt.validate {
        let issues = config.validate();
        if issues.is_empty() {
            println!("Config validation passed");
        } else {
            for issue in issues {
                eprintln!("{}", issue);
            }
            process::exit(1);
        }
        return;
    }

    let result = match opt.command {
        Some(Commands::Replay { file, json }) => run_replay(&file, json),
        Some(Commands::Record { file }) => run_record(config, &file),
        None => {
            println!("{}", OmniLayout::detached(config.settings).draw_tree());
            Ok(())
        }
    };
    if let Err(e) = result {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        Config::read(path)
    } else {
        debug!(path = %path.display(), "No config file; using defaults");
        Config::from_defaults()
    }
}

fn run_replay(file: &Path, json: bool) -> anyhow::Result<()> {
    let layout = replay::replay(file, NoopHost, |event, layout| {
        debug!(?event);
        debug!("{}", layout.draw_tree());
    })
    .with_context(|| format!("replaying {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&layout.info())?);
    } else {
        println!("{}", layout.draw_tree());
    }
    Ok(())
}

fn run_record(config: Config, file: &Path) -> anyhow::Result<()> {
    let mut record = Record::new(Some(file))?;
    record.start(&config.settings)?;
    let mut layout = OmniLayout::detached(config.settings);

    for (idx, line) in std::io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: LayoutEvent =
            ron::from_str(&line).with_context(|| format!("stdin line {}", idx + 1))?;
        record.on_event(&event)?;
        let response = layout.handle_event(event);
        if let Some(wid) = response.focus_window {
            info!(%wid, "Focus");
        }
    }

    println!("{}", layout.draw_tree());
    Ok(())
}
