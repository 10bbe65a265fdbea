#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives grid stash sessions from the terminal.

mod ascii;
mod config;
mod layout_transfer;
mod recipes;
mod script;
mod workspace;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::StashConfig,
    script::{DragStep, DEMO_SCRIPT},
    workspace::Workspace,
};

#[derive(Debug, Parser)]
#[command(name = "grid-stash", version, about = "Grid inventory sessions in the terminal")]
struct Cli {
    /// TOML file describing containers, items and starting loot.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Packs the starting loot and prints every container.
    Pack,
    /// Packs the starting loot, then plays pointer steps against it.
    Drag {
        /// Steps such as `pick:backpack:0:0`, `hover:304:48` or `release`.
        steps: Vec<DragStep>,
    },
    /// Packs the starting loot and presses the bench's craft button.
    Craft,
    /// Restores an exported layout into empty containers.
    Import {
        /// Layout string printed by the other commands.
        layout: String,
    },
}

/// Entry point for the grid stash command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    install_logging(&cli.log_level)?;

    let config = StashConfig::load(cli.config.as_deref())?;
    let mut workspace = Workspace::from_config(&config)?;

    match cli.command {
        Command::Pack => {
            report_unplaced(workspace.pack_loot(&config)?);
        }
        Command::Drag { steps } => {
            report_unplaced(workspace.pack_loot(&config)?);
            let steps = if steps.is_empty() {
                DEMO_SCRIPT
                    .iter()
                    .map(|step| step.parse())
                    .collect::<Result<Vec<DragStep>, _>>()?
            } else {
                steps
            };
            for step in &steps {
                let summary = workspace.apply(step)?;
                println!("{step}: {summary}");
            }
            println!();
        }
        Command::Craft => {
            report_unplaced(workspace.pack_loot(&config)?);
            let report = workspace.craft()?;
            if report.crafted {
                println!(
                    "crafted {} item(s), {} left over",
                    report.produced.len(),
                    report.unplaced.len()
                );
            } else {
                println!("nothing crafted");
            }
            println!();
        }
        Command::Import { layout } => {
            let restored = workspace
                .import(&layout)
                .context("failed to import layout")?;
            info!(restored, "layout imported");
        }
    }

    print!("{}", workspace.render());
    if !workspace.is_consistent() {
        warn!("occupancy does not match placed items");
    }
    println!("\nlayout: {}", workspace.export());
    Ok(())
}

fn install_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log filter `{level}`"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn report_unplaced(count: usize) {
    if count > 0 {
        warn!(count, "starting loot did not fit");
    }
}
