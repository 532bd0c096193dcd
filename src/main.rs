//! Binary entrypoint for the twoslotmags CLI.
//!
//! Commands:
//! - `init [--force]` - write a starter `config.toml`
//! - `resize [--items <path>] [--output <path>] [--dry-run]` - downsize extended
//!   magazines in the item table and write it back
//!
//! See the library crate docs for module-level details: `twoslotmags::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::Path;

use twoslotmags::config::Config;
use twoslotmags::items::ItemDatabase;
use twoslotmags::logutil::init_logging;
use twoslotmags::mods::{ModHost, TwoSlotExtendedMags};

#[derive(Parser)]
#[command(name = "twoslotmags")]
#[command(about = "Downsize extended magazines to two inventory slots")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Downsize extended magazines in the item table
    Resize {
        /// Item table to read (overrides `database.items_path`)
        #[arg(short, long)]
        items: Option<String>,

        /// Where to write the patched table (defaults to the input file)
        #[arg(short, long)]
        output: Option<String>,

        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            init_logging(None, cli.verbose);
            if Path::new(&cli.config).exists() && !force {
                warn!(
                    "{} already exists; pass --force to overwrite it",
                    cli.config
                );
                return Ok(());
            }
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Resize {
            items,
            output,
            dry_run,
        } => {
            let (config, defaulted) = Config::load_or_default(&cli.config).await?;
            init_logging(Some(&config.logging), cli.verbose);
            if defaulted {
                warn!("{} not found; using default settings", cli.config);
            }
            info!("Starting twoslotmags v{}", env!("CARGO_PKG_VERSION"));

            let items_path = items.unwrap_or_else(|| config.database.items_path.clone());
            let output_path = output
                .or_else(|| config.database.output_path.clone())
                .unwrap_or_else(|| items_path.clone());

            let mut db = ItemDatabase::load(&items_path, config.database.max_file_bytes)?;
            info!("Loaded {} item templates from {}", db.len(), items_path);

            let mut host = ModHost::new();
            host.register(Box::new(
                TwoSlotExtendedMags::new(&config.resizer).with_dry_run(dry_run),
            ));
            let outcomes = host.run_post_db_load(&mut db)?;

            if dry_run {
                for outcome in &outcomes {
                    for id in &outcome.changed_ids {
                        println!("{}", id);
                    }
                }
            } else {
                db.save(&output_path)?;
                info!("Item table written to {}", output_path);
            }

            for outcome in &outcomes {
                println!(
                    "{}: {} item(s) {}",
                    outcome.mod_name,
                    outcome.items_changed,
                    if outcome.dry_run { "would change" } else { "changed" }
                );
            }
        }
    }

    Ok(())
}
