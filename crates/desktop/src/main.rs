mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lorekeeper_desktop::{Config, SqliteStore};

#[derive(Parser)]
#[command(name = "lorekeeper")]
#[command(about = "Track finished games and media, earn achievements and level up")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to lorekeeper.toml)
    #[arg(short, long, global = true, env = "LOREKEEPER_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, overriding the configured folder
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-evaluate achievements and rewrite XP and level
    Recompute {
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current level and XP progress
    Profile,

    /// List achievements, unlocked first
    Achievements,

    /// Show collection statistics and breakdowns by year, rating, platform and genre
    Stats {
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which level a given XP total reaches
    Level {
        /// Total XP
        xp: u64,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "lorekeeper=debug,lorekeeper_core=debug,lorekeeper_desktop=debug"
    } else {
        "lorekeeper=info,lorekeeper_core=info,lorekeeper_desktop=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Level { xp } => commands::level(&mut out, xp),
        Commands::Recompute { json } => {
            commands::recompute(&mut out, &open_store(cli.db, cli.config.as_deref())?, json)
        }
        Commands::Profile => {
            commands::profile(&mut out, &open_store(cli.db, cli.config.as_deref())?)
        }
        Commands::Achievements => {
            commands::achievements(&mut out, &open_store(cli.db, cli.config.as_deref())?)
        }
        Commands::Stats { json } => {
            commands::stats(&mut out, &open_store(cli.db, cli.config.as_deref())?, json)
        }
    }
}

/// Open the database named on the command line, or the one the config points at
fn open_store(db: Option<PathBuf>, config: Option<&Path>) -> Result<SqliteStore> {
    let db_path = match db {
        Some(path) => path,
        None => Config::load(&Config::locate(config)).resolve_db_path(),
    };
    SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))
}
