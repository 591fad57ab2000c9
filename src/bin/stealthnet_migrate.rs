use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use stealthnet_migrate::{ColumnMigrator, DatabaseConn, MigrateConfig};
use tracing::Level;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// configuration file path, by default $HOME/.stealthnet-migrate.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Database file path; skips the candidate scan
    #[clap(long)]
    db: Option<PathBuf>,

    /// Print debug information
    #[clap(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    }

    if let Err(e) = run(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // load .env before the environment config source is read
    dotenvy::dotenv().ok();

    let mut config = MigrateConfig::new(&cli.config)?;
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }

    let db_path = match &config.database_path {
        Some(path) => {
            if !path.exists() {
                bail!("Database not found at '{}'", path.display());
            }
            path.clone()
        }
        None => ColumnMigrator::locate(&config.candidate_paths).ok_or_else(|| {
            anyhow!(
                "No database found; checked: {}",
                config
                    .candidate_paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?,
    };

    let shown_path = std::fs::canonicalize(&db_path).unwrap_or_else(|_| db_path.clone());
    println!("Using database: {}", shown_path.display());

    let db = DatabaseConn::open_path(&db_path.to_string_lossy())?;
    ColumnMigrator::new(&db, &config).run()?;

    Ok(())
}
