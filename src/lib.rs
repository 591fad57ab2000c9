#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! stealthnet-migrate - a one-shot schema migration for the stealthnet database
//!
//! This crate adds the `platega_allowed_methods` column to the
//! `payment_setting` table of a local stealthnet SQLite database. It locates
//! the database file from an ordered candidate list, inspects the current
//! column set, applies the additive change only when the column is missing,
//! and reports the final column set.
//!
//! # Architecture
//!
//! - **[`config`]**: candidate paths and schema-contract settings
//!   (TOML file + `STEALTHNET_MIGRATE_*` environment overrides)
//! - **[`database`]**: SQLite connection wrapper and table-metadata inspection
//! - **[`migrate`]**: the `ColumnMigrator` that performs the run
//!
//! # Usage
//!
//! ```rust,ignore
//! use stealthnet_migrate::{ColumnMigrator, DatabaseConn, MigrateConfig};
//!
//! let config = MigrateConfig::default();
//! let path = ColumnMigrator::locate(&config.candidate_paths)
//!     .ok_or_else(|| anyhow::anyhow!("no database found"))?;
//!
//! let db = DatabaseConn::open_path(&path.to_string_lossy())?;
//! let outcome = ColumnMigrator::new(&db, &config).run()?;
//! ```

pub mod config;
pub mod database;
pub mod migrate;

pub use config::MigrateConfig;

pub use database::{ColumnSet, DatabaseConn};

pub use migrate::{ColumnMigrator, MigrationOutcome};
