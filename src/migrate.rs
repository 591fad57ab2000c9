//! The migration itself
//!
//! `ColumnMigrator` performs one run: inspect the current column set of the
//! target table, add the configured column when it is absent, and re-read
//! the column set for operator confirmation. The schema change runs inside
//! a transaction; on any error the transaction is dropped without commit,
//! so no partial schema state persists.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing::{debug, info};

use crate::config::MigrateConfig;
use crate::database::{table_columns, ColumnSet, DatabaseConn};

/// Result of a migration run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The column was missing and has been added
    Applied,

    /// The column already existed; nothing was changed
    AlreadyPresent,
}

/// One-shot migrator for a single additive column change
///
/// Re-adding an existing column is rejected by SQLite, so presence is
/// checked first; the run is idempotent at the observable-outcome level.
pub struct ColumnMigrator<'a> {
    db: &'a DatabaseConn,
    config: &'a MigrateConfig,
}

impl<'a> ColumnMigrator<'a> {
    pub fn new(db: &'a DatabaseConn, config: &'a MigrateConfig) -> Self {
        Self { db, config }
    }

    /// Find the database file among the candidate paths
    ///
    /// Checks each candidate in listed order and returns the first that
    /// exists. `None` means no database was found and nothing should run.
    pub fn locate(candidates: &[PathBuf]) -> Option<PathBuf> {
        for candidate in candidates {
            info!("Checking candidate database path: {}", candidate.display());
            if candidate.exists() {
                return Some(candidate.clone());
            }
        }
        None
    }

    /// Read the current column set of the target table
    pub fn inspect(&self) -> Result<ColumnSet> {
        table_columns(&self.db.conn, &self.config.table)
    }

    /// Add the configured column if it is absent
    ///
    /// The presence check and the `ALTER TABLE` run in one transaction;
    /// the change is committed only when the statement succeeds.
    pub fn ensure_column(&self) -> Result<MigrationOutcome> {
        let tx = self.db.transaction()?;

        let columns = table_columns(&tx, &self.config.table)?;
        if columns.contains(&self.config.column) {
            debug!(
                "Column '{}' already present in '{}', skipping",
                self.config.column, self.config.table
            );
            return Ok(MigrationOutcome::AlreadyPresent);
        }

        // nullable, no default: existing rows get NULL for the new column
        let sql = format!(
            r#"ALTER TABLE "{}" ADD COLUMN "{}" {}"#,
            self.config.table, self.config.column, self.config.column_type
        );
        tx.execute(&sql, []).map_err(|e| {
            anyhow!(
                "Failed to add column '{}' to '{}': {}",
                self.config.column,
                self.config.table,
                e
            )
        })?;

        tx.commit()
            .map_err(|e| anyhow!("Failed to commit schema change: {}", e))?;

        info!(
            "Added column '{}' {} to table '{}'",
            self.config.column, self.config.column_type, self.config.table
        );
        Ok(MigrationOutcome::Applied)
    }

    /// Re-read the column set after the operation
    pub fn report(&self) -> Result<ColumnSet> {
        table_columns(&self.db.conn, &self.config.table)
    }

    /// Perform the full run: inspect, ensure the column, report
    pub fn run(&self) -> Result<MigrationOutcome> {
        let before = self.inspect()?;
        println!("Current columns of {}: {}", self.config.table, before);

        let outcome = self.ensure_column()?;
        match outcome {
            MigrationOutcome::Applied => {
                println!(
                    "Added column {} ({})",
                    self.config.column, self.config.column_type
                );
            }
            MigrationOutcome::AlreadyPresent => {
                println!(
                    "Column {} already exists, no changes needed",
                    self.config.column
                );
            }
        }

        let after = self.report()?;
        println!("Final columns of {}: {}", self.config.table, after);

        Ok(outcome)
    }
}
