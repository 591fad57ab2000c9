//! Table metadata inspection
//!
//! Reads the ordered column list of a table so the migration can decide
//! whether the additive change is still needed and confirm it afterwards.

use std::fmt;

use anyhow::{anyhow, Result};
use rusqlite::Connection;

use crate::database::connection::table_exists;

/// Ordered snapshot of a table's column names
///
/// Read-only; re-fetch after a schema change to observe the effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    table: String,
    columns: Vec<String>,
}

impl ColumnSet {
    /// Name of the table this snapshot was taken from
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Column names in the order SQLite reports them
    pub fn names(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl fmt::Display for ColumnSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.columns.join(", "))
    }
}

/// Read the current column set of a table
///
/// Fails if the table does not exist. Takes a plain [`Connection`] so it can
/// run both on the owned connection and inside an open transaction.
pub fn table_columns(conn: &Connection, table: &str) -> Result<ColumnSet> {
    if !table_exists(conn, table)? {
        return Err(anyhow!("Table '{}' does not exist in the database", table));
    }

    // pragma_table_info is the table-valued form of PRAGMA table_info and
    // accepts bound parameters
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
        .map_err(|e| anyhow!("Failed to prepare table_info query: {}", e))?;

    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .map_err(|e| anyhow!("Failed to query table_info for '{}': {}", table, e))?
        .collect::<Result<Vec<String>, _>>()
        .map_err(|e| anyhow!("Failed to read column names for '{}': {}", table, e))?;

    Ok(ColumnSet {
        table: table.to_string(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE payment_setting (id INTEGER PRIMARY KEY, user_id INTEGER, platega_enabled INTEGER)",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_table_columns_ordered() {
        let conn = create_test_db();

        let columns = table_columns(&conn, "payment_setting").unwrap();
        assert_eq!(columns.names(), ["id", "user_id", "platega_enabled"]);
        assert_eq!(columns.table(), "payment_setting");
        assert_eq!(columns.len(), 3);
    }

    #[test]
    fn test_table_columns_missing_table() {
        let conn = create_test_db();

        let result = table_columns(&conn, "nonexistent");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("does not exist"));
    }

    #[test]
    fn test_contains() {
        let conn = create_test_db();

        let columns = table_columns(&conn, "payment_setting").unwrap();
        assert!(columns.contains("user_id"));
        assert!(!columns.contains("platega_allowed_methods"));
    }

    #[test]
    fn test_display_comma_joined() {
        let conn = create_test_db();

        let columns = table_columns(&conn, "payment_setting").unwrap();
        assert_eq!(columns.to_string(), "id, user_id, platega_enabled");
    }
}
