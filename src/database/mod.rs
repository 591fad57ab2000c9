//! Database module
//!
//! This module provides the SQLite access layer for the migration:
//!
//! - **connection**: SQLite `DatabaseConn` wrapper
//! - **schema**: table metadata inspection (`ColumnSet`)
//!
//! The connection is exclusively owned for the duration of the run and
//! released when dropped, whether the migration succeeds or fails.

pub mod connection;
pub mod schema;

pub use connection::{table_exists, DatabaseConn};
pub use schema::{table_columns, ColumnSet};
