//! Configuration for the migration run
//!
//! The database lookup order and the schema contract (table, column, column
//! type) default to the values the stealthnet deployment uses, but all of
//! them can be overridden through a TOML file or `STEALTHNET_MIGRATE_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use config::Config;
use serde::Deserialize;

/// Database file lookup order, first existing path wins.
pub const DEFAULT_CANDIDATE_PATHS: &[&str] = &[
    "instance/stealthnet.db",
    "stealthnet.db",
    "/var/www/stealthnet-api/instance/stealthnet.db",
    "/var/www/stealthnet-api/stealthnet.db",
];

/// Table that receives the new column. Must already exist in the database.
pub const DEFAULT_TABLE: &str = "payment_setting";

/// Column added by this migration (nullable, no default value).
pub const DEFAULT_COLUMN: &str = "platega_allowed_methods";

/// Declared SQLite type of the new column.
pub const DEFAULT_COLUMN_TYPE: &str = "TEXT";

const EMPTY_CONFIG: &str = r#"### stealthnet-migrate configuration file

### explicit database path; when set, the candidate scan is skipped
# database_path = "/var/www/stealthnet-api/instance/stealthnet.db"

### candidate database paths, checked in order, first existing wins
# candidate_paths = [
#     "instance/stealthnet.db",
#     "stealthnet.db",
#     "/var/www/stealthnet-api/instance/stealthnet.db",
#     "/var/www/stealthnet-api/stealthnet.db",
# ]

### schema contract
# table = "payment_setting"
# column = "platega_allowed_methods"
# column_type = "TEXT"
"#;

/// Settings as they appear in the TOML file / environment.
///
/// Every field is optional; missing values fall back to the stealthnet
/// deployment defaults.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    database_path: Option<String>,
    candidate_paths: Option<Vec<String>>,
    table: Option<String>,
    column: Option<String>,
    column_type: Option<String>,
}

pub struct MigrateConfig {
    /// Explicit database path; skips the candidate scan when set
    pub database_path: Option<PathBuf>,

    /// Candidate database paths, checked in order
    pub candidate_paths: Vec<PathBuf>,

    /// Table that receives the new column
    pub table: String,

    /// Column to add when absent
    pub column: String,

    /// Declared type of the new column
    pub column_type: String,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            candidate_paths: DEFAULT_CANDIDATE_PATHS.iter().map(PathBuf::from).collect(),
            table: DEFAULT_TABLE.to_string(),
            column: DEFAULT_COLUMN.to_string(),
            column_type: DEFAULT_COLUMN_TYPE.to_string(),
        }
    }
}

impl MigrateConfig {
    /// Function to create and initialize a new configuration
    ///
    /// When `path` is given but does not exist yet, a commented template is
    /// written there and defaults are used. Without an explicit path,
    /// `$HOME/.stealthnet-migrate.toml` is read if present; the tool never
    /// creates files under the home directory on its own.
    pub fn new(path: &Option<String>) -> Result<MigrateConfig> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                if let Some(home_dir) = dirs::home_dir() {
                    let default_path = home_dir.join(".stealthnet-migrate.toml");
                    if default_path.exists() {
                        let path_str = default_path
                            .to_str()
                            .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                        builder = builder.add_source(config::File::with_name(path_str));
                    }
                }
            }
        }

        // Add in settings from the environment (with a prefix of STEALTHNET_MIGRATE)
        // E.g., `STEALTHNET_MIGRATE_DATABASE_PATH=./stealthnet.db stealthnet-migrate`
        // would point the migration at a specific database file
        builder = builder.add_source(config::Environment::with_prefix("STEALTHNET_MIGRATE"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let file_settings = settings
            .try_deserialize::<FileSettings>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        let defaults = MigrateConfig::default();

        Ok(MigrateConfig {
            database_path: file_settings.database_path.map(PathBuf::from),
            candidate_paths: match file_settings.candidate_paths {
                Some(paths) => paths.into_iter().map(PathBuf::from).collect(),
                None => defaults.candidate_paths,
            },
            table: file_settings.table.unwrap_or(defaults.table),
            column: file_settings.column.unwrap_or(defaults.column),
            column_type: file_settings.column_type.unwrap_or(defaults.column_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookup_order() {
        let config = MigrateConfig::default();

        assert_eq!(
            config.candidate_paths,
            vec![
                PathBuf::from("instance/stealthnet.db"),
                PathBuf::from("stealthnet.db"),
                PathBuf::from("/var/www/stealthnet-api/instance/stealthnet.db"),
                PathBuf::from("/var/www/stealthnet-api/stealthnet.db"),
            ]
        );
        assert_eq!(config.database_path, None);
    }

    #[test]
    fn test_default_schema_contract() {
        let config = MigrateConfig::default();

        assert_eq!(config.table, "payment_setting");
        assert_eq!(config.column, "platega_allowed_methods");
        assert_eq!(config.column_type, "TEXT");
    }

    #[test]
    fn test_config_file_overrides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("migrate.toml");
        std::fs::write(
            &config_path,
            r#"
database_path = "/srv/stealthnet/stealthnet.db"
table = "payment_setting_v2"
"#,
        )
        .unwrap();

        let config =
            MigrateConfig::new(&Some(config_path.to_string_lossy().to_string())).unwrap();

        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/srv/stealthnet/stealthnet.db"))
        );
        assert_eq!(config.table, "payment_setting_v2");
        // untouched keys keep their defaults
        assert_eq!(config.column, "platega_allowed_methods");
        assert_eq!(config.candidate_paths.len(), 4);
    }

    #[test]
    fn test_environment_overrides_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("migrate.toml");
        std::fs::write(&config_path, "column_type = \"VARCHAR(64)\"\n").unwrap();

        // no other test asserts column_type through MigrateConfig::new, so
        // this process-global variable cannot race a parallel test
        std::env::set_var("STEALTHNET_MIGRATE_COLUMN_TYPE", "BLOB");
        let config =
            MigrateConfig::new(&Some(config_path.to_string_lossy().to_string())).unwrap();
        std::env::remove_var("STEALTHNET_MIGRATE_COLUMN_TYPE");

        // the environment source is added after the file source and wins
        assert_eq!(config.column_type, "BLOB");
    }

    #[test]
    fn test_missing_config_file_writes_template() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("fresh.toml");

        let config =
            MigrateConfig::new(&Some(config_path.to_string_lossy().to_string())).unwrap();

        assert!(config_path.exists());
        assert_eq!(config.table, "payment_setting");
    }
}
