pub mod config;
pub mod constants;
pub mod db;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod native_host;
pub mod notify;
pub mod orchestrator;
pub mod prefs;
pub mod release;
#[cfg(test)]
mod test_utils;
pub mod timers;
pub mod tracker;
pub mod validation;

use crate::db::{migrations, Database};
use crate::prefs::SqlitePreferences;
use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::models::TabId;
pub use crate::orchestrator::Orchestrator;

/// Error type for MemFlow initialization failures
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Could not determine project directories")]
    NoProjectDirs,
    #[error("Could not create data directory: {0}")]
    DataDirCreation(std::io::Error),
    #[error("Failed to open database: {0}")]
    DatabaseOpen(rusqlite::Error),
    #[error("Failed to run database migrations: {0}")]
    Migration(rusqlite::Error),
}

/// Location of the preference database, creating the data directory if needed.
pub fn get_db_path() -> Result<PathBuf, InitError> {
    let proj_dirs = ProjectDirs::from("org", "memflow", "MemFlow")
        .ok_or(InitError::NoProjectDirs)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(InitError::DataDirCreation)?;
    Ok(data_dir.join("memflow.db"))
}

/// Open and migrate the preference database at `path`.
pub fn open_preferences(path: &std::path::Path) -> Result<SqlitePreferences, InitError> {
    let db = Database::open(path).map_err(InitError::DatabaseOpen)?;
    migrations::run(db.connection()).map_err(InitError::Migration)?;
    Ok(SqlitePreferences::new(db))
}
