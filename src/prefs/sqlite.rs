use super::{PrefValue, PreferenceStore};
use crate::db::Database;
use crate::error::AppError;
use rusqlite::{params, OptionalExtension};
use std::time::{SystemTime, UNIX_EPOCH};

fn current_timestamp() -> i64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    i64::try_from(secs).unwrap_or(i64::MAX)
}

/// Preferences persisted in the profile database, one JSON-encoded value per row.
pub struct SqlitePreferences {
    db: Database,
}

impl SqlitePreferences {
    /// The database must already be migrated.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl PreferenceStore for SqlitePreferences {
    fn get(&self, name: &str) -> Result<Option<PrefValue>, AppError> {
        let raw: Option<String> = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM preferences WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| AppError::MalformedPreference {
                    name: name.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn set(&mut self, name: &str, value: PrefValue) -> Result<(), AppError> {
        let encoded = serde_json::to_string(&value)?;
        self.db.connection().execute(
            "INSERT INTO preferences (name, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![name, encoded, current_timestamp()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PREF_DELAY_MINUTES, PREF_ENABLED};
    use crate::test_utils::setup_test_db;

    #[test]
    fn test_reads_seeded_defaults() {
        let (db, _dir) = setup_test_db();
        let prefs = SqlitePreferences::new(db);

        assert_eq!(prefs.get(PREF_ENABLED).unwrap(), Some(PrefValue::Bool(true)));
        assert_eq!(prefs.get(PREF_DELAY_MINUTES).unwrap(), Some(PrefValue::Int(5)));
    }

    #[test]
    fn test_missing_preference_is_none() {
        let (db, _dir) = setup_test_db();
        let prefs = SqlitePreferences::new(db);

        assert_eq!(prefs.get("extensions.memflow.unknown").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites_existing_value() {
        let (db, _dir) = setup_test_db();
        let mut prefs = SqlitePreferences::new(db);

        prefs.set(PREF_DELAY_MINUTES, PrefValue::Int(30)).unwrap();
        prefs.set(PREF_ENABLED, PrefValue::Bool(false)).unwrap();

        assert_eq!(prefs.get(PREF_DELAY_MINUTES).unwrap(), Some(PrefValue::Int(30)));
        assert_eq!(prefs.get(PREF_ENABLED).unwrap(), Some(PrefValue::Bool(false)));

        let rows: i32 = prefs.database().connection()
            .query_row("SELECT COUNT(*) FROM preferences", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_undecodable_row_is_an_error() {
        let (db, _dir) = setup_test_db();
        db.connection()
            .execute(
                "UPDATE preferences SET value = 'not json' WHERE name = ?1",
                [PREF_DELAY_MINUTES],
            )
            .unwrap();
        let prefs = SqlitePreferences::new(db);

        let err = prefs.get(PREF_DELAY_MINUTES).unwrap_err();
        assert!(matches!(err, AppError::MalformedPreference { .. }));
    }
}
