use rusqlite::{params, Connection, Result};
use super::schema::SCHEMA;
use crate::constants::{PREF_DELAY_MINUTES, PREF_ENABLED, SEEDED_DELAY_MINUTES};
use crate::prefs::PrefValue;

/// Preferences a fresh profile starts with.
pub fn default_preferences() -> [(&'static str, PrefValue); 2] {
    [
        (PREF_ENABLED, PrefValue::Bool(true)),
        (PREF_DELAY_MINUTES, PrefValue::Int(SEEDED_DELAY_MINUTES)),
    ]
}

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    seed_default_preferences(conn)?;
    Ok(())
}

fn seed_default_preferences(conn: &Connection) -> Result<()> {
    for (name, value) in default_preferences() {
        let encoded = serde_json::to_string(&value)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        // Never overwrite a value the user already chose
        conn.execute(
            "INSERT OR IGNORE INTO preferences (name, value, updated_at) VALUES (?1, ?2, 0)",
            params![name, encoded],
        )?;
    }
    Ok(())
}
