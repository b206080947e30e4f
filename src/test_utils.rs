//! Shared test utilities for MemFlow.
//!
//! Setup helpers and fakes for the host-facing traits.

#![cfg(test)]

use crate::db::{migrations, Database};
use crate::eligibility::{ReaderInfo, ReaderLookup};
use crate::error::AppError;
use crate::models::TabId;
use crate::prefs::{PrefValue, PreferenceStore};
use crate::release::ReleaseInvoker;
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tokio::time::Instant;

/// Create a temporary test database with migrations applied.
///
/// Returns a tuple of (Database, TempDir). The TempDir must be kept alive
/// for the duration of the test to prevent the database file from being deleted.
pub fn setup_test_db() -> (Database, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test DB");
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).expect("Failed to open test database");
    migrations::run(db.connection()).expect("Failed to run migrations on test DB");
    (db, dir)
}

pub fn tab(id: &str) -> TabId {
    TabId::new(id).expect("test tab ids are non-empty")
}

/// Assert that `expected` has passed on the (paused) clock, allowing for
/// the timer wheel's millisecond rounding.
pub fn assert_elapsed(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed <= expected + Duration::from_millis(5),
        "expected ~{expected:?} to have elapsed, got {elapsed:?}"
    );
}

/// A store whose every operation fails.
pub struct FailingPreferences;

impl PreferenceStore for FailingPreferences {
    fn get(&self, _name: &str) -> Result<Option<PrefValue>, AppError> {
        Err(AppError::Database(rusqlite::Error::InvalidQuery))
    }

    fn set(&mut self, _name: &str, _value: PrefValue) -> Result<(), AppError> {
        Err(AppError::Database(rusqlite::Error::InvalidQuery))
    }
}

/// A lookup that can never classify anything.
pub struct FailingLookup;

impl ReaderLookup for FailingLookup {
    fn classify(&self, tab_id: &TabId) -> Result<Option<ReaderInfo>, AppError> {
        Err(AppError::LookupFailed {
            tab_id: tab_id.to_string(),
            reason: "reader API unavailable".into(),
        })
    }
}

/// Remembers every tab it was asked to release, in order.
#[derive(Debug, Default)]
pub struct RecordingRelease {
    pub released: Vec<TabId>,
}

impl ReleaseInvoker for RecordingRelease {
    fn invoke(&mut self, tab_id: &TabId) {
        self.released.push(tab_id.clone());
    }
}
