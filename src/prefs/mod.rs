//! Preference storage shared with the host plugin.
//!
//! The store is deliberately loosely typed: the host writes whatever its
//! preferences pane produced, and readers such as [`crate::config::ConfigGate`]
//! decide what counts as a usable value.

mod sqlite;

pub use sqlite::SqlitePreferences;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single stored preference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PrefValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            PrefValue::Int(_) | PrefValue::Float(_) | PrefValue::Text(_) => None,
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{b}"),
            PrefValue::Int(i) => write!(f, "{i}"),
            PrefValue::Float(x) => write!(f, "{x}"),
            PrefValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Key/value preference store.
///
/// `get` returns `Ok(None)` for a name that was never set; errors are
/// reserved for a store that could not be read at all.
pub trait PreferenceStore {
    fn get(&self, name: &str) -> Result<Option<PrefValue>, AppError>;
    fn set(&mut self, name: &str, value: PrefValue) -> Result<(), AppError>;
}

/// In-memory store, used when no profile database is wanted.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: HashMap<String, PrefValue>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: PrefValue) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<PrefValue> {
        self.values.remove(name)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, name: &str) -> Result<Option<PrefValue>, AppError> {
        Ok(self.values.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: PrefValue) -> Result<(), AppError> {
        self.values.insert(name.to_string(), value);
        Ok(())
    }
}
