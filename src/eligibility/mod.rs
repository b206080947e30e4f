//! Which tabs are worth releasing.

use crate::constants::ELIGIBLE_READER_TYPE;
use crate::error::AppError;
use crate::models::TabId;
use log::{debug, warn};
use std::collections::HashMap;

/// What the host reports about the reader shown in a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderInfo {
    pub reader_type: String,
}

/// Host-side lookup of the reader attached to a tab.
///
/// `Ok(None)` means the tab is not a reader tab at all.
pub trait ReaderLookup {
    fn classify(&self, tab_id: &TabId) -> Result<Option<ReaderInfo>, AppError>;
}

/// True only for tabs whose reader is a PDF reader. Lookup failures count
/// as "not eligible".
pub fn is_pdf_reader<L: ReaderLookup + ?Sized>(lookup: &L, tab_id: &TabId) -> bool {
    match lookup.classify(tab_id) {
        Ok(Some(reader)) if reader.reader_type == ELIGIBLE_READER_TYPE => true,
        Ok(Some(reader)) => {
            debug!(
                "Tab {tab_id} is a reader, but not PDF type ({}). Skipping timer.",
                reader.reader_type
            );
            false
        }
        Ok(None) => {
            debug!("Tab {tab_id} is not a reader tab. Skipping timer.");
            false
        }
        Err(e) => {
            warn!("Reader lookup failed for tab {tab_id}: {e}");
            false
        }
    }
}

/// Reader classifications reported by the host, keyed by tab.
#[derive(Debug, Default)]
pub struct ReaderDirectory {
    readers: HashMap<TabId, ReaderInfo>,
}

impl ReaderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reader type of a tab; `None` marks it as a non-reader tab.
    pub fn record(&mut self, tab_id: TabId, reader_type: Option<String>) {
        match reader_type {
            Some(reader_type) => {
                self.readers.insert(tab_id, ReaderInfo { reader_type });
            }
            None => {
                self.readers.remove(&tab_id);
            }
        }
    }

    pub fn forget(&mut self, tab_id: &TabId) {
        self.readers.remove(tab_id);
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }
}

impl ReaderLookup for ReaderDirectory {
    fn classify(&self, tab_id: &TabId) -> Result<Option<ReaderInfo>, AppError> {
        Ok(self.readers.get(tab_id).cloned())
    }
}
