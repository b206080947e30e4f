//! Per-tab release timers.
//!
//! Each armed timer is a small tokio task that sleeps and then reports a
//! [`TimerFired`] on the registry's channel. The owner drains that channel
//! on its own task and calls [`TimerRegistry::consume`], so every state
//! change happens on one logical thread.

use crate::models::TabId;
use log::{debug, warn};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Generation of an armed timer. Increases with every `schedule` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Delivered when a timer's delay has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerFired {
    pub tab_id: TabId,
    pub timer_id: TimerId,
}

struct TimerEntry {
    id: TimerId,
    handle: AbortHandle,
}

pub struct TimerRegistry {
    entries: HashMap<TabId, TimerEntry>,
    next_id: u64,
    fired_tx: mpsc::UnboundedSender<TimerFired>,
    fired_rx: mpsc::UnboundedReceiver<TimerFired>,
}

impl Default for TimerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerRegistry {
    pub fn new() -> Self {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        Self {
            entries: HashMap::new(),
            next_id: 0,
            fired_tx,
            fired_rx,
        }
    }

    /// Arm a timer for `tab_id` that fires after `delay`.
    ///
    /// An existing timer for the same tab is aborted first. Must be called
    /// from within a tokio runtime.
    pub fn schedule(&mut self, tab_id: &TabId, delay: Duration) -> TimerId {
        if let Some(stale) = self.entries.remove(tab_id) {
            warn!("Timer already exists for tab {tab_id}. Clearing old timer.");
            stale.handle.abort();
        }

        self.next_id = self.next_id.wrapping_add(1);
        let id = TimerId(self.next_id);
        let fired = TimerFired {
            tab_id: tab_id.clone(),
            timer_id: id,
        };
        let fired_tx = self.fired_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver lives inside the registry; a send error means it is gone
            let _ = fired_tx.send(fired);
        })
        .abort_handle();

        self.entries.insert(tab_id.clone(), TimerEntry { id, handle });
        id
    }

    /// Abort the pending timer for `tab_id`. Returns whether one existed.
    pub fn cancel(&mut self, tab_id: &TabId) -> bool {
        match self.entries.remove(tab_id) {
            Some(entry) => {
                entry.handle.abort();
                debug!("Cancelled timer {:?} for tab {tab_id}", entry.id);
                true
            }
            None => false,
        }
    }

    /// Remove the entry a firing belongs to. Returns `false` when the timer
    /// was already canceled, consumed, or replaced by a newer one.
    pub fn consume(&mut self, fired: &TimerFired) -> bool {
        match self.entries.get(&fired.tab_id) {
            Some(entry) if entry.id == fired.timer_id => {
                self.entries.remove(&fired.tab_id);
                true
            }
            Some(_) | None => false,
        }
    }

    pub fn is_pending(&self, tab_id: &TabId) -> bool {
        self.entries.contains_key(tab_id)
    }

    /// Tabs with an armed timer, sorted.
    pub fn pending_keys(&self) -> Vec<TabId> {
        let mut keys: Vec<TabId> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wait for the next timer to fire. Pending forever while nothing is armed.
    pub async fn next_fired(&mut self) -> Option<TimerFired> {
        self.fired_rx.recv().await
    }

    pub fn try_next_fired(&mut self) -> Option<TimerFired> {
        self.fired_rx.try_recv().ok()
    }

    /// Abort every armed timer.
    pub fn clear(&mut self) {
        for (_, entry) in self.entries.drain() {
            entry.handle.abort();
        }
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        self.clear();
    }
}
