//! Arms, cancels, and fires idle-tab release timers.
//!
//! The orchestrator is the whole per-process state: the active tab, the
//! armed timers, and the collaborators it consults. It is driven from a
//! single task; see [`Orchestrator::run`] or the native host's event loop.

use crate::config::ConfigGate;
use crate::eligibility::{is_pdf_reader, ReaderLookup};
use crate::models::TabId;
use crate::notify::Notification;
use crate::prefs::PreferenceStore;
use crate::release::ReleaseInvoker;
use crate::timers::{TimerFired, TimerRegistry};
use crate::tracker::{ActivationTracker, Transition};
use log::{debug, info};
use tokio::sync::mpsc;

pub struct Orchestrator<P, L, R> {
    tracker: ActivationTracker,
    timers: TimerRegistry,
    gate: ConfigGate<P>,
    lookup: L,
    release: R,
}

impl<P, L, R> Orchestrator<P, L, R>
where
    P: PreferenceStore,
    L: ReaderLookup,
    R: ReleaseInvoker,
{
    pub fn new(prefs: P, lookup: L, release: R) -> Self {
        Self {
            tracker: ActivationTracker::new(),
            timers: TimerRegistry::new(),
            gate: ConfigGate::new(prefs),
            lookup,
            release,
        }
    }

    /// Feed a raw host notification. Only tab selections matter.
    pub fn handle_notification(&mut self, notification: &Notification) {
        if let Some(id) = notification.selected_tab() {
            self.on_activity_event(&id);
        }
    }

    /// A tab was selected in the host.
    pub fn on_activity_event(&mut self, id: &str) {
        for transition in self.tracker.on_activity_event(id) {
            match transition {
                Transition::Deactivated(tab_id) => self.on_deactivated(&tab_id),
                Transition::Activated(tab_id) => self.on_activated(&tab_id),
            }
        }
    }

    fn on_deactivated(&mut self, tab_id: &TabId) {
        if !self.gate.is_enabled() {
            info!("MemFlow is disabled in preferences. Not arming a timer for tab {tab_id}.");
            return;
        }
        if !is_pdf_reader(&self.lookup, tab_id) {
            return;
        }

        let delay = self.gate.delay();
        let timer_id = self.timers.schedule(tab_id, delay);
        info!("Timer {timer_id:?} started for inactive PDF tab {tab_id} ({delay:?}).");
    }

    fn on_activated(&mut self, tab_id: &TabId) {
        // Reactivation always wins, even while disabled
        if self.timers.cancel(tab_id) {
            info!("Cancelled timer for tab {tab_id} as it became active.");
        } else {
            debug!("No pending timer found for active tab {tab_id}.");
        }
    }

    /// Resolve a fired timer: drop its entry, then release the tab if still enabled.
    pub fn on_expire(&mut self, fired: TimerFired) {
        if !self.timers.consume(&fired) {
            debug!(
                "Timer {:?} for tab {} was already resolved, ignoring.",
                fired.timer_id, fired.tab_id
            );
            return;
        }

        if !self.gate.is_enabled() {
            info!(
                "Timer completed for tab {}, but MemFlow is now disabled. Aborting release action.",
                fired.tab_id
            );
            return;
        }

        info!("Timer {:?} completed for inactive PDF tab {}.", fired.timer_id, fired.tab_id);
        self.release.invoke(&fired.tab_id);
    }

    /// Wait for the next armed timer to fire.
    pub async fn next_expiry(&mut self) -> Option<TimerFired> {
        self.timers.next_fired().await
    }

    /// Process notifications and timer firings until the sender side closes,
    /// then dispose of any outstanding timers.
    pub async fn run(&mut self, mut notifications: mpsc::UnboundedReceiver<Notification>) {
        loop {
            tokio::select! {
                // Host events first: a reactivation in the same tick beats the firing
                biased;
                notification = notifications.recv() => match notification {
                    Some(notification) => self.handle_notification(&notification),
                    None => break,
                },
                Some(fired) = self.timers.next_fired() => self.on_expire(fired),
            }
        }
        self.dispose();
    }

    /// Abort every armed timer without releasing anything.
    pub fn dispose(&mut self) {
        if !self.timers.is_empty() {
            info!("Disposing {} pending timer(s).", self.timers.len());
        }
        self.timers.clear();
    }

    pub fn active_tab(&self) -> Option<&TabId> {
        self.tracker.active()
    }

    pub fn is_pending(&self, tab_id: &TabId) -> bool {
        self.timers.is_pending(tab_id)
    }

    pub fn pending_tabs(&self) -> Vec<TabId> {
        self.timers.pending_keys()
    }

    pub fn gate(&self) -> &ConfigGate<P> {
        &self.gate
    }

    pub fn preferences_mut(&mut self) -> &mut P {
        self.gate.store_mut()
    }

    pub fn lookup_mut(&mut self) -> &mut L {
        &mut self.lookup
    }

    pub fn release(&self) -> &R {
        &self.release
    }
}
