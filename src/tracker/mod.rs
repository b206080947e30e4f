use crate::models::TabId;
use log::debug;

/// A change of activity for one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Deactivated(TabId),
    Activated(TabId),
}

/// Tracks which tab is currently active.
#[derive(Debug, Default)]
pub struct ActivationTracker {
    active: Option<TabId>,
}

impl ActivationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&TabId> {
        self.active.as_ref()
    }

    /// Record that `id` was selected and return the resulting transitions.
    ///
    /// The previous tab's `Deactivated` always comes before the new tab's
    /// `Activated`. Empty ids and re-selecting the active tab yield nothing.
    pub fn on_activity_event(&mut self, id: &str) -> Vec<Transition> {
        let Some(next) = TabId::new(id) else {
            return Vec::new();
        };
        if self.active.as_ref() == Some(&next) {
            return Vec::new();
        }

        debug!(
            "Tab changed: {} -> {next}",
            self.active.as_ref().map_or("none", TabId::as_str)
        );

        let mut transitions = Vec::with_capacity(2);
        if let Some(previous) = self.active.take() {
            transitions.push(Transition::Deactivated(previous));
        }
        transitions.push(Transition::Activated(next.clone()));
        self.active = Some(next);
        transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::tab;

    #[test]
    fn test_first_event_only_activates() {
        let mut tracker = ActivationTracker::new();
        assert!(tracker.active().is_none());

        let transitions = tracker.on_activity_event("a");

        assert_eq!(transitions, vec![Transition::Activated(tab("a"))]);
        assert_eq!(tracker.active(), Some(&tab("a")));
    }

    #[test]
    fn test_switch_deactivates_before_activating() {
        let mut tracker = ActivationTracker::new();
        tracker.on_activity_event("a");

        let transitions = tracker.on_activity_event("b");

        assert_eq!(
            transitions,
            vec![Transition::Deactivated(tab("a")), Transition::Activated(tab("b"))]
        );
        assert_eq!(tracker.active(), Some(&tab("b")));
    }

    #[test]
    fn test_reselecting_active_tab_is_a_no_op() {
        let mut tracker = ActivationTracker::new();
        tracker.on_activity_event("a");

        assert!(tracker.on_activity_event("a").is_empty());
        assert_eq!(tracker.active(), Some(&tab("a")));
    }

    #[test]
    fn test_empty_id_is_ignored() {
        let mut tracker = ActivationTracker::new();
        tracker.on_activity_event("a");

        assert!(tracker.on_activity_event("").is_empty());
        assert_eq!(tracker.active(), Some(&tab("a")));
    }

    #[test]
    fn test_returning_to_previous_tab() {
        let mut tracker = ActivationTracker::new();
        tracker.on_activity_event("a");
        tracker.on_activity_event("b");

        let transitions = tracker.on_activity_event("a");

        assert_eq!(
            transitions,
            vec![Transition::Deactivated(tab("b")), Transition::Activated(tab("a"))]
        );
    }
}
