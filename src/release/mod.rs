use crate::models::TabId;

/// The action taken once a tab has stayed idle for the full delay.
///
/// Called at most once per fired timer, with the tab the timer was armed for.
/// How the tab's resources are actually reclaimed is up to the implementor;
/// the native host forwards the request to the host plugin.
pub trait ReleaseInvoker {
    fn invoke(&mut self, tab_id: &TabId);
}

impl<F: FnMut(&TabId)> ReleaseInvoker for F {
    fn invoke(&mut self, tab_id: &TabId) {
        self(tab_id);
    }
}
