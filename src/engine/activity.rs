//! Activity tracker — per-tab focus/visit telemetry feeding the importance
//! score. Independent of the scheduler; shares the store but owns its rows.

use super::Engine;
use tracing::{debug, error};

/// A single focus session longer than this is sleep/suspend skew, not real
/// attention, and is discarded.
const MAX_SESSION_MS: i64 = 24 * 60 * 60 * 1000;

impl Engine {
    /// A tab gained focus: close out the previous session, bump the new
    /// tab's visit count, and stamp its last-active time.
    pub(crate) async fn on_activated(&mut self, tab_id: i64, now: i64) {
        if let Some((prev_tab, since)) = self.focus.take() {
            let session = now - since;
            if session > 0 && session <= MAX_SESSION_MS {
                if let Err(e) = self.store.add_active_time(prev_tab, session).await {
                    error!("activity: failed to credit {session}ms to tab {prev_tab}: {e}");
                }
            } else if session > MAX_SESSION_MS {
                debug!("activity: discarding {session}ms outlier session for tab {prev_tab}");
            }
        }

        if let Err(e) = self.store.record_visit(tab_id, now).await {
            error!("activity: failed to record visit for tab {tab_id}: {e}");
        }
        self.focus = Some((tab_id, now));
    }

    /// Drop the in-flight focus session when its tab closes. The session is
    /// not credited: that write would resurrect the just-deleted activity row.
    pub(crate) fn drop_focus(&mut self, tab_id: i64) {
        if matches!(self.focus, Some((focused, _)) if focused == tab_id) {
            self.focus = None;
        }
    }
}
