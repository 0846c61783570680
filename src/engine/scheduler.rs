//! Reminder scheduling state machine — arm, cancel, tick, fire.
//!
//! Per-tab states cycle IDLE → ARMED → DUE → IDLE, with DUE → ARMED when a
//! non-zero global interval applies. The tick sweep is the sole path by
//! which a reminder is declared due; anything else (UI countdowns included)
//! only reads state.

use super::{Engine, TickKind};
use crate::classify;
use tabwarden_core::reminder::{ReminderEntry, ReminderStatus};
use tabwarden_store::notifications::FiredNotification;
use tracing::{error, info, warn};

impl Engine {
    /// Arm (or re-arm) a reminder for a tab and opt it into recurring
    /// reminders. Re-arming overwrites the deadline — latest write wins,
    /// never a queue of pending deadlines.
    ///
    /// `delay_ms` must be positive; invalid input is rejected at this
    /// boundary with scheduler state untouched. A deadline already in the
    /// past at arm time is not an error — the next tick fires it.
    pub(crate) async fn arm(&mut self, tab_id: i64, delay_ms: i64, now: i64) {
        if delay_ms <= 0 {
            warn!("arm: rejected non-positive delay {delay_ms}ms for tab {tab_id}");
            return;
        }
        let end_time = now + delay_ms;
        match self.store.upsert_armed(tab_id, end_time).await {
            Ok(()) => info!("armed tab {tab_id}, due in {delay_ms}ms"),
            Err(e) => error!("arm: store write failed for tab {tab_id}: {e}"),
        }
    }

    /// Disarm a tab: ARMED → IDLE. Calling on an idle tab is a no-op.
    pub(crate) async fn cancel(&mut self, tab_id: i64) {
        match self.store.cancel_reminder(tab_id).await {
            Ok(true) => info!("cancelled reminder for tab {tab_id}"),
            Ok(false) => {}
            Err(e) => error!("cancel: store write failed for tab {tab_id}: {e}"),
        }
    }

    /// Change the global recurring interval. A non-zero interval re-arms
    /// every opted-in tab to `now + interval`, discarding any remaining time
    /// (no pro-rating). Zero disables re-arming after future fires but does
    /// not cancel tabs already armed.
    pub(crate) async fn set_interval(&mut self, interval_ms: i64, now: i64) {
        if interval_ms < 0 {
            warn!("set_interval: rejected negative interval {interval_ms}ms");
            return;
        }
        if let Err(e) = self.store.set_interval(interval_ms).await {
            error!("set_interval: store write failed: {e}");
            return;
        }
        if interval_ms == 0 {
            info!("recurring reminders disabled (interval 0)");
            return;
        }
        match self.store.recurring_tabs().await {
            Ok(tabs) => {
                let count = tabs.len();
                for tab_id in tabs {
                    if let Err(e) = self.store.upsert_armed(tab_id, now + interval_ms).await {
                        error!("set_interval: re-arm failed for tab {tab_id}: {e}");
                    }
                }
                info!("interval set to {interval_ms}ms, re-armed {count} tabs");
            }
            Err(e) => error!("set_interval: failed to list recurring tabs: {e}"),
        }
    }

    /// One reconciliation pass comparing all armed deadlines to `now`.
    ///
    /// Idempotent over unchanged state: each due entry is claimed out of
    /// ARMED atomically, so a re-entrant sweep or a racing cancel loses the
    /// claim and fires nothing. One tab's failure never blocks the sweep
    /// for the others; a transient store failure leaves everything
    /// unchanged for retry on the next tick.
    pub(crate) async fn tick(&mut self, now: i64, kind: TickKind) {
        let due = match self.store.due_reminders(now).await {
            Ok(due) => due,
            Err(e) => {
                error!("tick: failed to read due reminders: {e}");
                return;
            }
        };
        if due.is_empty() {
            return;
        }

        let interval = match self.store.interval().await {
            Ok(interval) => interval,
            Err(e) => {
                error!("tick: failed to read global interval: {e}");
                return;
            }
        };

        let status = match kind {
            TickKind::Periodic => ReminderStatus::Ended,
            TickKind::Recovery => ReminderStatus::Timeout,
        };

        for entry in due {
            // Re-check the precondition immediately before firing: the
            // guarded claim transitions the entry out of ARMED before the
            // notifier runs, so anything concurrent already sees it idle.
            match self.store.claim_due(entry.tab_id, now, status).await {
                Ok(true) => self.fire(&entry, now, interval).await,
                Ok(false) => {}
                Err(e) => error!("tick: claim failed for tab {}: {e}", entry.tab_id),
            }
        }
    }

    /// Deliver the alert for a claimed entry, then settle its next state:
    /// re-armed at `now + interval` when a non-zero global interval applies
    /// and the tab opted in, idle otherwise.
    async fn fire(&mut self, entry: &ReminderEntry, now: i64, interval: i64) {
        let tab_id = entry.tab_id;
        // A tab missing from the in-memory map (firing before the bridge
        // re-announces tabs after a restart) falls back to the persisted
        // metadata, and still fires with empty text when even that is gone.
        let (title, url) = match self.tabs.get(&tab_id) {
            Some(t) => (t.title.clone(), t.url.clone()),
            None => self
                .store
                .tab(tab_id)
                .await
                .unwrap_or_else(|e| {
                    warn!("fire: metadata lookup failed for tab {tab_id}: {e}");
                    None
                })
                .map(|t| (t.title, t.url))
                .unwrap_or_default(),
        };

        let category = classify::classify(&url, &title);
        let message = classify::pick_message(category);

        // Fire-and-forget: delivery failure never un-fires the entry.
        match self.notifier.notify(tab_id, &title, message).await {
            Ok(handle) => info!(
                "fired reminder for tab {tab_id} [{}] handle {handle}",
                category.as_str()
            ),
            Err(e) => warn!("fire: notification delivery failed for tab {tab_id}: {e}"),
        }

        if let Err(e) = self
            .notifications
            .log(&FiredNotification {
                tab_id,
                title: &title,
                category: category.as_str(),
                message,
            })
            .await
        {
            warn!("fire: notification log write failed for tab {tab_id}: {e}");
        }

        if interval > 0 && entry.recurring {
            if let Err(e) = self.store.rearm(tab_id, now + interval).await {
                error!("fire: re-arm failed for tab {tab_id}: {e}");
            }
        } else if let Err(e) = self.store.clear_recurring(tab_id).await {
            warn!("fire: failed to clear opt-in for tab {tab_id}: {e}");
        }
    }

    /// A tab closed: forced cancel plus destruction of every key tied to the
    /// id. The host recycles tab ids, so a stale entry must never be
    /// interpreted as belonging to a newly-opened tab with the same id.
    pub(crate) async fn on_removed(&mut self, tab_id: i64) {
        self.tabs.remove(&tab_id);
        self.drop_focus(tab_id);
        if let Err(e) = self.store.remove_reminder(tab_id).await {
            error!("remove: failed to delete reminder for tab {tab_id}: {e}");
        }
        if let Err(e) = self.store.remove_activity(tab_id).await {
            error!("remove: failed to delete activity for tab {tab_id}: {e}");
        }
        if let Err(e) = self.store.remove_tab(tab_id).await {
            error!("remove: failed to delete metadata for tab {tab_id}: {e}");
        }
    }
}
