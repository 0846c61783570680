//! Engine — the single event queue connecting the bridge, the store, and
//! the notifier.
//!
//! All scheduler state lives in one owned `Engine` value constructed at
//! process start. Tab events, user commands, and the periodic tick are
//! handled inline on one task, so store mutations for any given tab are
//! totally ordered as issued — no entry is ever read-modify-written by two
//! overlapping operations.

mod activity;
mod scheduler;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tabwarden_core::{
    config::SchedulerConfig,
    error::TabwardenError,
    event::{BridgeMessage, TabInfo},
    traits::{Notifier, TabRegistry},
};
use tabwarden_store::{NotificationLog, Store};
use tracing::{info, warn};

/// Why a tick pass is running. Recovery passes mark fires as `timeout` (the
/// deadline passed while the process was down), the regular cadence marks
/// them `ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Periodic,
    Recovery,
}

/// Owns the reminder scheduler, the activity tracker, and the last-known tab
/// metadata. The engine is the only writer of reminder rows.
pub struct Engine {
    store: Store,
    notifier: Arc<dyn Notifier>,
    notifications: NotificationLog,
    tick_interval: Duration,
    /// Last known url/title per live tab, for classification and alert text.
    tabs: HashMap<i64, TabInfo>,
    /// Currently focused tab and when it gained focus (ms since epoch).
    focus: Option<(i64, i64)>,
}

impl Engine {
    /// Create a new engine over an opened store.
    pub fn new(store: Store, notifier: Arc<dyn Notifier>, config: &SchedulerConfig) -> Self {
        let notifications = NotificationLog::new(store.pool().clone());
        Self {
            store,
            notifier,
            notifications,
            tick_interval: Duration::from_secs(config.tick_interval_secs),
            tabs: HashMap::new(),
            focus: None,
        }
    }

    /// Run until the bridge closes or a shutdown signal arrives.
    ///
    /// The store, not memory, is ground truth: startup heals inconsistent
    /// entries, then a recovery tick fires deadlines missed while the
    /// process was down. From there the periodic sweep is the only
    /// scheduling primitive — no per-entry timers are ever created.
    pub async fn run(mut self, registry: Arc<dyn TabRegistry>) -> Result<(), TabwardenError> {
        let healed = self.store.heal().await?;
        if healed > 0 {
            warn!("healed {healed} inconsistent reminder entries");
        }

        let mut rx = registry.start().await?;
        info!(
            "engine running | registry: {} | notifier: {} | tick: {:?}",
            registry.name(),
            self.notifier.name(),
            self.tick_interval
        );

        self.tick(now_ms(), TickKind::Recovery).await;

        let mut tick = tokio::time::interval(self.tick_interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                maybe = rx.recv() => match maybe {
                    Some(msg) => self.handle(msg, now_ms()).await,
                    None => {
                        info!("bridge closed, shutting down");
                        break;
                    }
                },
                _ = tick.tick() => self.tick(now_ms(), TickKind::Periodic).await,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Dispatch one inbound message. One dispatch table; each message kind
    /// is handled by exactly one arm.
    pub(crate) async fn handle(&mut self, msg: BridgeMessage, now: i64) {
        match msg {
            BridgeMessage::TabCreated { tab } | BridgeMessage::TabUpdated { tab } => {
                // Written through so fires and the status report can still
                // classify the tab after a restart.
                if let Err(e) = self.store.upsert_tab(&tab).await {
                    warn!("failed to persist metadata for tab {}: {e}", tab.tab_id);
                }
                self.tabs.insert(tab.tab_id, tab);
            }
            BridgeMessage::TabActivated { tab_id } => self.on_activated(tab_id, now).await,
            BridgeMessage::TabRemoved { tab_id } => self.on_removed(tab_id).await,
            BridgeMessage::Arm { tab_id, delay_ms } => self.arm(tab_id, delay_ms, now).await,
            BridgeMessage::Cancel { tab_id } => self.cancel(tab_id).await,
            BridgeMessage::SetInterval { interval_ms } => {
                self.set_interval(interval_ms, now).await
            }
        }
    }
}

/// Current wall-clock time in ms since epoch.
fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
