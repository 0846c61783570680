use super::{Engine, TickKind};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tabwarden_core::{
    config::{SchedulerConfig, StoreConfig},
    error::TabwardenError,
    event::{BridgeMessage, TabInfo},
    reminder::ReminderStatus,
    traits::Notifier,
};
use tabwarden_store::Store;
use uuid::Uuid;

/// Notifier that records every invocation.
struct MockNotifier {
    calls: Mutex<Vec<(i64, String, String)>>,
}

impl MockNotifier {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
        })
    }

    fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn calls(&self) -> Vec<(i64, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn notify(
        &self,
        tab_id: i64,
        title: &str,
        message: &str,
    ) -> Result<Uuid, TabwardenError> {
        self.calls
            .lock()
            .unwrap()
            .push((tab_id, title.to_string(), message.to_string()));
        Ok(Uuid::new_v4())
    }
}

/// File-backed store in a unique temp path (in-memory SQLite would give each
/// pooled connection its own database).
async fn test_store() -> Store {
    let path = std::env::temp_dir().join(format!("tabwarden_engine_test_{}.db", Uuid::new_v4()));
    Store::new(&StoreConfig {
        db_path: path.to_string_lossy().into_owned(),
    })
    .await
    .unwrap()
}

fn test_engine(store: Store) -> (Engine, Arc<MockNotifier>) {
    let notifier = MockNotifier::new();
    let engine = Engine::new(store, notifier.clone(), &SchedulerConfig::default());
    (engine, notifier)
}

#[tokio::test]
async fn test_one_shot_fires_once_then_idles() {
    // Scenario: interval = 0, tab 42 armed via explicit arm(42, 3000).
    let store = test_store().await;
    let (mut engine, notifier) = test_engine(store.clone());

    engine.handle(BridgeMessage::Arm { tab_id: 42, delay_ms: 3000 }, 0).await;
    engine.tick(2_999, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 0, "must not fire before the deadline");

    engine.tick(3_000, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 1);
    assert_eq!(notifier.calls()[0].0, 42);

    let entry = store.reminder(42).await.unwrap().unwrap();
    assert!(!entry.is_active);
    assert_eq!(entry.end_time, None);
    assert_eq!(entry.status, ReminderStatus::Ended);
}

#[tokio::test]
async fn test_tick_is_idempotent() {
    let store = test_store().await;
    let (mut engine, notifier) = test_engine(store);

    engine.handle(BridgeMessage::Arm { tab_id: 1, delay_ms: 100 }, 0).await;
    engine.tick(500, TickKind::Periodic).await;
    engine.tick(500, TickKind::Periodic).await;
    engine.tick(501, TickKind::Periodic).await;

    assert_eq!(notifier.count(), 1, "duplicate ticks must not double-fire");
}

#[tokio::test]
async fn test_rearm_overwrites_deadline() {
    let store = test_store().await;
    let (mut engine, notifier) = test_engine(store.clone());

    engine.handle(BridgeMessage::Arm { tab_id: 7, delay_ms: 10_000 }, 0).await;
    engine.handle(BridgeMessage::Arm { tab_id: 7, delay_ms: 5_000 }, 0).await;

    // Fires at the 5s mark — the earlier 10s deadline was overwritten.
    engine.tick(5_000, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 1);

    // Nothing left to fire at the old deadline.
    engine.tick(10_000, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 1);
}

#[tokio::test]
async fn test_interval_change_rearms_opted_in_tabs() {
    let store = test_store().await;
    let (mut engine, notifier) = test_engine(store.clone());

    // T armed with 50s remaining.
    engine.handle(BridgeMessage::Arm { tab_id: 5, delay_ms: 50_000 }, 0).await;

    // Interval change discards the remnant: deadline resets to now + 20s.
    engine.handle(BridgeMessage::SetInterval { interval_ms: 20_000 }, 0).await;
    let entry = store.reminder(5).await.unwrap().unwrap();
    assert_eq!(entry.end_time, Some(20_000));

    // Recurring: after firing, the tab is re-armed one interval out.
    engine.tick(20_000, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 1);
    let entry = store.reminder(5).await.unwrap().unwrap();
    assert!(entry.is_active);
    assert_eq!(entry.end_time, Some(40_000));

    engine.tick(40_000, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 2);
}

#[tokio::test]
async fn test_interval_zero_keeps_armed_tabs() {
    let store = test_store().await;
    let (mut engine, notifier) = test_engine(store.clone());

    engine.handle(BridgeMessage::Arm { tab_id: 9, delay_ms: 1_000 }, 0).await;
    engine.handle(BridgeMessage::SetInterval { interval_ms: 0 }, 0).await;

    // Still armed: interval 0 only prevents re-arming after the fire.
    let entry = store.reminder(9).await.unwrap().unwrap();
    assert!(entry.is_active);

    engine.tick(1_000, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 1);
    let entry = store.reminder(9).await.unwrap().unwrap();
    assert!(!entry.is_active);
    assert!(!entry.recurring, "one-shot fire drops the opt-in");

    // A later non-zero interval does not resurrect it.
    engine.handle(BridgeMessage::SetInterval { interval_ms: 5_000 }, 2_000).await;
    let entry = store.reminder(9).await.unwrap().unwrap();
    assert!(!entry.is_active);
}

#[tokio::test]
async fn test_cancel_wins_over_pending_fire() {
    let store = test_store().await;
    let (mut engine, notifier) = test_engine(store.clone());

    engine.handle(BridgeMessage::Arm { tab_id: 3, delay_ms: 1_000 }, 0).await;
    engine.handle(BridgeMessage::Cancel { tab_id: 3 }, 500).await;

    // The deadline has long passed, but the entry was disarmed first.
    engine.tick(2_000, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 0);

    // End state is IDLE with no dangling deadline.
    let entry = store.reminder(3).await.unwrap().unwrap();
    assert!(!entry.is_active);
    assert_eq!(entry.end_time, None);
    assert_eq!(entry.status, ReminderStatus::Cancelled);
}

#[tokio::test]
async fn test_cancel_unknown_tab_is_noop() {
    let store = test_store().await;
    let (mut engine, notifier) = test_engine(store.clone());

    engine.handle(BridgeMessage::Cancel { tab_id: 999 }, 0).await;
    assert_eq!(notifier.count(), 0);
    assert!(store.reminder(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_restart_recovers_missed_deadline_exactly_once() {
    let store = test_store().await;

    // First process: arm, then go down before the deadline.
    {
        let (mut engine, notifier) = test_engine(store.clone());
        engine.handle(BridgeMessage::Arm { tab_id: 11, delay_ms: 1_000 }, 0).await;
        assert_eq!(notifier.count(), 0);
    }

    // Second process: the store is ground truth; recovery fires the missed
    // deadline once and marks it as a timeout.
    let (mut engine, notifier) = test_engine(store.clone());
    engine.tick(60_000, TickKind::Recovery).await;
    assert_eq!(notifier.count(), 1);

    let entry = store.reminder(11).await.unwrap().unwrap();
    assert!(!entry.is_active);
    assert_eq!(entry.status, ReminderStatus::Timeout);

    engine.tick(61_000, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 1);
}

#[tokio::test]
async fn test_recovery_fire_uses_persisted_metadata() {
    let store = test_store().await;

    // First process learns the tab, arms it, then goes down.
    {
        let (mut engine, _) = test_engine(store.clone());
        let tab = TabInfo {
            tab_id: 8,
            url: "https://stackoverflow.com/q/42".to_string(),
            title: "Borrow checker question".to_string(),
        };
        engine.handle(BridgeMessage::TabCreated { tab }, 0).await;
        engine.handle(BridgeMessage::Arm { tab_id: 8, delay_ms: 1_000 }, 0).await;
    }

    // Second process has an empty tab map; the fire falls back to the
    // persisted metadata instead of an untitled alert.
    let (mut engine, notifier) = test_engine(store);
    engine.tick(5_000, TickKind::Recovery).await;

    let calls = notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "Borrow checker question");
    assert!(
        crate::classify::Category::Learning
            .messages()
            .contains(&calls[0].2.as_str()),
        "message should come from the learning templates"
    );
}

#[tokio::test]
async fn test_closed_tab_never_fires() {
    let store = test_store().await;
    let (mut engine, notifier) = test_engine(store.clone());

    let tab = TabInfo {
        tab_id: 4,
        url: "https://example.com/".to_string(),
        title: "Old tab".to_string(),
    };
    engine.handle(BridgeMessage::TabCreated { tab }, 0).await;
    engine.handle(BridgeMessage::Arm { tab_id: 4, delay_ms: 1_000 }, 0).await;
    engine.handle(BridgeMessage::TabRemoved { tab_id: 4 }, 500).await;

    engine.tick(2_000, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 0);

    // All keys destroyed: a recycled tab id starts clean.
    assert!(store.reminder(4).await.unwrap().is_none());
    assert!(store.activity(4).await.unwrap().is_none());
    assert!(store.tab(4).await.unwrap().is_none());
}

#[tokio::test]
async fn test_non_positive_delay_rejected_at_boundary() {
    let store = test_store().await;
    let (mut engine, notifier) = test_engine(store.clone());

    engine.handle(BridgeMessage::Arm { tab_id: 1, delay_ms: 0 }, 0).await;
    engine.handle(BridgeMessage::Arm { tab_id: 1, delay_ms: -500 }, 0).await;

    assert!(store.reminder(1).await.unwrap().is_none());
    engine.tick(10_000, TickKind::Periodic).await;
    assert_eq!(notifier.count(), 0);
}

#[tokio::test]
async fn test_fire_uses_tab_title_and_category_message() {
    let store = test_store().await;
    let (mut engine, notifier) = test_engine(store);

    let tab = TabInfo {
        tab_id: 6,
        url: "https://github.com/rust-lang/rust/pull/1".to_string(),
        title: "Fix borrow checker".to_string(),
    };
    engine.handle(BridgeMessage::TabCreated { tab }, 0).await;
    engine.handle(BridgeMessage::Arm { tab_id: 6, delay_ms: 100 }, 0).await;
    engine.tick(100, TickKind::Periodic).await;

    let calls = notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "Fix borrow checker");
    assert!(
        crate::classify::Category::Work
            .messages()
            .contains(&calls[0].2.as_str()),
        "message should come from the work templates"
    );
}

#[tokio::test]
async fn test_activation_tracks_visits_and_focus_time() {
    let store = test_store().await;
    let (mut engine, _) = test_engine(store.clone());

    engine.handle(BridgeMessage::TabActivated { tab_id: 1 }, 1_000).await;
    engine.handle(BridgeMessage::TabActivated { tab_id: 2 }, 61_000).await;

    let snap = store.activity(1).await.unwrap().unwrap();
    assert_eq!(snap.visit_count, 1);
    assert_eq!(snap.last_active, 1_000);
    assert_eq!(snap.total_active_ms, 60_000);

    let snap = store.activity(2).await.unwrap().unwrap();
    assert_eq!(snap.visit_count, 1);
    assert_eq!(snap.total_active_ms, 0);
}

#[tokio::test]
async fn test_outlier_focus_session_discarded() {
    let store = test_store().await;
    let (mut engine, _) = test_engine(store.clone());

    const DAY: i64 = 24 * 60 * 60 * 1000;
    engine.handle(BridgeMessage::TabActivated { tab_id: 1 }, 0).await;
    // The machine slept for 25 hours; that session is skew, not attention.
    engine.handle(BridgeMessage::TabActivated { tab_id: 2 }, DAY + 3_600_000).await;

    let snap = store.activity(1).await.unwrap().unwrap();
    assert_eq!(snap.total_active_ms, 0);
}

#[tokio::test]
async fn test_full_day_session_still_credited() {
    let store = test_store().await;
    let (mut engine, _) = test_engine(store.clone());

    const DAY: i64 = 24 * 60 * 60 * 1000;
    engine.handle(BridgeMessage::TabActivated { tab_id: 1 }, 0).await;
    // Exactly 24h of focus is plausible attention; only longer is skew.
    engine.handle(BridgeMessage::TabActivated { tab_id: 2 }, DAY).await;

    let snap = store.activity(1).await.unwrap().unwrap();
    assert_eq!(snap.total_active_ms, DAY);
}

#[tokio::test]
async fn test_removing_focused_tab_drops_session() {
    let store = test_store().await;
    let (mut engine, _) = test_engine(store.clone());

    engine.handle(BridgeMessage::TabActivated { tab_id: 1 }, 0).await;
    engine.handle(BridgeMessage::TabRemoved { tab_id: 1 }, 5_000).await;
    engine.handle(BridgeMessage::TabActivated { tab_id: 2 }, 9_000).await;

    // The dropped session must not resurrect the deleted row.
    assert!(store.activity(1).await.unwrap().is_none());
}
