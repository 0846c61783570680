//! Reminder and activity domain types shared by the store and the engine.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a reminder entry — kept for diagnostics and
/// idempotence checks, never consulted to decide whether a reminder is due
/// (that is `is_active` + `end_time` alone).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    /// A deadline is armed.
    Active,
    /// Fired normally through the tick sweep.
    Ended,
    /// Disarmed by the user or by the tab closing.
    Cancelled,
    /// Fired by startup recovery — the deadline passed while the process
    /// was down.
    Timeout,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
            Self::Cancelled => "cancelled",
            Self::Timeout => "timeout",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "ended" => Some(Self::Ended),
            "cancelled" => Some(Self::Cancelled),
            "timeout" => Some(Self::Timeout),
            _ => None,
        }
    }
}

/// One tab's reminder state — the single structured record per tab.
///
/// Invariant: `is_active == true` iff `end_time` is set. The store writes
/// all three mutable fields in one statement so no reader ever observes a
/// half-updated entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderEntry {
    pub tab_id: i64,
    pub is_active: bool,
    /// Absolute deadline, ms since epoch. Present iff `is_active`.
    pub end_time: Option<i64>,
    pub status: ReminderStatus,
    /// Whether this tab opted into recurring reminders (the
    /// `customReminderTabs` membership).
    pub recurring: bool,
}

/// Per-tab focus/visit telemetry feeding the importance score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabActivitySnapshot {
    /// Timestamp of last focus, ms since epoch. Zero means never focused.
    pub last_active: i64,
    /// Cumulative focused duration in ms. Single sessions longer than 24h
    /// are discarded as suspend skew before they reach here.
    pub total_active_ms: i64,
    /// Incremented once per activation event.
    pub visit_count: i64,
}
