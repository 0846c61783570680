//! Reminder entry mutations — the scheduler's single write path.
//!
//! Every mutation is one SQL statement and every transition out of `ARMED`
//! is guarded by `is_active = 1`, so concurrent callers can never double-fire
//! an armed deadline or leave an entry active with no pending timer.

use super::Store;
use tabwarden_core::error::TabwardenError;
use tabwarden_core::reminder::{ReminderEntry, ReminderStatus};

/// Row shape shared by the reminder readers.
type ReminderRow = (i64, i64, Option<i64>, String, i64);

fn entry_from_row((tab_id, is_active, end_time, status, recurring): ReminderRow) -> ReminderEntry {
    ReminderEntry {
        tab_id,
        is_active: is_active != 0,
        end_time,
        // Unknown status text is treated as cancelled — self-heal, not fatal.
        status: ReminderStatus::parse(&status).unwrap_or(ReminderStatus::Cancelled),
        recurring: recurring != 0,
    }
}

const SELECT_ENTRY: &str = "SELECT tab_id, is_active, end_time, status, recurring FROM reminders";

impl Store {
    /// Arm (or re-arm) a tab's reminder. Latest write wins: an already-armed
    /// tab has its deadline overwritten, never queued.
    pub async fn upsert_armed(&self, tab_id: i64, end_time: i64) -> Result<(), TabwardenError> {
        sqlx::query(
            "INSERT INTO reminders (tab_id, is_active, end_time, status, recurring) \
             VALUES (?, 1, ?, 'active', 1) \
             ON CONFLICT(tab_id) DO UPDATE SET \
                 is_active = 1, end_time = excluded.end_time, status = 'active', \
                 recurring = 1, updated_at = datetime('now')",
        )
        .bind(tab_id)
        .bind(end_time)
        .execute(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("arm failed: {e}")))?;
        Ok(())
    }

    /// Atomically claim a due entry: `ARMED -> DUE -> IDLE` in one guarded
    /// write. Returns `true` iff this caller won the claim; a concurrent
    /// tick or cancel that committed first makes this a no-op.
    pub async fn claim_due(
        &self,
        tab_id: i64,
        now: i64,
        status: ReminderStatus,
    ) -> Result<bool, TabwardenError> {
        let result = sqlx::query(
            "UPDATE reminders \
             SET is_active = 0, end_time = NULL, status = ?, updated_at = datetime('now') \
             WHERE tab_id = ? AND is_active = 1 AND end_time IS NOT NULL AND end_time <= ?",
        )
        .bind(status.as_str())
        .bind(tab_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("claim failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Re-arm a tab after a recurring fire. Only meaningful immediately
    /// after a successful [`Store::claim_due`] on the same queue.
    pub async fn rearm(&self, tab_id: i64, end_time: i64) -> Result<(), TabwardenError> {
        sqlx::query(
            "UPDATE reminders \
             SET is_active = 1, end_time = ?, status = 'active', updated_at = datetime('now') \
             WHERE tab_id = ?",
        )
        .bind(end_time)
        .bind(tab_id)
        .execute(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("rearm failed: {e}")))?;
        Ok(())
    }

    /// Drop a tab from the recurring opt-in set without touching its timer
    /// state. Used after a one-shot fire (global interval 0).
    pub async fn clear_recurring(&self, tab_id: i64) -> Result<(), TabwardenError> {
        sqlx::query("UPDATE reminders SET recurring = 0 WHERE tab_id = ?")
            .bind(tab_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TabwardenError::Store(format!("clear recurring failed: {e}")))?;
        Ok(())
    }

    /// Disarm a tab: `ARMED -> IDLE`. Idempotent — returns `false` when the
    /// tab was not armed, leaving its diagnostic status untouched.
    pub async fn cancel_reminder(&self, tab_id: i64) -> Result<bool, TabwardenError> {
        let result = sqlx::query(
            "UPDATE reminders \
             SET is_active = 0, end_time = NULL, status = 'cancelled', recurring = 0, \
                 updated_at = datetime('now') \
             WHERE tab_id = ? AND is_active = 1",
        )
        .bind(tab_id)
        .execute(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("cancel failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a closed tab's reminder row. Tab ids are recycled by the host,
    /// so a stale row must never be interpreted as belonging to a new tab.
    pub async fn remove_reminder(&self, tab_id: i64) -> Result<(), TabwardenError> {
        sqlx::query("DELETE FROM reminders WHERE tab_id = ?")
            .bind(tab_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TabwardenError::Store(format!("remove reminder failed: {e}")))?;
        Ok(())
    }

    /// Fetch a single tab's reminder entry.
    pub async fn reminder(&self, tab_id: i64) -> Result<Option<ReminderEntry>, TabwardenError> {
        let row: Option<ReminderRow> =
            sqlx::query_as(&format!("{SELECT_ENTRY} WHERE tab_id = ?"))
                .bind(tab_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| TabwardenError::Store(format!("get reminder failed: {e}")))?;

        Ok(row.map(entry_from_row))
    }

    /// All armed entries whose deadline has passed.
    pub async fn due_reminders(&self, now: i64) -> Result<Vec<ReminderEntry>, TabwardenError> {
        let rows: Vec<ReminderRow> = sqlx::query_as(&format!(
            "{SELECT_ENTRY} WHERE is_active = 1 AND end_time IS NOT NULL AND end_time <= ? \
             ORDER BY end_time ASC"
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("get due reminders failed: {e}")))?;

        Ok(rows.into_iter().map(entry_from_row).collect())
    }

    /// All currently armed entries.
    pub async fn armed_reminders(&self) -> Result<Vec<ReminderEntry>, TabwardenError> {
        let rows: Vec<ReminderRow> = sqlx::query_as(&format!(
            "{SELECT_ENTRY} WHERE is_active = 1 ORDER BY end_time ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("get armed reminders failed: {e}")))?;

        Ok(rows.into_iter().map(entry_from_row).collect())
    }

    /// The recurring opt-in set (tabs eligible for global-interval re-arms).
    pub async fn recurring_tabs(&self) -> Result<Vec<i64>, TabwardenError> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT tab_id FROM reminders WHERE recurring = 1 ORDER BY tab_id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| TabwardenError::Store(format!("get recurring tabs failed: {e}")))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Self-heal inconsistent rows (`is_active = 1` with no deadline) by
    /// returning them to idle. Returns the number of rows repaired.
    pub async fn heal(&self) -> Result<u64, TabwardenError> {
        let result = sqlx::query(
            "UPDATE reminders \
             SET is_active = 0, status = 'cancelled', updated_at = datetime('now') \
             WHERE is_active = 1 AND end_time IS NULL",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("heal failed: {e}")))?;

        Ok(result.rows_affected())
    }
}
