//! Per-tab focus/visit telemetry. Write access is exclusive to the activity
//! tracker; the scheduler and UI only read these rows.

use super::Store;
use tabwarden_core::error::TabwardenError;
use tabwarden_core::reminder::TabActivitySnapshot;

impl Store {
    /// Record a focus event: bump the visit count and stamp `last_active`.
    pub async fn record_visit(&self, tab_id: i64, now: i64) -> Result<(), TabwardenError> {
        sqlx::query(
            "INSERT INTO tab_activity (tab_id, last_active, visit_count) VALUES (?, ?, 1) \
             ON CONFLICT(tab_id) DO UPDATE SET \
                 last_active = excluded.last_active, visit_count = visit_count + 1",
        )
        .bind(tab_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("record visit failed: {e}")))?;
        Ok(())
    }

    /// Credit a closed focus session to a tab's cumulative active time.
    pub async fn add_active_time(&self, tab_id: i64, session_ms: i64) -> Result<(), TabwardenError> {
        sqlx::query(
            "INSERT INTO tab_activity (tab_id, total_active_ms) VALUES (?, ?) \
             ON CONFLICT(tab_id) DO UPDATE SET \
                 total_active_ms = total_active_ms + excluded.total_active_ms",
        )
        .bind(tab_id)
        .bind(session_ms)
        .execute(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("add active time failed: {e}")))?;
        Ok(())
    }

    /// Fetch a tab's activity snapshot.
    pub async fn activity(&self, tab_id: i64) -> Result<Option<TabActivitySnapshot>, TabwardenError> {
        let row: Option<(i64, i64, i64)> = sqlx::query_as(
            "SELECT last_active, total_active_ms, visit_count FROM tab_activity WHERE tab_id = ?",
        )
        .bind(tab_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("get activity failed: {e}")))?;

        Ok(row.map(|(last_active, total_active_ms, visit_count)| TabActivitySnapshot {
            last_active,
            total_active_ms,
            visit_count,
        }))
    }

    /// Delete a closed tab's activity snapshot.
    pub async fn remove_activity(&self, tab_id: i64) -> Result<(), TabwardenError> {
        sqlx::query("DELETE FROM tab_activity WHERE tab_id = ?")
            .bind(tab_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TabwardenError::Store(format!("remove activity failed: {e}")))?;
        Ok(())
    }
}
