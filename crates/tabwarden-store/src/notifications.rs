//! Notification log — records every fired reminder for diagnostics.

use sqlx::SqlitePool;
use tabwarden_core::error::TabwardenError;
use tracing::debug;
use uuid::Uuid;

/// An entry to write to the notification log.
pub struct FiredNotification<'a> {
    pub tab_id: i64,
    pub title: &'a str,
    pub category: &'a str,
    pub message: &'a str,
}

/// Notification logger backed by SQLite.
#[derive(Clone)]
pub struct NotificationLog {
    pool: SqlitePool,
}

impl NotificationLog {
    /// Create a new notification logger sharing the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write an entry to the log. Best-effort from the scheduler's point of
    /// view: callers log failures and move on.
    pub async fn log(&self, entry: &FiredNotification<'_>) -> Result<Uuid, TabwardenError> {
        let id = Uuid::new_v4();

        sqlx::query(
            "INSERT INTO notification_log (id, tab_id, title, category, message) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(entry.tab_id)
        .bind(entry.title)
        .bind(entry.category)
        .bind(entry.message)
        .execute(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("notification log write failed: {e}")))?;

        debug!(
            "notification: tab {} [{}] {}",
            entry.tab_id, entry.category, entry.message
        );

        Ok(id)
    }

    /// Most recent fired notifications, newest first.
    pub async fn recent(
        &self,
        limit: i64,
    ) -> Result<Vec<(String, i64, String, String, String)>, TabwardenError> {
        // Returns: (fired_at, tab_id, title, category, message)
        let rows: Vec<(String, i64, String, String, String)> = sqlx::query_as(
            "SELECT fired_at, tab_id, title, category, message \
             FROM notification_log ORDER BY fired_at DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("notification log read failed: {e}")))?;

        Ok(rows)
    }
}
