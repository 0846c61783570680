//! Singleton global reminder config.

use super::Store;
use tabwarden_core::error::TabwardenError;

const INTERVAL_KEY: &str = "reminder_interval_ms";

impl Store {
    /// The global recurring interval in ms. `0` means reminders fire one-shot.
    pub async fn interval(&self) -> Result<i64, TabwardenError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(INTERVAL_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TabwardenError::Store(format!("get interval failed: {e}")))?;

        Ok(row
            .and_then(|(v,)| v.parse::<i64>().ok())
            .unwrap_or_default())
    }

    /// Persist the global recurring interval.
    pub async fn set_interval(&self, interval_ms: i64) -> Result<(), TabwardenError> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(INTERVAL_KEY)
        .bind(interval_ms.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("set interval failed: {e}")))?;
        Ok(())
    }
}
