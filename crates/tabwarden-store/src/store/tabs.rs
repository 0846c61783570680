//! Last-known tab metadata, written through from registry events. Read by
//! the scheduler when its in-memory map misses (fires straight after a
//! restart) and by the status report for classification.

use super::Store;
use tabwarden_core::error::TabwardenError;
use tabwarden_core::event::TabInfo;

impl Store {
    /// Record a tab's current url/title. Latest write wins.
    pub async fn upsert_tab(&self, tab: &TabInfo) -> Result<(), TabwardenError> {
        sqlx::query(
            "INSERT INTO tabs (tab_id, url, title) VALUES (?, ?, ?) \
             ON CONFLICT(tab_id) DO UPDATE SET \
                 url = excluded.url, title = excluded.title, \
                 updated_at = datetime('now')",
        )
        .bind(tab.tab_id)
        .bind(&tab.url)
        .bind(&tab.title)
        .execute(&self.pool)
        .await
        .map_err(|e| TabwardenError::Store(format!("upsert tab failed: {e}")))?;
        Ok(())
    }

    /// Fetch a tab's last-known metadata.
    pub async fn tab(&self, tab_id: i64) -> Result<Option<TabInfo>, TabwardenError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT url, title FROM tabs WHERE tab_id = ?")
                .bind(tab_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| TabwardenError::Store(format!("get tab failed: {e}")))?;

        Ok(row.map(|(url, title)| TabInfo { tab_id, url, title }))
    }

    /// Delete a closed tab's metadata.
    pub async fn remove_tab(&self, tab_id: i64) -> Result<(), TabwardenError> {
        sqlx::query("DELETE FROM tabs WHERE tab_id = ?")
            .bind(tab_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TabwardenError::Store(format!("remove tab failed: {e}")))?;
        Ok(())
    }
}
