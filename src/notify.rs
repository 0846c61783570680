//! Notification sink over stdio.
//!
//! Outbound counterpart of the bridge: reminders are written to stdout as
//! one JSON object per line, which the native-messaging host forwards to
//! the extension for display as a browser notification.

use async_trait::async_trait;
use serde::Serialize;
use tabwarden_core::{error::TabwardenError, traits::Notifier};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Serialize)]
struct NotifyPayload<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    handle: Uuid,
    tab_id: i64,
    title: &'a str,
    message: &'a str,
}

pub struct StdioNotifier {
    // Serializes writers so concurrent fires cannot interleave lines.
    stdout: Mutex<tokio::io::Stdout>,
}

impl StdioNotifier {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
        }
    }
}

#[async_trait]
impl Notifier for StdioNotifier {
    fn name(&self) -> &str {
        "stdio"
    }

    async fn notify(&self, tab_id: i64, title: &str, message: &str) -> Result<Uuid, TabwardenError> {
        let handle = Uuid::new_v4();
        let payload = NotifyPayload {
            kind: "notify",
            handle,
            tab_id,
            title,
            message,
        };

        let mut line = serde_json::to_string(&payload)?;
        line.push('\n');

        let mut stdout = self.stdout.lock().await;
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| TabwardenError::Notify(format!("stdout write failed: {e}")))?;
        stdout
            .flush()
            .await
            .map_err(|e| TabwardenError::Notify(format!("stdout flush failed: {e}")))?;

        debug!(tab_id, %handle, "notification emitted");
        Ok(handle)
    }
}
