//! Browser bridge over stdio.
//!
//! The browser extension's native-messaging host pipes tab events to us as
//! newline-delimited JSON on stdin. One spawned task owns stdin and feeds
//! the engine's event channel; malformed lines are logged and dropped so a
//! buggy extension build cannot wedge the daemon.

use async_trait::async_trait;
use tabwarden_core::{error::TabwardenError, event::BridgeMessage, traits::TabRegistry};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct StdioRegistry;

impl StdioRegistry {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TabRegistry for StdioRegistry {
    fn name(&self) -> &str {
        "stdio"
    }

    async fn start(&self) -> Result<mpsc::Receiver<BridgeMessage>, TabwardenError> {
        let (tx, rx) = mpsc::channel(256);

        info!("stdio bridge listening for tab events");

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();

            loop {
                let line = match lines.next_line().await {
                    Ok(Some(l)) => l,
                    Ok(None) => {
                        // EOF: the browser side closed the pipe.
                        info!("stdio bridge closed, stopping reader");
                        return;
                    }
                    Err(e) => {
                        warn!("stdio bridge read error: {e}");
                        continue;
                    }
                };

                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let msg: BridgeMessage = match serde_json::from_str(trimmed) {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("dropping malformed bridge line: {e}");
                        continue;
                    }
                };

                debug!(?msg, "bridge event");

                if tx.send(msg).await.is_err() {
                    info!("bridge receiver dropped, stopping reader");
                    return;
                }
            }
        });

        Ok(rx)
    }
}
