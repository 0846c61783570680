use crate::{error::TabwardenError, event::BridgeMessage};
use async_trait::async_trait;
use uuid::Uuid;

/// Notifier trait — the user-visible alert surface.
///
/// Fire-and-forget: the scheduler never waits on an acknowledgement and a
/// delivery failure never un-fires a reminder.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable notifier name.
    fn name(&self) -> &str;

    /// Surface an alert for a tab. Returns an opaque handle for diagnostics.
    async fn notify(&self, tab_id: i64, title: &str, message: &str)
        -> Result<Uuid, TabwardenError>;
}

/// Tab registry trait — the host's live list of tabs and its event stream.
///
/// Implementations forward tab lifecycle events and user commands into one
/// receiver; the engine serializes everything it yields onto a single queue.
#[async_trait]
pub trait TabRegistry: Send + Sync {
    /// Human-readable registry name.
    fn name(&self) -> &str;

    /// Start listening. Returns a receiver that yields inbound messages
    /// until the source closes.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<BridgeMessage>, TabwardenError>;
}
