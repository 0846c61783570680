//! Bridge messages — tab lifecycle events and user commands.
//!
//! The companion extension streams line-delimited JSON over the bridge; every
//! line is one [`BridgeMessage`], discriminated by its `type` field. One flat
//! dispatch table: each message kind is handled by exactly one engine arm.

use serde::{Deserialize, Serialize};

/// A live tab as reported by the registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TabInfo {
    pub tab_id: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// One inbound message from the tab registry or the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeMessage {
    /// A new tab was opened.
    TabCreated { tab: TabInfo },
    /// A tab finished loading; carries the refreshed url/title.
    TabUpdated { tab: TabInfo },
    /// A tab gained focus.
    TabActivated { tab_id: i64 },
    /// A tab was closed. Tab ids are recycled by the host, so all state
    /// keyed by this id is stale after this message.
    TabRemoved { tab_id: i64 },
    /// Arm a reminder for a tab. `delay_ms` must be positive.
    Arm { tab_id: i64, delay_ms: i64 },
    /// Disarm a tab's reminder. No-op if none is armed.
    Cancel { tab_id: i64 },
    /// Set the global recurring interval. `0` disables re-arming after fire.
    SetInterval { interval_ms: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_message_tagged_by_type() {
        let msg: BridgeMessage =
            serde_json::from_str(r#"{"type":"arm","tab_id":42,"delay_ms":3000}"#).unwrap();
        assert_eq!(
            msg,
            BridgeMessage::Arm {
                tab_id: 42,
                delay_ms: 3000
            }
        );

        let msg: BridgeMessage = serde_json::from_str(
            r#"{"type":"tab_updated","tab":{"tab_id":7,"url":"https://github.com/x","title":"x"}}"#,
        )
        .unwrap();
        match msg {
            BridgeMessage::TabUpdated { tab } => {
                assert_eq!(tab.tab_id, 7);
                assert_eq!(tab.url, "https://github.com/x");
            }
            other => panic!("expected tab_updated, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = serde_json::from_str::<BridgeMessage>(r#"{"type":"start_reminder"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_tab_info_missing_fields_default() {
        let msg: BridgeMessage =
            serde_json::from_str(r#"{"type":"tab_created","tab":{"tab_id":3}}"#).unwrap();
        match msg {
            BridgeMessage::TabCreated { tab } => {
                assert!(tab.url.is_empty());
                assert!(tab.title.is_empty());
            }
            other => panic!("expected tab_created, got {other:?}"),
        }
    }
}
