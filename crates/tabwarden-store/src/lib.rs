//! # tabwarden-store
//!
//! Persistent reminder and activity state for tabwarden (SQLite-backed).
//! The store is the single source of truth across process restarts.

pub mod notifications;
pub mod store;

pub use notifications::NotificationLog;
pub use store::Store;
