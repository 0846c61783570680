//! # tabwarden-core
//!
//! Core types, traits, configuration, and error handling for tabwarden.

pub mod config;
pub mod error;
pub mod event;
pub mod reminder;
pub mod traits;

pub use config::shellexpand;
