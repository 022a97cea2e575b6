//! Error types for the Chorebot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Invalid month key: {0}")]
    InvalidKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("Roommate list is empty")]
    Empty,

    #[error("Roommate name at position {0} is blank")]
    BlankName(usize),

    #[error("Duplicate roommate name: {0}")]
    Duplicate(String),
}

/// Failures at the state store boundary.
///
/// These never reach the chat user: the engine's persistence policy turns
/// read failures into defaults and write failures into warnings.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Corrupted record in {path}: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    #[error("Message delivery failed to {channel}: {reason}")]
    DeliveryFailed { channel: String, reason: String },

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}
