//! Chat channel implementations for Chorebot.
//!
//! Each channel verifies and parses webhook deliveries from a chat platform
//! and sends replies back. Channels are trait-based and platform-agnostic.
//!
//! Available channels:
//! - **LINE**: LINE Messaging API (signed webhooks + reply API)

pub mod line;

pub use line::{LineChannel, SIGNATURE_HEADER, to_line_message};
