//! Channel trait: the abstraction over chat platforms.
//!
//! A Channel receives signed webhook deliveries from a messaging platform
//! (LINE today), turns them into [`ChannelMessage`]s and sends replies back
//! through the platform's reply API.

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::message::OutboundMessage;

/// Unique identifier for a channel instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(pub String);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A text message received from a channel.
#[derive(Debug, Clone)]
pub struct ChannelMessage {
    /// The channel this message belongs to
    pub channel_id: ChannelId,

    /// Sender identifier (platform-specific user ID), if the platform shared it
    pub sender_id: Option<String>,

    /// The text content
    pub content: String,

    /// Single-use token for answering this message
    pub reply_token: String,
}

/// The core Channel trait.
///
/// Implementations handle platform-specific signature schemes, payload
/// formats and reply delivery.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name (e.g., "line").
    fn name(&self) -> &str;

    /// Check a webhook body against the signature header the platform sent.
    fn verify_signature(&self, body: &[u8], signature: &str) -> bool;

    /// Extract the text messages from a webhook body. Other events are skipped.
    fn parse_messages(&self, body: &[u8]) -> Result<Vec<ChannelMessage>, ChannelError>;

    /// Answer a message identified by its reply token.
    async fn reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), ChannelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_id_displays_bare_name() {
        assert_eq!(ChannelId("line".into()).to_string(), "line");
        assert_eq!(format!("from {}", ChannelId("line".into())), "from line");
    }
}
