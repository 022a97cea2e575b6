//! LINE Messaging API channel adapter.
//!
//! LINE POSTs webhook events signed with the channel secret; answers go
//! back through the reply API using the single-use reply token of each
//! event.
//!
//! - Signature: `X-Line-Signature` = base64(HMAC-SHA256(channel_secret, body))
//! - Reply: `POST {api_base}/v2/bot/message/reply` with a bearer access token

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chorebot_config::LineConfig;
use chorebot_core::channel::{Channel, ChannelId, ChannelMessage};
use chorebot_core::error::ChannelError;
use chorebot_core::message::{OutboundMessage, QuickReply};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::{Value, json};
use sha2::Sha256;
use tracing::{debug, info, warn};

type HmacSha256 = Hmac<Sha256>;

/// Header LINE puts the body signature in.
pub const SIGNATURE_HEADER: &str = "X-Line-Signature";

/// The reply API accepts at most this many messages per call.
const MAX_REPLY_MESSAGES: usize = 5;
const MAX_QUICK_REPLY_ITEMS: usize = 13;
const MAX_QUICK_REPLY_LABEL_CHARS: usize = 20;

pub struct LineChannel {
    config: LineConfig,
    channel_id: ChannelId,
    http: reqwest::Client,
}

impl LineChannel {
    pub fn new(config: LineConfig) -> Self {
        Self {
            config,
            channel_id: ChannelId("line".into()),
            http: reqwest::Client::new(),
        }
    }

    /// Sign a body the way LINE does. Used to verify deliveries (and by tests
    /// to forge valid ones).
    pub fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(body);
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

#[async_trait]
impl Channel for LineChannel {
    fn name(&self) -> &str {
        "line"
    }

    /// Constant-time check of `X-Line-Signature`. Without a channel secret
    /// every delivery is rejected.
    fn verify_signature(&self, body: &[u8], signature: &str) -> bool {
        let secret = match self.config.channel_secret.as_deref() {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("LINE channel secret not configured, rejecting webhook");
                return false;
            }
        };

        let provided = match STANDARD.decode(signature.trim()) {
            Ok(bytes) => bytes,
            Err(_) => return false, // Invalid base64 = reject
        };

        let Ok(mut mac) = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(body);

        // Constant-time comparison via `verify_slice`
        mac.verify_slice(&provided).is_ok()
    }

    fn parse_messages(&self, body: &[u8]) -> Result<Vec<ChannelMessage>, ChannelError> {
        let payload: WebhookBody = serde_json::from_slice(body)
            .map_err(|e| ChannelError::InvalidPayload(e.to_string()))?;

        let total = payload.events.len();
        let messages: Vec<ChannelMessage> = payload
            .events
            .into_iter()
            .filter_map(|event| {
                if event.kind != "message" {
                    return None;
                }
                let message = event.message?;
                if message.kind != "text" {
                    return None;
                }
                Some(ChannelMessage {
                    channel_id: self.channel_id.clone(),
                    sender_id: event.source.and_then(|s| s.user_id),
                    content: message.text?,
                    reply_token: event.reply_token?,
                })
            })
            .collect();

        debug!(events = total, text_messages = messages.len(), "Parsed LINE webhook");
        Ok(messages)
    }

    async fn reply(
        &self,
        reply_token: &str,
        messages: &[OutboundMessage],
    ) -> Result<(), ChannelError> {
        let token = self
            .config
            .channel_access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ChannelError::NotConfigured("LINE channel access token".into()))?;

        if messages.len() > MAX_REPLY_MESSAGES {
            warn!(count = messages.len(), "Too many reply messages, truncating");
        }
        let body = json!({
            "replyToken": reply_token,
            "messages": messages
                .iter()
                .take(MAX_REPLY_MESSAGES)
                .map(to_line_message)
                .collect::<Vec<_>>(),
        });

        let url = format!("{}/v2/bot/message/reply", self.config.api_base.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChannelError::DeliveryFailed {
                channel: "line".into(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChannelError::DeliveryFailed {
                channel: "line".into(),
                reason: format!("HTTP {status}: {detail}"),
            });
        }

        info!(messages = messages.len().min(MAX_REPLY_MESSAGES), "LINE reply sent");
        Ok(())
    }
}

// --- Inbound wire format ---

#[derive(Deserialize)]
struct WebhookBody {
    #[serde(default)]
    events: Vec<WebhookEvent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    reply_token: Option<String>,
    #[serde(default)]
    source: Option<EventSource>,
    #[serde(default)]
    message: Option<EventMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventSource {
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct EventMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

// --- Outbound wire format ---

/// Convert a reply into a LINE message object (text or flex bubble).
pub fn to_line_message(message: &OutboundMessage) -> Value {
    match message {
        OutboundMessage::Text {
            text,
            quick_replies,
        } => {
            let mut value = json!({ "type": "text", "text": text });
            if !quick_replies.is_empty() {
                value["quickReply"] = quick_reply_json(quick_replies);
            }
            value
        }
        OutboundMessage::Card {
            alt_text,
            title,
            rows,
        } => {
            let mut contents = vec![
                json!({ "type": "text", "text": title, "weight": "bold", "size": "lg", "color": "#1DB446" }),
                json!({ "type": "text", "text": " ", "size": "sm" }),
            ];
            for row in rows {
                contents.push(json!({ "type": "text", "text": row.heading, "weight": "bold", "color": "#333333" }));
                contents.push(json!({ "type": "text", "text": row.detail, "size": "sm", "color": "#666666" }));
                contents.push(json!({ "type": "text", "text": " ", "size": "xs" }));
            }
            json!({
                "type": "flex",
                "altText": alt_text,
                "contents": {
                    "type": "bubble",
                    "body": { "type": "box", "layout": "vertical", "contents": contents },
                },
            })
        }
    }
}

fn quick_reply_json(replies: &[QuickReply]) -> Value {
    let items: Vec<Value> = replies
        .iter()
        .take(MAX_QUICK_REPLY_ITEMS)
        .map(|reply| {
            let label: String = reply.label.chars().take(MAX_QUICK_REPLY_LABEL_CHARS).collect();
            json!({
                "type": "action",
                "action": { "type": "message", "label": label, "text": reply.text },
            })
        })
        .collect();
    json!({ "items": items })
}
