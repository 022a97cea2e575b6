//! Outbound reply model: platform-neutral text and card messages.
//!
//! Channel adapters translate these into their wire format (LINE flex
//! bubbles, quick-reply buttons); the CLI prints [`OutboundMessage::to_plain_text`].

/// A tappable suggestion that sends `text` back when chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickReply {
    pub label: String,
    pub text: String,
}

impl QuickReply {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// One line pair in a card: a bold heading and a muted detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRow {
    pub heading: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Text {
        text: String,
        quick_replies: Vec<QuickReply>,
    },
    Card {
        /// Shown by clients that cannot render cards (and in notifications).
        alt_text: String,
        title: String,
        rows: Vec<CardRow>,
    },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            quick_replies: Vec::new(),
        }
    }

    /// Attach quick replies. No effect on cards.
    pub fn with_quick_replies(mut self, replies: Vec<QuickReply>) -> Self {
        if let Self::Text { quick_replies, .. } = &mut self {
            *quick_replies = replies;
        }
        self
    }

    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Text { text, .. } => text.clone(),
            Self::Card { title, rows, .. } => {
                let mut out = title.clone();
                for row in rows {
                    out.push_str("\n\n");
                    out.push_str(&row.heading);
                    out.push('\n');
                    out.push_str(&row.detail);
                }
                out
            }
        }
    }
}
