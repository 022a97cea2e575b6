//! HTTP gateway for Chorebot.
//!
//! Receives LINE webhook deliveries, verifies their signature, runs each
//! text message through the [`Dispatcher`] and sends the replies back
//! through the channel. Built on Axum.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
};
use chorebot_channels::{LineChannel, SIGNATURE_HEADER};
use chorebot_config::{AppConfig, ConfigError};
use chorebot_core::channel::Channel;
use chorebot_dispatch::Dispatcher;
use chorebot_rotation::RotationEngine;
use chorebot_store::FileStore;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info, warn};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state for the webhook handlers.
pub struct GatewayState {
    pub dispatcher: Arc<Dispatcher>,
    pub channel: Arc<dyn Channel>,
    /// Source of "today"; commands act on the month it falls in.
    pub clock: fn() -> NaiveDate,
}

type SharedState = Arc<GatewayState>;

/// Local calendar date of the host.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Build the rotation engine over the configured roster and state files.
pub fn engine_from_config(config: &AppConfig) -> Result<RotationEngine, ConfigError> {
    let roster = config.roster()?;
    let store = FileStore::in_dir(
        &config.data_dir(),
        &config.storage.cursor_file,
        &config.storage.schedules_file,
    );
    Ok(RotationEngine::new(roster, Arc::new(store)))
}

/// Build the Axum router: `/health` plus the webhook at `callback_path`.
pub fn build_router(state: SharedState, callback_path: &str) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(callback_path, post(callback_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    if !config.has_line_credentials() {
        warn!("LINE credentials missing: webhooks will be rejected or left unanswered");
    }

    let engine = engine_from_config(&config)?;
    info!(
        roommates = engine.roster().len(),
        data_dir = %config.data_dir().display(),
        "Rotation engine ready"
    );

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(engine),
        config.bot.menu_triggers.clone(),
    ));
    let state = Arc::new(GatewayState {
        dispatcher,
        channel: Arc::new(LineChannel::new(config.line.clone())),
        clock: local_today,
    });

    let app = build_router(state, &config.gateway.callback_path);

    info!(addr = %addr, callback = %config.gateway.callback_path, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn callback_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, StatusCode> {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("Webhook without signature header");
        return Err(StatusCode::BAD_REQUEST);
    };

    if !state.channel.verify_signature(&body, signature) {
        warn!(channel = state.channel.name(), "Invalid webhook signature");
        return Err(StatusCode::BAD_REQUEST);
    }

    let messages = state.channel.parse_messages(&body).map_err(|e| {
        warn!(error = %e, "Unparseable webhook body");
        StatusCode::BAD_REQUEST
    })?;

    let today = (state.clock)();
    for message in messages {
        debug!(
            channel = %message.channel_id,
            sender = message.sender_id.as_deref().unwrap_or("unknown"),
            len = message.content.len(),
            "Incoming message"
        );

        let Some(replies) = state.dispatcher.handle(&message.content, today).await else {
            continue;
        };
        if replies.is_empty() {
            continue;
        }

        if let Err(e) = state.channel.reply(&message.reply_token, &replies).await {
            error!(channel = state.channel.name(), error = %e, "Reply failed");
        }
    }

    Ok("OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use chorebot_config::LineConfig;
    use chorebot_core::channel::ChannelMessage;
    use chorebot_core::error::ChannelError;
    use chorebot_core::message::OutboundMessage;
    use chorebot_core::roster::Roster;
    use chorebot_store::InMemoryStore;
    use http_body_util::BodyExt;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    /// LINE parsing and verification, with replies captured instead of sent.
    struct RecordingChannel {
        line: LineChannel,
        sent: Mutex<Vec<(String, Vec<OutboundMessage>)>>,
    }

    #[async_trait]
    impl Channel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        fn verify_signature(&self, body: &[u8], signature: &str) -> bool {
            self.line.verify_signature(body, signature)
        }

        fn parse_messages(&self, body: &[u8]) -> Result<Vec<ChannelMessage>, ChannelError> {
            self.line.parse_messages(body)
        }

        async fn reply(
            &self,
            reply_token: &str,
            messages: &[OutboundMessage],
        ) -> Result<(), ChannelError> {
            self.sent
                .lock()
                .await
                .push((reply_token.to_string(), messages.to_vec()));
            Ok(())
        }
    }

    fn sept() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 10).unwrap()
    }

    fn setup() -> (Router, Arc<RecordingChannel>) {
        let channel = Arc::new(RecordingChannel {
            line: LineChannel::new(LineConfig {
                channel_secret: Some(SECRET.into()),
                ..LineConfig::default()
            }),
            sent: Mutex::new(Vec::new()),
        });
        let roster = Roster::new(["A", "B", "C"]).unwrap();
        let engine = RotationEngine::new(roster, Arc::new(InMemoryStore::new()));
        let state = Arc::new(GatewayState {
            dispatcher: Arc::new(Dispatcher::new(Arc::new(engine), vec!["倒垃圾咪狗".into()])),
            channel: channel.clone(),
            clock: sept,
        });
        (build_router(state, "/callback"), channel)
    }

    fn text_event(text: &str) -> String {
        serde_json::json!({
            "destination": "U0",
            "events": [{
                "type": "message",
                "replyToken": "reply-1",
                "source": { "type": "user", "userId": "U123" },
                "message": { "type": "text", "id": "1", "text": text }
            }]
        })
        .to_string()
    }

    fn callback(body: String, signature: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/callback")
            .header("content-type", "application/json");
        if let Some(signature) = signature {
            builder = builder.header(SIGNATURE_HEADER, signature);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = setup();
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn missing_signature_is_rejected() {
        let (app, channel) = setup();
        let response = app.oneshot(callback(text_event("主選單"), None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(channel.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn bad_signature_is_rejected() {
        let (app, channel) = setup();
        let body = text_event("主選單");
        let forged = LineChannel::sign("other-secret", body.as_bytes());

        let response = app.oneshot(callback(body, Some(&forged))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(channel.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn signed_command_gets_reply() {
        let (app, channel) = setup();
        let body = text_event("查看本月排程");
        let signature = LineChannel::sign(SECRET, body.as_bytes());

        let response = app.oneshot(callback(body, Some(&signature))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let sent = channel.sent.lock().await;
        assert_eq!(sent.len(), 1);
        let (token, messages) = &sent[0];
        assert_eq!(token, "reply-1");
        assert!(matches!(
            &messages[0],
            OutboundMessage::Card { title, .. } if title == "2025年9月 倒垃圾排程"
        ));
    }

    #[tokio::test]
    async fn chatter_gets_no_reply() {
        let (app, channel) = setup();
        let body = text_event("今天吃什麼");
        let signature = LineChannel::sign(SECRET, body.as_bytes());

        let response = app.oneshot(callback(body, Some(&signature))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(channel.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn signed_garbage_is_bad_request() {
        let (app, _) = setup();
        let body = "not json".to_string();
        let signature = LineChannel::sign(SECRET, body.as_bytes());

        let response = app.oneshot(callback(body, Some(&signature))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
