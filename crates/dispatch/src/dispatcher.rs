//! Dispatcher: runs a parsed command against the rotation engine.
//!
//! Domain rejections come back as reply texts prefixed with ⚠️, never as
//! errors, so every command gets an answer.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use chorebot_core::calendar::MonthKey;
use chorebot_core::message::OutboundMessage;
use chorebot_rotation::{Generation, RotationEngine, RotationError, ScheduleSource};
use tracing::{debug, warn};

use crate::command::{self, Command, ParseError};
use crate::render;

/// Routes parsed chat commands to the rotation engine.
pub struct Dispatcher {
    engine: Arc<RotationEngine>,
    menu_triggers: Vec<String>,
}

impl Dispatcher {
    pub fn new(engine: Arc<RotationEngine>, menu_triggers: Vec<String>) -> Self {
        Self {
            engine,
            menu_triggers,
        }
    }

    pub fn engine(&self) -> &RotationEngine {
        &self.engine
    }

    /// Answer one message. `today` picks "this month".
    ///
    /// Returns `None` for text that is not a command; the bot stays silent.
    pub async fn handle(&self, text: &str, today: NaiveDate) -> Option<Vec<OutboundMessage>> {
        let command = match command::parse(text, &self.menu_triggers)? {
            Ok(command) => command,
            Err(e) => {
                debug!(error = %e, "Rejected command");
                return Some(vec![self.text(parse_rejection(&e))]);
            }
        };
        debug!(?command, "Dispatching command");

        let replies = match command {
            Command::MainMenu => vec![self.text("🏠 室友輪值排程系統\n\n請選擇功能：")],
            Command::ViewMonth => self.view_month(today).await,
            Command::PickNextRoommate => vec![
                OutboundMessage::text("請選擇下一個輪到的室友：")
                    .with_quick_replies(render::roommate_selection(self.engine.roster())),
            ],
            Command::SetNext(index) => match self.engine.set_next_index(index).await {
                Ok(name) => vec![self.text(format!("✅ 已設定下一個輪到的室友為：{name}"))],
                Err(e) => vec![self.text(rotation_rejection(&e))],
            },
            Command::EditMonth(changes) if changes.is_empty() => {
                vec![self.text(render::edit_usage(self.engine.roster()))]
            }
            Command::EditMonth(changes) => {
                match self
                    .engine
                    .reassign_weeks(today.year(), today.month(), &changes)
                    .await
                {
                    Ok(schedule) => vec![
                        render::schedule_card(MonthKey::of(today), &schedule),
                        self.text("✅ 本月排程已更新！"),
                    ],
                    Err(e) => vec![self.text(rotation_rejection(&e))],
                }
            }
            Command::Status => {
                let status = self.engine.status().await;
                vec![self.text(render::status_text(&status))]
            }
        };
        Some(replies)
    }

    async fn view_month(&self, today: NaiveDate) -> Vec<OutboundMessage> {
        match self.engine.generate(today.year(), today.month()).await {
            Ok(Generation::Scheduled {
                schedule,
                cursor,
                source,
            }) => {
                let next = self.engine.roster().rotate(cursor.next_index, 0);
                let note = match source {
                    ScheduleSource::Generated => format!("✅ 排程已更新！\n下個月將從 {next} 開始"),
                    ScheduleSource::Stored => format!("📌 本月排程已存在\n下個月將從 {next} 開始"),
                };
                vec![
                    render::schedule_card(MonthKey::of(today), &schedule),
                    self.text(note),
                ]
            }
            Ok(Generation::NoQualifyingWeeks { .. }) => vec![self.text("本月沒有符合條件的週次")],
            Err(e) => {
                warn!(error = %e, "Schedule generation failed");
                vec![self.text(rotation_rejection(&e))]
            }
        }
    }

    fn text(&self, text: impl Into<String>) -> OutboundMessage {
        OutboundMessage::text(text).with_quick_replies(render::main_menu())
    }
}

fn parse_rejection(err: &ParseError) -> String {
    format!("⚠️ {err}")
}

fn rotation_rejection(err: &RotationError) -> String {
    match err {
        RotationError::InvalidIndex { index, len } => {
            format!("⚠️ 無效的室友編號：{index}（請輸入 0 到 {} 之間）", len - 1)
        }
        RotationError::InvalidRoommateName(name) => format!("⚠️ 找不到室友：{name}"),
        RotationError::InvalidWeek {
            month,
            ordinal,
            weeks,
        } => format!(
            "⚠️ {}年{}月沒有第{ordinal}週（共 {weeks} 週）",
            month.year, month.month
        ),
        RotationError::MonthNotGenerated(month) => format!(
            "⚠️ {}年{}月尚未產生排程，請先{}",
            month.year,
            month.month,
            command::VIEW_MONTH
        ),
        RotationError::Calendar(e) => format!("⚠️ 日期錯誤：{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorebot_core::roster::Roster;
    use chorebot_store::InMemoryStore;

    fn dispatcher(store: &InMemoryStore) -> Dispatcher {
        let roster = Roster::new(["A", "B", "C"]).unwrap();
        let engine = RotationEngine::new(roster, Arc::new(store.clone()));
        Dispatcher::new(Arc::new(engine), vec!["倒垃圾咪狗".into()])
    }

    fn sept() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 17).unwrap()
    }

    fn last_text(replies: &[OutboundMessage]) -> String {
        replies.last().unwrap().to_plain_text()
    }

    #[tokio::test]
    async fn non_commands_get_no_reply() {
        let d = dispatcher(&InMemoryStore::new());
        assert!(d.handle("早安", sept()).await.is_none());
    }

    #[tokio::test]
    async fn trigger_shows_main_menu() {
        let d = dispatcher(&InMemoryStore::new());
        let replies = d.handle("倒垃圾咪狗", sept()).await.unwrap();
        let OutboundMessage::Text { text, quick_replies } = &replies[0] else {
            panic!("expected text");
        };
        assert!(text.contains("請選擇功能"));
        assert_eq!(quick_replies.len(), 3);
    }

    #[tokio::test]
    async fn view_month_generates_then_reuses() {
        let store = InMemoryStore::new();
        let d = dispatcher(&store);

        let first = d.handle("查看本月排程", sept()).await.unwrap();
        assert!(matches!(first[0], OutboundMessage::Card { ref rows, .. } if rows.len() == 5));
        // Five weeks from A with three roommates: next month starts at C.
        assert!(last_text(&first).contains("排程已更新"));
        assert!(last_text(&first).contains("C"));

        let second = d.handle("查看本月排程", sept()).await.unwrap();
        assert_eq!(first[0], second[0]);
        assert!(last_text(&second).contains("已存在"));
    }

    #[tokio::test]
    async fn select_roommate_sets_cursor() {
        let store = InMemoryStore::new();
        let d = dispatcher(&store);

        let replies = d.handle("選擇室友1", sept()).await.unwrap();
        assert!(last_text(&replies).contains("B"));
        assert_eq!(d.engine().status().await.next_roommate, "B");

        let replies = d.handle("選擇室友7", sept()).await.unwrap();
        assert!(last_text(&replies).starts_with("⚠️"));
        assert_eq!(d.engine().status().await.next_roommate, "B");
    }

    #[tokio::test]
    async fn pick_next_lists_roommates() {
        let d = dispatcher(&InMemoryStore::new());
        let replies = d.handle("設定下個室友", sept()).await.unwrap();
        let OutboundMessage::Text { quick_replies, .. } = &replies[0] else {
            panic!("expected text");
        };
        assert_eq!(quick_replies.len(), 4);
        assert_eq!(quick_replies[0].text, "選擇室友0");
    }

    #[tokio::test]
    async fn edit_month_requires_generated_month() {
        let d = dispatcher(&InMemoryStore::new());
        let replies = d.handle("更改本月排程 第1週:B", sept()).await.unwrap();
        assert!(last_text(&replies).contains("尚未產生排程"));
    }

    #[tokio::test]
    async fn edit_month_reassigns_weeks() {
        let d = dispatcher(&InMemoryStore::new());
        d.handle("查看本月排程", sept()).await.unwrap();

        let replies = d.handle("更改本月排程 第1週:C", sept()).await.unwrap();
        let OutboundMessage::Card { rows, .. } = &replies[0] else {
            panic!("expected card");
        };
        assert_eq!(rows[0].heading, "第1週：C");

        let replies = d.handle("更改本月排程 第9週:C", sept()).await.unwrap();
        assert!(last_text(&replies).contains("沒有第9週"));

        let replies = d.handle("更改本月排程 第2週:Zed", sept()).await.unwrap();
        assert!(last_text(&replies).contains("Zed"));
    }

    #[tokio::test]
    async fn edit_month_without_entries_shows_usage() {
        let d = dispatcher(&InMemoryStore::new());
        let replies = d.handle("更改本月排程", sept()).await.unwrap();
        assert!(last_text(&replies).contains("第1週:名字"));
    }

    #[tokio::test]
    async fn status_reports_next_roommate() {
        let d = dispatcher(&InMemoryStore::new());
        let replies = d.handle("目前狀態", sept()).await.unwrap();
        assert!(last_text(&replies).contains("尚未產生過排程"));

        d.handle("查看本月排程", sept()).await.unwrap();
        let replies = d.handle("目前狀態", sept()).await.unwrap();
        assert!(last_text(&replies).contains("2025年9月"));
    }
}
