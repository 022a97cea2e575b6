//! Reply rendering: schedules, menus and status as outbound messages.

use chorebot_core::calendar::MonthKey;
use chorebot_core::message::{CardRow, OutboundMessage, QuickReply};
use chorebot_core::roster::Roster;
use chorebot_core::schedule::MonthSchedule;
use chorebot_rotation::RotationStatus;

use crate::command::{EDIT_MONTH, MAIN_MENU, PICK_NEXT, SELECT_PREFIX, VIEW_MONTH};

const DATE_FORMAT: &str = "%Y/%m/%d";

/// Quick replies offered after every answer.
pub fn main_menu() -> Vec<QuickReply> {
    vec![
        QuickReply::new(format!("📅 {VIEW_MONTH}"), VIEW_MONTH),
        QuickReply::new(format!("👤 {PICK_NEXT}"), PICK_NEXT),
        QuickReply::new(format!("📝 {EDIT_MONTH}"), EDIT_MONTH),
    ]
}

/// One button per roommate plus a cancel button back to the menu.
pub fn roommate_selection(roster: &Roster) -> Vec<QuickReply> {
    let mut replies: Vec<QuickReply> = roster
        .names()
        .iter()
        .enumerate()
        .map(|(i, name)| QuickReply::new(name.as_str(), format!("{SELECT_PREFIX}{i}")))
        .collect();
    replies.push(QuickReply::new("❌ 取消", MAIN_MENU));
    replies
}

pub fn schedule_card(month: MonthKey, schedule: &MonthSchedule) -> OutboundMessage {
    OutboundMessage::Card {
        alt_text: format!("{}年{}月排程", month.year, month.month),
        title: format!("{}年{}月 倒垃圾排程", month.year, month.month),
        rows: schedule
            .iter()
            .map(|a| CardRow {
                heading: format!("第{}週：{}", a.week.ordinal, a.roommate),
                detail: format!(
                    "{} ~ {}",
                    a.week.start_date.format(DATE_FORMAT),
                    a.week.end_date.format(DATE_FORMAT)
                ),
            })
            .collect(),
    }
}

/// Terminal rendering: one block per week with its full time span.
pub fn plain_schedule(schedule: &MonthSchedule) -> String {
    schedule
        .iter()
        .map(|a| {
            format!(
                "倒垃圾 - {}\n時間：{} 00:00 ~ {} 23:59",
                a.roommate,
                a.week.start_date.format(DATE_FORMAT),
                a.week.end_date.format(DATE_FORMAT)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn status_text(status: &RotationStatus) -> String {
    let updated = match status.cursor.last_updated() {
        Some(key) => format!("最後更新：{}年{}月", key.year, key.month),
        None => "尚未產生過排程".to_string(),
    };
    format!("👤 下一個輪到的室友：{}\n🕒 {updated}", status.next_roommate)
}

pub fn edit_usage(roster: &Roster) -> String {
    format!(
        "📝 {EDIT_MONTH}\n請輸入：{EDIT_MONTH} 第1週:名字 第3週:名字\n可選室友：{}",
        roster.names().join("、")
    )
}
