//! Command parser.
//!
//! Commands are the exact texts sent by the quick-reply buttons, so most
//! are matched literally. Two carry arguments:
//! - `選擇室友{i}`: make roommate `i` next
//! - `更改本月排程 第1週:名字 3:名字 ...`: reassign weeks of this month;
//!   entries may be split by spaces, newlines or commas and use an ASCII
//!   or full-width colon

use std::collections::BTreeMap;

use thiserror::Error;

pub const VIEW_MONTH: &str = "查看本月排程";
pub const PICK_NEXT: &str = "設定下個室友";
pub const SELECT_PREFIX: &str = "選擇室友";
pub const EDIT_MONTH: &str = "更改本月排程";
pub const STATUS: &str = "目前狀態";
pub const MAIN_MENU: &str = "主選單";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MainMenu,
    ViewMonth,
    PickNextRoommate,
    SetNext(i64),
    /// Ordinal → roommate. Empty asks for usage help.
    EditMonth(BTreeMap<u32, String>),
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("無效的室友編號：{0}")]
    BadIndex(String),

    #[error("無法解讀的週次設定：{0}（格式：第1週:名字）")]
    BadEntry(String),
}

/// Parse a message. `None` means the text is not a command and gets no reply.
pub fn parse(text: &str, menu_triggers: &[String]) -> Option<Result<Command, ParseError>> {
    let text = text.trim();

    if text == MAIN_MENU || menu_triggers.iter().any(|t| t == text) {
        return Some(Ok(Command::MainMenu));
    }

    match text {
        VIEW_MONTH => return Some(Ok(Command::ViewMonth)),
        PICK_NEXT => return Some(Ok(Command::PickNextRoommate)),
        STATUS => return Some(Ok(Command::Status)),
        _ => {}
    }

    if let Some(rest) = text.strip_prefix(SELECT_PREFIX) {
        let rest = rest.trim();
        return Some(
            rest.parse()
                .map(Command::SetNext)
                .map_err(|_| ParseError::BadIndex(rest.to_string())),
        );
    }

    if let Some(rest) = text.strip_prefix(EDIT_MONTH) {
        return Some(parse_edits(rest).map(Command::EditMonth));
    }

    None
}

fn parse_edits(raw: &str) -> Result<BTreeMap<u32, String>, ParseError> {
    // Glue "第1週 : 名字" into one token before splitting entries apart.
    let normalized = raw.replace('：', ":");
    let compact = normalized
        .split(':')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(":");

    let mut changes = BTreeMap::new();
    for entry in compact
        .split(|c: char| c.is_whitespace() || c == ',' || c == '，' || c == '、')
        .filter(|entry| !entry.is_empty())
    {
        let bad = || ParseError::BadEntry(entry.to_string());
        let (week, name) = entry.split_once(':').ok_or_else(bad)?;

        let week = week.strip_prefix('第').unwrap_or(week);
        let week = week
            .strip_suffix('週')
            .or_else(|| week.strip_suffix('周'))
            .unwrap_or(week);
        let ordinal: u32 = week.parse().map_err(|_| bad())?;
        if ordinal == 0 || name.is_empty() {
            return Err(bad());
        }

        // A week named twice in one batch is ambiguous.
        if changes.insert(ordinal, name.to_string()).is_some() {
            return Err(bad());
        }
    }
    Ok(changes)
}
