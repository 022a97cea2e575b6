//! Config → file store → rotation engine → chat dispatcher, end to end.

use std::collections::BTreeMap;
use std::sync::Arc;

use chorebot_config::AppConfig;
use chorebot_core::message::OutboundMessage;
use chorebot_dispatch::Dispatcher;
use chorebot_rotation::RotationEngine;
use chorebot_store::FileStore;
use chrono::NaiveDate;

fn write_config(dir: &std::path::Path) -> AppConfig {
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        format!(
            r#"
roommates = ["Ann", "Ben", "Cat"]

[storage]
data_dir = "{}"
"#,
            dir.join("data").display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();
    AppConfig::load_from(&path).unwrap()
}

fn engine(config: &AppConfig) -> RotationEngine {
    let store = FileStore::in_dir(
        &config.data_dir(),
        &config.storage.cursor_file,
        &config.storage.schedules_file,
    );
    RotationEngine::new(config.roster().unwrap(), Arc::new(store))
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn rotation_continues_across_months_and_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    {
        let dispatcher = Dispatcher::new(Arc::new(engine(&config)), config.bot.menu_triggers.clone());

        // September 2025: five weeks, Ann Ben Cat Ann Ben.
        let replies = dispatcher.handle("查看本月排程", day(2025, 9, 3)).await.unwrap();
        let OutboundMessage::Card { rows, .. } = &replies[0] else {
            panic!("expected a schedule card");
        };
        let heads: Vec<&str> = rows.iter().map(|r| r.heading.as_str()).collect();
        assert_eq!(
            heads,
            ["第1週：Ann", "第2週：Ben", "第3週：Cat", "第4週：Ann", "第5週：Ben"]
        );
    }

    // A fresh process picks up where the last one stopped.
    let engine = engine(&config);
    assert_eq!(engine.status().await.next_roommate, "Cat");

    let stored = std::fs::read_to_string(config.data_dir().join(&config.storage.cursor_file)).unwrap();
    let cursor: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(cursor["next_index"], 2);
    assert_eq!(cursor["last_updated_year"], 2025);
    assert_eq!(cursor["last_updated_month"], 9);

    let dispatcher = Dispatcher::new(Arc::new(engine), config.bot.menu_triggers.clone());
    let replies = dispatcher.handle("查看本月排程", day(2025, 10, 1)).await.unwrap();
    let OutboundMessage::Card { rows, .. } = &replies[0] else {
        panic!("expected a schedule card");
    };
    // October 2025 starts on a Wednesday: its first full week begins the 6th.
    assert_eq!(rows[0].heading, "第1週：Cat");
    assert!(rows[0].detail.starts_with("2025/10/06"));
}

#[tokio::test]
async fn rejected_reassignment_leaves_files_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let engine = engine(&config);
    engine.generate(2025, 9).await.unwrap();

    let schedules_path = config.data_dir().join(&config.storage.schedules_file);
    let cursor_path = config.data_dir().join(&config.storage.cursor_file);
    let schedules_before = std::fs::read(&schedules_path).unwrap();
    let cursor_before = std::fs::read(&cursor_path).unwrap();

    let changes = BTreeMap::from([(1, "Ben".to_string()), (2, "Nobody".to_string())]);
    assert!(engine.reassign_weeks(2025, 9, &changes).await.is_err());

    let changes = BTreeMap::from([(6, "Ben".to_string())]);
    assert!(engine.reassign_weeks(2025, 9, &changes).await.is_err());

    assert_eq!(std::fs::read(&schedules_path).unwrap(), schedules_before);
    assert_eq!(std::fs::read(&cursor_path).unwrap(), cursor_before);
}

#[tokio::test]
async fn override_then_generate_starts_from_chosen_roommate() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let dispatcher = Dispatcher::new(Arc::new(engine(&config)), config.bot.menu_triggers.clone());

    dispatcher.handle("選擇室友2", day(2025, 9, 1)).await.unwrap();
    let replies = dispatcher.handle("查看本月排程", day(2025, 9, 1)).await.unwrap();
    let OutboundMessage::Card { rows, .. } = &replies[0] else {
        panic!("expected a schedule card");
    };
    assert_eq!(rows[0].heading, "第1週：Cat");
    assert_eq!(rows[1].heading, "第2週：Ann");
}
