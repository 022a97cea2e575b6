//! `chorebot schedule`: Show a month's schedule.
//!
//! Same path as the chat command: the first view of a month generates and
//! stores it and moves the rotation forward.

use chorebot_dispatch::render;
use chorebot_rotation::{Generation, ScheduleSource};

pub async fn run(year: Option<i32>, month: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let (year, month) = super::target_month(year, month);
    let (_, engine) = super::load_engine()?;

    match engine.generate(year, month).await? {
        Generation::Scheduled {
            schedule,
            cursor,
            source,
        } => {
            println!("📅 {year}年{month}月 倒垃圾排程\n");
            println!("{}\n", render::plain_schedule(&schedule));
            if source == ScheduleSource::Generated {
                println!("✅ 排程已產生並儲存");
            }
            println!(
                "下個月將從 {} 開始",
                engine.roster().rotate(cursor.next_index, 0)
            );
        }
        Generation::NoQualifyingWeeks { .. } => {
            println!("{year}年{month}月沒有符合條件的週次");
        }
    }

    Ok(())
}
