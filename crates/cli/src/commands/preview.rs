//! `chorebot preview`: Dry-run upcoming months. Nothing is saved.

use chorebot_rotation::ScheduleSource;

pub async fn run(
    year: Option<i32>,
    month: Option<u32>,
    months: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let (year, month) = super::target_month(year, month);
    let (_, engine) = super::load_engine()?;

    for preview in engine.preview(year, month, months).await? {
        let tag = match preview.source {
            ScheduleSource::Stored => " (stored)",
            ScheduleSource::Generated => "",
        };
        println!("📅 {}年{}月{tag}", preview.month.year, preview.month.month);
        for assignment in &preview.schedule {
            println!(
                "  第{}週  {} ~ {}  {}",
                assignment.week.ordinal,
                assignment.week.start_date.format("%Y/%m/%d"),
                assignment.week.end_date.format("%Y/%m/%d"),
                assignment.roommate
            );
        }
        println!(
            "  → next: {}\n",
            engine.roster().rotate(preview.next_index, 0)
        );
    }

    Ok(())
}
