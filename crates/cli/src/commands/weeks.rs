//! `chorebot weeks`: Show which weeks of a month get a turn.
//!
//! Lists every Monday-start week touching the month and marks the ones the
//! month-boundary rule drops.

use chorebot_core::calendar;

pub fn run(year: Option<i32>, month: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let (year, month) = super::target_month(year, month);
    let raw = calendar::calendar_weeks(year, month)?;
    let kept = calendar::partition(year, month)?;

    println!("📆 {year}年{month}月: {} of {} weeks qualify", kept.len(), raw.len());
    for week in &raw {
        let span = format!(
            "{} ~ {}",
            week.start_date.format("%Y/%m/%d"),
            week.end_date.format("%Y/%m/%d")
        );
        match kept.iter().find(|k| k.start_date == week.start_date) {
            Some(k) => println!("  第{}週  {span}", k.ordinal),
            None => println!("  skip   {span}  (starts in the previous month)"),
        }
    }
    Ok(())
}
