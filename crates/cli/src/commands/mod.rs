pub mod onboard;
pub mod preview;
pub mod reset;
pub mod schedule;
pub mod serve;
pub mod set_next;
pub mod status;
pub mod weeks;

use chorebot_config::AppConfig;
use chorebot_rotation::RotationEngine;
use chrono::Datelike;

fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Rotation engine over the configured roster and state files.
fn load_engine() -> Result<(AppConfig, RotationEngine), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let engine = chorebot_gateway::engine_from_config(&config)?;
    tracing::debug!(
        roommates = engine.roster().len(),
        data_dir = %config.data_dir().display(),
        "Rotation engine loaded"
    );
    Ok((config, engine))
}

/// Fill in missing `--year`/`--month` from today's date.
fn target_month(year: Option<i32>, month: Option<u32>) -> (i32, u32) {
    let today = chorebot_gateway::local_today();
    (
        year.unwrap_or_else(|| today.year()),
        month.unwrap_or_else(|| today.month()),
    )
}
