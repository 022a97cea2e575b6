//! `chorebot status`: Show rotation state and where it lives.

use chorebot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (config, engine) = super::load_engine()?;
    let status = engine.status().await;

    println!("🗑️  Chorebot Status");
    println!("==================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Data dir:     {}", config.data_dir().display());
    println!("  Roommates:    {}", config.roommates.join(", "));
    println!(
        "  Next up:      {} (index {})",
        status.next_roommate, status.cursor.next_index
    );
    match status.cursor.last_updated() {
        Some(key) => println!("  Last update:  {}年{}月", key.year, key.month),
        None => println!("  Last update:  never"),
    }
    println!(
        "  LINE:         {}",
        if config.has_line_credentials() { "configured" } else { "missing credentials" }
    );

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `chorebot onboard` first");
    }

    Ok(())
}
