//! `chorebot onboard`: First-time setup.

use chorebot_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🗑️  Chorebot — First-Time Setup");
    println!("===============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    let data_dir = AppConfig::default().data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        println!("✅ Created data directory: {}", data_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. List your roommates in {}", config_path.display());
        println!("   2. Set LINE_CHANNEL_SECRET and LINE_CHANNEL_ACCESS_TOKEN");
        println!("   3. Run: chorebot serve\n");
    }

    println!("🎉 Setup complete! Run `chorebot status` to check the rotation.\n");

    Ok(())
}
