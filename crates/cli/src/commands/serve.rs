//! `chorebot serve`: Start the LINE webhook server.

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🗑️  Chorebot Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Callback:  {}", config.gateway.callback_path);
    println!("   Roommates: {}", config.roommates.join(", "));

    chorebot_gateway::start(config).await?;

    Ok(())
}
