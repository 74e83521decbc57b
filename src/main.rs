use clap::Parser;
use parcel_triage::app;
use parcel_triage::config::{ServerConfig, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = ServerConfig::parse();

    // Start the web application
    app::run(config).await?;

    Ok(())
}
