use aqi_collector::config::Config;
use aqi_collector::{logging, pipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    logging::init_logging();

    let config = Config::load()?;
    pipeline::run(&config).await?;

    Ok(())
}
