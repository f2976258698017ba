use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{fetch_all, AirVisualClient};
use crate::locations::{self, Location};
use crate::sink;
use crate::types::{AirQualityApi, Reading, ResultTable};
use std::time::Duration;
use tracing::{info, warn};

/// Wrap fetched readings into the run's result table, preserving order.
pub fn aggregate(readings: Vec<Reading>) -> ResultTable {
    ResultTable::from_rows(readings)
}

/// Run the full collection pipeline once against the live provider.
pub async fn run(config: &Config) -> Result<()> {
    let api = AirVisualClient::new(&config.airvisual)?;
    run_with_api(&api, locations::CITIES, config).await
}

/// Pipeline body, parameterized over the data source.
///
/// Fetch every location, aggregate, and store. An empty table skips the
/// storage step entirely; a sink failure is the only fatal outcome.
pub async fn run_with_api(
    api: &dyn AirQualityApi,
    cities: &[Location],
    config: &Config,
) -> Result<()> {
    info!("Starting air quality pipeline");
    println!("🚀 Starting global air quality pipeline...");

    let delay = Duration::from_millis(config.airvisual.delay_ms);
    let readings = fetch_all(api, cities, delay).await;
    let table = aggregate(readings);

    println!("\n📊 Collection results:");
    println!("   Cities polled: {}", cities.len());
    println!("   Readings collected: {}", table.len());
    println!("   Failures: {}", cities.len() - table.len());

    if table.is_empty() {
        warn!("No data fetched; skipping storage");
        println!("⚠️  No data fetched. Skipping storage.");
    } else {
        sink::write(&table, &config.csv_path(), &config.db_path())?;
    }

    info!("Pipeline completed");
    println!("✅ Pipeline completed.");
    Ok(())
}
