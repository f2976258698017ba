use crate::error::Result;
use crate::locations::Location;
use serde::{Deserialize, Serialize};

/// One row of air-quality and weather data collected for a city.
///
/// Field order matches the column order written to both sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub city: String,
    pub aqi_us: i64,
    pub main_pollutant_us: String,
    pub temperature: f64,
    pub humidity: i64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: i64,
    /// Observation time as reported by the provider (ISO-8601).
    pub timestamp: String,
    /// UTC capture time, stamped when the reading was fetched.
    pub datetime: String,
}

/// Ordered table of readings from a single collection run.
#[derive(Debug, Default)]
pub struct ResultTable {
    rows: Vec<Reading>,
}

impl ResultTable {
    pub fn from_rows(rows: Vec<Reading>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Reading] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Core trait every air-quality data source must implement
#[async_trait::async_trait]
pub trait AirQualityApi: Send + Sync {
    /// Unique identifier for this data source
    fn api_name(&self) -> &'static str;

    /// Fetch the current reading for a single location
    async fn current_reading(&self, location: &Location) -> Result<Reading>;
}
