use crate::config::AirVisualConfig;
use crate::error::{CollectorError, Result};
use crate::locations::Location;
use crate::types::{AirQualityApi, Reading};
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Client for the AirVisual `nearest_city` endpoint.
pub struct AirVisualClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AirVisualClient {
    pub fn new(config: &AirVisualConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait::async_trait]
impl AirQualityApi for AirVisualClient {
    fn api_name(&self) -> &'static str {
        "airvisual"
    }

    #[instrument(skip(self), fields(city = %location.label))]
    async fn current_reading(&self, location: &Location) -> Result<Reading> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let body: Value = response.json().await?;
        parse_reading(location.label, &body)
    }
}

/// Build a `Reading` from a `nearest_city` response body.
///
/// The provider reports `status: "success"` with measurements under
/// `data.current.pollution` and `data.current.weather`; any other status
/// carries an error message instead of data.
pub fn parse_reading(city: &str, body: &Value) -> Result<Reading> {
    let status = body["status"]
        .as_str()
        .ok_or_else(|| CollectorError::MissingField("status not found".into()))?;

    if status != "success" {
        // Error responses put the explanation either in a top-level
        // `message` or inside the `data` payload.
        let message = body["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| body["data"].to_string());
        return Err(CollectorError::Api { message });
    }

    let pollution = &body["data"]["current"]["pollution"];
    let weather = &body["data"]["current"]["weather"];

    Ok(Reading {
        city: city.to_string(),
        aqi_us: require_i64(pollution, "aqius")?,
        main_pollutant_us: require_str(pollution, "mainus")?.to_string(),
        temperature: require_f64(weather, "tp")?,
        humidity: require_i64(weather, "hu")?,
        pressure: require_f64(weather, "pr")?,
        wind_speed: require_f64(weather, "ws")?,
        wind_direction: require_i64(weather, "wd")?,
        timestamp: require_str(pollution, "ts")?.to_string(),
        datetime: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}

fn require_i64(obj: &Value, key: &str) -> Result<i64> {
    obj[key]
        .as_i64()
        .ok_or_else(|| CollectorError::MissingField(format!("{key} not found")))
}

fn require_f64(obj: &Value, key: &str) -> Result<f64> {
    obj[key]
        .as_f64()
        .ok_or_else(|| CollectorError::MissingField(format!("{key} not found")))
}

fn require_str<'a>(obj: &'a Value, key: &str) -> Result<&'a str> {
    obj[key]
        .as_str()
        .ok_or_else(|| CollectorError::MissingField(format!("{key} not found")))
}

/// Collect current readings for every location, skipping failures.
///
/// A failed entry is logged and dropped; the batch always runs to the end
/// and never returns an error. The pacing delay applies after every
/// request, success or not.
pub async fn fetch_all(
    api: &dyn AirQualityApi,
    locations: &[Location],
    delay: Duration,
) -> Vec<Reading> {
    let mut readings = Vec::new();

    for location in locations {
        match api.current_reading(location).await {
            Ok(reading) => {
                info!("Fetched reading for {}", location.label);
                readings.push(reading);
            }
            Err(CollectorError::Api { message }) => {
                warn!("API error for {}: {}", location.label, message);
                println!("⚠️  API error for {}: {}", location.label, message);
            }
            Err(e) => {
                warn!("Error fetching data for {}: {}", location.label, e);
                println!("⚠️  Error fetching data for {}: {}", location.label, e);
            }
        }

        tokio::time::sleep(delay).await;
    }

    readings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success_body() -> Value {
        json!({
            "status": "success",
            "data": {
                "city": "New York",
                "current": {
                    "pollution": {
                        "ts": "2024-01-01T00:00:00.000Z",
                        "aqius": 42,
                        "mainus": "p2"
                    },
                    "weather": {
                        "ts": "2024-01-01T00:00:00.000Z",
                        "tp": 21.5,
                        "hu": 60,
                        "pr": 1013,
                        "ws": 3.2,
                        "wd": 180
                    }
                }
            }
        })
    }

    #[test]
    fn test_parse_reading_success() {
        let reading = parse_reading("New York", &success_body()).unwrap();

        assert_eq!(reading.city, "New York");
        assert_eq!(reading.aqi_us, 42);
        assert_eq!(reading.main_pollutant_us, "p2");
        assert_eq!(reading.temperature, 21.5);
        assert_eq!(reading.humidity, 60);
        assert_eq!(reading.pressure, 1013.0);
        assert_eq!(reading.wind_speed, 3.2);
        assert_eq!(reading.wind_direction, 180);
        assert_eq!(reading.timestamp, "2024-01-01T00:00:00.000Z");
        assert!(!reading.datetime.is_empty());
    }

    #[test]
    fn test_parse_reading_stamps_capture_time() {
        let reading = parse_reading("New York", &success_body()).unwrap();

        // Capture time uses the `%Y-%m-%d %H:%M:%S` layout.
        assert_eq!(reading.datetime.len(), 19);
        assert_eq!(&reading.datetime[4..5], "-");
        assert_eq!(&reading.datetime[10..11], " ");
    }

    #[test]
    fn test_parse_reading_provider_failure_uses_message() {
        let body = json!({
            "status": "fail",
            "data": { "message": "city_not_found" },
            "message": "city_not_found"
        });

        let err = parse_reading("Atlantis", &body).unwrap_err();
        match err {
            CollectorError::Api { message } => assert_eq!(message, "city_not_found"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_reading_provider_failure_falls_back_to_payload() {
        let body = json!({
            "status": "call_limit_reached",
            "data": { "message": "call limit reached" }
        });

        let err = parse_reading("Tokyo", &body).unwrap_err();
        match err {
            CollectorError::Api { message } => {
                assert!(message.contains("call limit reached"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_reading_missing_status() {
        let err = parse_reading("Tokyo", &json!({"data": {}})).unwrap_err();
        assert!(matches!(err, CollectorError::MissingField(_)));
    }

    #[test]
    fn test_parse_reading_missing_pollution_field() {
        let mut body = success_body();
        body["data"]["current"]["pollution"]
            .as_object_mut()
            .unwrap()
            .remove("aqius");

        let err = parse_reading("New York", &body).unwrap_err();
        match err {
            CollectorError::MissingField(field) => assert!(field.contains("aqius")),
            other => panic!("expected MissingField error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_reading_accepts_integer_and_float_numbers() {
        // The provider sends whole-number temperatures without a decimal
        // point; both forms must parse.
        let mut body = success_body();
        body["data"]["current"]["weather"]["tp"] = json!(21);
        body["data"]["current"]["weather"]["pr"] = json!(1013.4);

        let reading = parse_reading("New York", &body).unwrap();
        assert_eq!(reading.temperature, 21.0);
        assert_eq!(reading.pressure, 1013.4);
    }
}
