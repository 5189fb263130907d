//! OpenWeatherMap client and the time-bounded weather cache.
//!
//! Fetches current conditions for the pier and converts them to the
//! shared `WeatherReading` format.

pub mod cache;

use async_trait::async_trait;
use common::config::WeatherConfig;
use common::error::{truncate_body, ERROR_BODY_LIMIT};
use common::{Error, Result, WeatherReading};
use serde::Deserialize;
use tracing::debug;

pub use cache::{Clock, ManualClock, SystemClock, WeatherCache, WeatherCacheEntry};

const CURRENT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const SERVICE: &str = "OpenWeatherMap";

/// Anything that can produce one live weather reading.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_current(&self) -> Result<WeatherReading>;
}

/// OpenWeatherMap current-weather client (free plan endpoint).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    lat: f64,
    lon: f64,
    lang: String,
}

/// Response from `/data/2.5/weather`.
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub main: MainReadings,
}

#[derive(Debug, Deserialize)]
pub struct WeatherCondition {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cruise-signage/0.1")
            .pool_max_idle_per_host(2)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build weather HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.trim().to_string(),
            lat: config.lat,
            lon: config.lon,
            lang: config.lang.clone(),
        })
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_current(&self) -> Result<WeatherReading> {
        if !self.has_credential() {
            return Err(Error::ConfigMissing("OPENWEATHER_API_KEY is not set".into()));
        }

        let (lat, lon) = (self.lat, self.lon);
        debug!("Fetching current weather: {} lat={} lon={}", CURRENT_WEATHER_URL, lat, lon);

        let resp = self
            .client
            .get(CURRENT_WEATHER_URL)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
                ("lang", self.lang.clone()),
            ])
            .send()
            .await
            .map_err(|e| Error::upstream(SERVICE, format!("HTTP error for ({lat},{lon}): {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::upstream(
                SERVICE,
                format!(
                    "returned {} for ({lat},{lon}): {}",
                    status.as_u16(),
                    truncate_body(&body, ERROR_BODY_LIMIT)
                ),
            ));
        }

        let payload: CurrentWeatherResponse = resp.json().await.map_err(|e| {
            Error::upstream(SERVICE, format!("JSON parse error for ({lat},{lon}): {e}"))
        })?;

        to_reading(&payload)
    }
}

/// First condition description plus the rounded temperature.
fn to_reading(payload: &CurrentWeatherResponse) -> Result<WeatherReading> {
    let condition = payload
        .weather
        .first()
        .map(|w| w.description.trim())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| Error::DataShape("weather[] has no description".into()))?;

    Ok(WeatherReading::new(
        condition,
        format!("{}°", payload.main.temp.round() as i64),
    ))
}
