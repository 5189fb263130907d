//! Shared request-handling state and the per-request content flows.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{FixedOffset, Utc};
use common::config::AppConfig;
use common::{Error, Restaurant, WeatherReading};
use content_client::{ContentGenerator, GeminiClient};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenario::{
    compile, pick_restaurant, EventCalendar, ScenarioDescriptor, ScenarioSelector, TimeContext,
};
use seat_client::{ReservationClient, SeatSource};
use tracing::info;
use weather_client::{Clock, OpenWeatherClient, SystemClock, WeatherCache};

/// Everything a handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<WeatherCache>,
    pub content: Arc<dyn ContentGenerator>,
    pub seats: Arc<dyn SeatSource>,
    pub selector: Arc<ScenarioSelector>,
    pub restaurants: Arc<Vec<Restaurant>>,
    pub clock: Arc<dyn Clock>,
    pub local_offset: FixedOffset,
    rng: Arc<Mutex<StdRng>>,
}

/// A compiled request ready for the text provider.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub descriptor: ScenarioDescriptor,
    pub prompt: String,
    /// Reading used for the status block, if the flow uses weather.
    pub weather: WeatherReading,
}

pub fn local_offset(hours: i32) -> Result<FixedOffset, Error> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| Error::Config(format!("invalid UTC offset: {hours}h")))
}

impl AppState {
    /// Assemble state from explicit collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        weather: Arc<WeatherCache>,
        content: Arc<dyn ContentGenerator>,
        seats: Arc<dyn SeatSource>,
        selector: ScenarioSelector,
        restaurants: Vec<Restaurant>,
        clock: Arc<dyn Clock>,
        local_offset: FixedOffset,
        rng: StdRng,
    ) -> Self {
        Self {
            weather,
            content,
            seats,
            selector: Arc::new(selector),
            restaurants: Arc::new(restaurants),
            clock,
            local_offset,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Production wiring: OpenWeatherMap, Gemini, and the reservation API.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let weather_source = Arc::new(OpenWeatherClient::new(&config.weather)?);
        let weather = Arc::new(WeatherCache::with_ttl(
            weather_source,
            clock.clone(),
            Duration::from_secs(config.weather.cache_ttl_secs),
        ));
        let calendar = EventCalendar::new(config.calendar.event_days.iter().copied());

        Ok(Self::new(
            weather,
            Arc::new(GeminiClient::new(&config.content)?),
            Arc::new(ReservationClient::new(&config.seats)?),
            ScenarioSelector::new(config.scenario.clone(), calendar),
            config.restaurants.clone(),
            clock,
            local_offset(config.display.utc_offset_hours)?,
            StdRng::from_entropy(),
        ))
    }

    /// Venue-local time context for this request.
    pub fn now(&self) -> TimeContext {
        TimeContext::from_epoch_ms(self.clock.now_ms(), self.local_offset)
            .unwrap_or_else(|| TimeContext::at(Utc::now(), self.local_offset))
    }

    fn pick(&self) -> Option<Restaurant> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        pick_restaurant(&self.restaurants, &mut *rng).cloned()
    }

    /// Main signage flow: weather → scenario → request text.
    pub async fn prepare_signage(&self) -> PreparedRequest {
        let weather = self.weather.get().await;
        let time = self.now();
        info!("Current venue time {} ({})", time.clock_label(), time.time_of_day());

        let descriptor = self.selector.select(&time, &weather, || self.pick());
        info!(scenario = descriptor.scenario.name(), "Scenario selected");
        let prompt = compile(&descriptor);
        PreparedRequest {
            descriptor,
            prompt,
            weather,
        }
    }

    /// Restaurant-recommendation flow. Weather is fetched only for the
    /// temperature shown next to the message.
    pub async fn prepare_recommendation(&self) -> Result<PreparedRequest, Error> {
        let weather = self.weather.get().await;
        let time = self.now();
        let restaurant = self
            .pick()
            .ok_or_else(|| Error::Config("restaurant table is empty".into()))?;
        info!(restaurant = %restaurant.name, facility = %restaurant.facility, "Restaurant picked");

        let descriptor = self.selector.select_recommendation(&time, &restaurant);
        let prompt = compile(&descriptor);
        Ok(PreparedRequest {
            descriptor,
            prompt,
            weather,
        })
    }
}
