//! Seat-reservation provider client.
//!
//! Fetches time-slot counts for the cruise's reservable item. The pure
//! mapping to display percentages lives in [`availability`].

pub mod availability;

use async_trait::async_trait;
use common::config::SeatsConfig;
use common::error::{truncate_body, ERROR_BODY_LIMIT};
use common::{Error, RawSeatSlot, Result};
use tracing::debug;

pub use availability::{remaining_percentage, transform};

const SERVICE: &str = "seat reservation";

/// Anything that can list raw reservation slots.
#[async_trait]
pub trait SeatSource: Send + Sync {
    async fn fetch_slots(&self) -> Result<Vec<RawSeatSlot>>;
}

/// Decode a slot list. Any malformed slot rejects the whole list.
pub fn parse_slots(body: &str) -> Result<Vec<RawSeatSlot>> {
    Ok(serde_json::from_str(body)?)
}

/// REST client for the reservation provider.
#[derive(Debug, Clone)]
pub struct ReservationClient {
    client: reqwest::Client,
    base_url: String,
    item_id: String,
    from: String,
    to: String,
}

impl ReservationClient {
    pub fn new(config: &SeatsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build reservation HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            item_id: config.item_id.clone(),
            from: config.from.clone(),
            to: config.to.clone(),
        })
    }

    /// URL helper.
    fn slots_url(&self) -> String {
        format!(
            "{}/reservableItems/{}/timeSlots/timeSlotsCountWithDate",
            self.base_url, self.item_id
        )
    }
}

#[async_trait]
impl SeatSource for ReservationClient {
    async fn fetch_slots(&self) -> Result<Vec<RawSeatSlot>> {
        let url = self.slots_url();
        debug!("Fetching seat slots: {} from={} to={}", url, self.from, self.to);

        let resp = self
            .client
            .get(&url)
            .query(&[("from", self.from.as_str()), ("to", self.to.as_str())])
            .send()
            .await
            .map_err(|e| Error::upstream(SERVICE, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::upstream(
                SERVICE,
                format!(
                    "returned {}: {}",
                    status.as_u16(),
                    truncate_body(&body, ERROR_BODY_LIMIT)
                ),
            ));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::upstream(SERVICE, format!("failed to read body: {e}")))?;
        let slots = parse_slots(&body)?;

        debug!("Got {} seat slots", slots.len());
        Ok(slots)
    }
}
