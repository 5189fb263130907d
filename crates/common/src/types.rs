//! Domain types shared across the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Weather ───────────────────────────────────────────────────────────

/// Condition text shown when no live reading is available.
pub const FALLBACK_CONDITION: &str = "晴れ";
/// Temperature label shown when no live reading is available.
pub const FALLBACK_TEMPERATURE: &str = "15°";

/// One weather observation as displayed on the signage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Human-readable condition, e.g. "曇りがち".
    pub condition: String,
    /// Rounded temperature with the unit glyph, e.g. "12°".
    pub temperature_label: String,
}

impl WeatherReading {
    pub fn new(condition: impl Into<String>, temperature_label: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            temperature_label: temperature_label.into(),
        }
    }

    /// Clear sky, 15°.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_CONDITION, FALLBACK_TEMPERATURE)
    }

    /// Integer degrees parsed from the leading part of the label.
    ///
    /// Any trailing unit glyph is ignored. Returns `None` when the label
    /// does not start with a number.
    pub fn temperature_degrees(&self) -> Option<i64> {
        let label = self.temperature_label.trim();
        let (sign, rest) = match label.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, label.strip_prefix('+').unwrap_or(label)),
        };
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        digits.parse::<i64>().ok().map(|d| sign * d)
    }
}

// ── Seat reservation ──────────────────────────────────────────────────

/// One reservable time slot as returned by the reservation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeatSlot {
    pub start_at: DateTime<Utc>,
    /// Capacity of the slot. Required: a missing count is a bad payload.
    pub maximum_total_participants: i64,
    /// Seats already booked. May exceed capacity.
    pub people_count: i64,
}

/// Display-ready remaining capacity for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatAvailability {
    /// "M/D" in the service's local time zone.
    #[serde(rename = "date")]
    pub date_label: String,
    #[serde(rename = "remainingPercentage")]
    pub remaining_percentage: f64,
}

// ── Restaurants ───────────────────────────────────────────────────────

/// A nearby venue used as flavor data in generated messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    pub facility: String,
    pub cuisine: String,
}

impl Restaurant {
    pub fn new(
        name: impl Into<String>,
        facility: impl Into<String>,
        cuisine: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            facility: facility.into(),
            cuisine: cuisine.into(),
        }
    }
}
