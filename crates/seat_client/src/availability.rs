//! Raw reservation slots → display percentages.

use chrono::{Datelike, FixedOffset};
use common::{RawSeatSlot, SeatAvailability};

/// Percentage of seats still open.
///
/// Zero capacity yields 0. Over-booked slots (people > maximum) are passed
/// through as negative values rather than clamped.
pub fn remaining_percentage(maximum: i64, current: i64) -> f64 {
    if maximum <= 0 {
        return 0.0;
    }
    let remaining = maximum - current;
    remaining as f64 / maximum as f64 * 100.0
}

/// Order-preserving, one output per input.
pub fn transform(slots: &[RawSeatSlot], local: FixedOffset) -> Vec<SeatAvailability> {
    slots
        .iter()
        .map(|slot| {
            let start = slot.start_at.with_timezone(&local);
            SeatAvailability {
                date_label: format!("{}/{}", start.month(), start.day()),
                remaining_percentage: remaining_percentage(
                    slot.maximum_total_participants,
                    slot.people_count,
                ),
            }
        })
        .collect()
}
