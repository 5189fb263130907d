//! Venue-local time context.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike, Utc};

/// Hour/minute/date on the venue clock. Derived per request, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeContext {
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
}

/// Coarse label used in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Midday,
    Evening,
    LateNight,
}

/// Position of the moment relative to tonight's 18:30 departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartureWindow {
    /// Before 17:30.
    BeforeBoarding,
    /// 17:30 up to (not including) 18:30.
    Boarding,
    /// 18:30 onwards.
    AfterDeparture,
}

const BOARDING_OPENS: u32 = 17 * 60 + 30;
const DEPARTURE: u32 = 18 * 60 + 30;

impl TimeContext {
    pub fn new(date: NaiveDate, hour: u32, minute: u32) -> Self {
        Self { date, hour, minute }
    }

    pub fn at(now: DateTime<Utc>, local: FixedOffset) -> Self {
        let local_now = now.with_timezone(&local);
        Self {
            date: local_now.date_naive(),
            hour: local_now.hour(),
            minute: local_now.minute(),
        }
    }

    /// `None` if the timestamp is outside chrono's range.
    pub fn from_epoch_ms(epoch_ms: i64, local: FixedOffset) -> Option<Self> {
        DateTime::from_timestamp_millis(epoch_ms).map(|now| Self::at(now, local))
    }

    pub fn minutes_of_day(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.hour)
    }

    /// The minute-30 boundaries belong to the later window.
    pub fn departure_window(&self) -> DepartureWindow {
        match self.minutes_of_day() {
            m if m < BOARDING_OPENS => DepartureWindow::BeforeBoarding,
            m if m < DEPARTURE => DepartureWindow::Boarding,
            _ => DepartureWindow::AfterDeparture,
        }
    }

    /// "HH:MM".
    pub fn clock_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Midday,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::LateNight,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Midday => "midday",
            TimeOfDay::Evening => "evening",
            TimeOfDay::LateNight => "late night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
