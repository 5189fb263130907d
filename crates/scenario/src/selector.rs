//! Scenario selection.
//!
//! Each operating mode is one [`Scenario`] variant. [`Scenario::classify`]
//! encodes the precedence as a single ordered match over (event day,
//! departure window); [`ScenarioSelector`] then expands the variant into
//! narrative beats and hard constraints.

use common::config::ScenarioConfig;
use common::{Restaurant, WeatherReading};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::calendar::EventCalendar;
use crate::time::{DepartureWindow, TimeContext};

/// Readings below this many degrees get a dress-warmly mention.
pub const COLD_THRESHOLD_DEGREES: i64 = 15;
/// Recommendations after this hour are framed as post-cruise reminiscence.
pub const EVENING_RECOMMENDATION_HOUR: u32 = 19;

/// Departure fact the boarding message must contain.
pub const DEPARTURE_FACT: &str = "18:30出航";
/// Boarding fact the boarding message must contain.
pub const BOARDING_FACT: &str = "出航10分前の18:20までにご乗船";

/// One mutually exclusive operating mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scenario {
    /// Not an event day: the week is sold out.
    SoldOutWeek,
    /// Event day before 17:30: tonight is sold out.
    SoldOutToday,
    /// Event day 17:30 to 18:29: call passengers to board.
    Boarding {
        cold: bool,
        venue: Option<Restaurant>,
    },
    /// Event day from 18:30: the ship has left, send people indoors.
    IndoorDining { cold: bool },
    /// Secondary flow: a venue pick, independent of weather and calendar.
    RestaurantRecommendation {
        restaurant: Restaurant,
        after_cruise: bool,
    },
}

impl Scenario {
    /// Ordered classification; the first matching arm wins.
    ///
    /// `pick` is only called for the boarding window.
    pub fn classify<F>(
        time: &TimeContext,
        weather: &WeatherReading,
        calendar: &EventCalendar,
        pick: F,
    ) -> Scenario
    where
        F: FnOnce() -> Option<Restaurant>,
    {
        let event_day = calendar.is_event_day(time.date);
        match (event_day, time.departure_window()) {
            (false, _) => Scenario::SoldOutWeek,
            (true, DepartureWindow::BeforeBoarding) => Scenario::SoldOutToday,
            (true, DepartureWindow::Boarding) => Scenario::Boarding {
                cold: is_cold(weather),
                venue: pick(),
            },
            (true, DepartureWindow::AfterDeparture) => Scenario::IndoorDining {
                cold: is_cold(weather),
            },
        }
    }

    pub fn recommendation(time: &TimeContext, restaurant: Restaurant) -> Scenario {
        Scenario::RestaurantRecommendation {
            restaurant,
            after_cruise: time.hour >= EVENING_RECOMMENDATION_HOUR,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::SoldOutWeek => "sold_out_week",
            Scenario::SoldOutToday => "sold_out_today",
            Scenario::Boarding { .. } => "boarding",
            Scenario::IndoorDining { .. } => "indoor_dining",
            Scenario::RestaurantRecommendation { .. } => "restaurant_recommendation",
        }
    }
}

/// Unparsable labels are treated as "not cold".
pub fn is_cold(weather: &WeatherReading) -> bool {
    weather
        .temperature_degrees()
        .is_some_and(|t| t < COLD_THRESHOLD_DEGREES)
}

/// Uniform pick from the rotation table.
pub fn pick_restaurant<'a, R>(table: &'a [Restaurant], rng: &mut R) -> Option<&'a Restaurant>
where
    R: Rng + ?Sized,
{
    table.choose(rng)
}

/// Everything the request compiler needs for one message.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDescriptor {
    pub scenario: Scenario,
    pub time: TimeContext,
    /// Absent for the restaurant flow, which must not talk about weather.
    pub weather: Option<WeatherReading>,
    pub event_day: Option<bool>,
    pub narrative_beats: Vec<String>,
    pub hard_constraints: Vec<String>,
    pub min_lines: u8,
    pub max_lines: u8,
    pub max_chars: u16,
}

/// Expands scenarios into narrative beats and hard constraints.
#[derive(Debug, Clone)]
pub struct ScenarioSelector {
    settings: ScenarioConfig,
    calendar: EventCalendar,
}

impl ScenarioSelector {
    pub fn new(settings: ScenarioConfig, calendar: EventCalendar) -> Self {
        Self { settings, calendar }
    }

    pub fn calendar(&self) -> &EventCalendar {
        &self.calendar
    }

    /// Main signage flow.
    pub fn select<F>(
        &self,
        time: &TimeContext,
        weather: &WeatherReading,
        pick: F,
    ) -> ScenarioDescriptor
    where
        F: FnOnce() -> Option<Restaurant>,
    {
        let scenario = Scenario::classify(time, weather, &self.calendar, pick);
        debug!(scenario = scenario.name(), time = %time.clock_label(), "Scenario selected");

        self.describe(
            scenario,
            time,
            Some(weather),
            Some(self.calendar.is_event_day(time.date)),
        )
    }

    /// Secondary flow: recommend one venue. Weather and calendar are ignored.
    pub fn select_recommendation(
        &self,
        time: &TimeContext,
        restaurant: &Restaurant,
    ) -> ScenarioDescriptor {
        let scenario = Scenario::recommendation(time, restaurant.clone());
        debug!(scenario = scenario.name(), restaurant = %restaurant.name, "Scenario selected");

        self.describe(scenario, time, None, None)
    }

    fn describe(
        &self,
        scenario: Scenario,
        time: &TimeContext,
        weather: Option<&WeatherReading>,
        event_day: Option<bool>,
    ) -> ScenarioDescriptor {
        let s = &self.settings;
        let mut beats = Vec::new();
        let mut constraints = Vec::new();
        let (min_lines, max_lines, max_chars) = match &scenario {
            Scenario::RestaurantRecommendation { .. } => (1, 2, 70),
            _ => (2, 3, 80),
        };

        match &scenario {
            Scenario::SoldOutWeek | Scenario::SoldOutToday => {
                beats.push(if scenario == Scenario::SoldOutWeek {
                    "This week's cruises are fully booked. Thank passengers for their interest."
                        .to_string()
                } else {
                    "Today's cruise is already fully booked. Thank passengers for their interest."
                        .to_string()
                });
                beats.push(format!(
                    "Invite them to the {} on the weekend instead.",
                    s.alternate_cruise
                ));
                beats.push(format!(
                    "Point them to the booking portal at {} to reserve.",
                    s.portal_domain
                ));
                constraints.push(format!(
                    "The message must contain the literal string \"{}\".",
                    s.portal_domain
                ));
            }
            Scenario::Boarding { cold, venue } => {
                beats.push(
                    "Tonight's cruise leaves at 18:30. Ask passengers to board by 18:20.".to_string(),
                );
                if let (true, Some(w)) = (*cold, weather) {
                    beats.push(cold_beat(w));
                }
                beats.push(match venue {
                    Some(r) => format!(
                        "After the cruise, recommend the {} restaurant \"{}\" in {}.",
                        r.cuisine, r.name, r.facility
                    ),
                    None => "After the cruise, suggest a meal at one of the restaurants by the pier."
                        .to_string(),
                });
                constraints.push(format!(
                    "The message must contain both literal phrases \"{DEPARTURE_FACT}\" and \"{BOARDING_FACT}\"."
                ));
            }
            Scenario::IndoorDining { cold } => {
                beats.push(
                    "Tonight's cruise has already departed. Invite passers-by to dine indoors nearby."
                        .to_string(),
                );
                beats.push(format!(
                    "Recommend {} in {}, where seats are still available.",
                    s.food_court, s.building
                ));
                if let (true, Some(w)) = (*cold, weather) {
                    beats.push(cold_beat(w));
                }
                constraints.push(format!(
                    "The message must name both \"{}\" and \"{}\" verbatim.",
                    s.building, s.food_court
                ));
            }
            Scenario::RestaurantRecommendation {
                restaurant: r,
                after_cruise,
            } => {
                let closing = if *after_cruise {
                    beats.push(
                        "Recommend a restaurant for a special time after the cruise.".to_string(),
                    );
                    beats.push(
                        "Frame it as a place to talk over the cruise's memories with a good meal."
                            .to_string(),
                    );
                    "素敵な思い出を語り合ってみてはいかがでしょうか"
                } else {
                    beats.push(
                        "Recommend a restaurant worth visiting before or after the cruise."
                            .to_string(),
                    );
                    "素敵な余韻に浸ってみてはいかがでしょうか"
                };
                beats.push(format!(
                    "Recommended venue: name \"{}\", facility \"{}\", cuisine \"{}\".",
                    r.name, r.facility, r.cuisine
                ));
                beats.push(format!(
                    "Model sentence: 「クルーズの後は、{}の{}『{}』で、{}。」",
                    r.facility, r.cuisine, r.name, closing
                ));
                beats.push("Follow the model sentence and work the cuisine in naturally.".to_string());
                constraints.push(format!(
                    "Most important: the message must contain the venue name \"{}\" and the facility name \"{}\" verbatim. Never abbreviate them.",
                    r.name, r.facility
                ));
                constraints.push(
                    "Never mention night views, scenery, the weather, or the time of day.".to_string(),
                );
            }
        }

        ScenarioDescriptor {
            scenario,
            time: *time,
            weather: weather.cloned(),
            event_day,
            narrative_beats: beats,
            hard_constraints: constraints,
            min_lines,
            max_lines,
            max_chars,
        }
    }
}

fn cold_beat(weather: &WeatherReading) -> String {
    format!(
        "It is cold tonight ({}). Suggest dressing warmly.",
        weather.temperature_label
    )
}
