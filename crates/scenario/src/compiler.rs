//! Scenario descriptor → content-generation request text.
//!
//! Fixed block order: persona preamble, current status, scenario beats,
//! constraints, closing directive. The generated output is not validated
//! here.

use crate::selector::{Scenario, ScenarioDescriptor};

const PERSONA: &str =
    "You are the content creator for the digital signage aboard a Tokyo Bay sightseeing cruise.";

/// Style rules shared by every scenario.
const STYLE_RULES: [&str; 4] = [
    "Write in Japanese, using polite desu/masu form. Never use casual speech or another language.",
    "Keep a friendly, positive tone.",
    "Do not use exclamation marks (!) or emoji.",
    "Output only the message itself, with no quotes or commentary.",
];

const CLOSING: &str = "Now, taking all of the above into account, write the message:";

pub fn compile(descriptor: &ScenarioDescriptor) -> String {
    let task = match descriptor.scenario {
        Scenario::RestaurantRecommendation { .. } => {
            "To enrich the passengers' cruise experience, write one message recommending an attractive restaurant nearby."
        }
        _ => "Write exactly one short, appealing message for cruise passengers that fits the situation below.",
    };
    let mut lines: Vec<String> = vec![PERSONA.to_string(), task.to_string()];

    let time = &descriptor.time;
    lines.push(String::new());
    lines.push("# Current status".to_string());
    lines.push(format!(
        "- Time: {} ({})",
        time.clock_label(),
        time.time_of_day()
    ));
    if let Some(weather) = &descriptor.weather {
        lines.push(format!("- Weather: {}", weather.condition));
        lines.push(format!("- Temperature: {}", weather.temperature_label));
    }
    if let Some(event_day) = descriptor.event_day {
        lines.push(format!(
            "- Cruise operating today: {}",
            if event_day { "yes" } else { "no" }
        ));
    }

    lines.push(String::new());
    lines.push("# Scenario".to_string());
    lines.extend(descriptor.narrative_beats.iter().map(|b| format!("- {b}")));

    lines.push(String::new());
    lines.push("# Constraints".to_string());
    lines.push(format!("- {}", length_rule(descriptor)));
    lines.extend(STYLE_RULES.iter().map(|r| format!("- {r}")));
    lines.extend(descriptor.hard_constraints.iter().map(|c| format!("- {c}")));

    lines.push(String::new());
    lines.push(CLOSING.to_string());
    lines.join("\n")
}

fn length_rule(d: &ScenarioDescriptor) -> String {
    if d.min_lines <= 1 {
        format!(
            "At most {} lines and about {} characters.",
            d.max_lines, d.max_chars
        )
    } else {
        format!(
            "{} to {} lines, at most {} characters in total.",
            d.min_lines, d.max_lines, d.max_chars
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EventCalendar;
    use crate::selector::{ScenarioSelector, BOARDING_FACT};
    use crate::time::TimeContext;
    use chrono::NaiveDate;
    use common::config::ScenarioConfig;
    use common::{Restaurant, WeatherReading};

    fn event_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 6).expect("valid date")
    }

    fn selector() -> ScenarioSelector {
        ScenarioSelector::new(ScenarioConfig::default(), EventCalendar::new([event_day()]))
    }

    #[test]
    fn test_boarding_request_end_to_end() {
        let time = TimeContext::new(event_day(), 18, 25);
        let weather = WeatherReading::new("曇り", "12°");
        let descriptor = selector().select(&time, &weather, || None);
        assert!(matches!(
            descriptor.scenario,
            Scenario::Boarding { cold: true, .. }
        ));

        let request = compile(&descriptor);
        assert!(request.contains("18:30"));
        assert!(request.contains(BOARDING_FACT));
        assert!(request.contains("dressing warmly"));
        assert!(request.contains("- Time: 18:25 (evening)"));
        assert!(request.contains("- Temperature: 12°"));
        assert!(request.contains("- Cruise operating today: yes"));
    }

    #[test]
    fn test_blocks_in_fixed_order() {
        let time = TimeContext::new(event_day(), 9, 0);
        let descriptor = selector().select(&time, &WeatherReading::fallback(), || None);
        let request = compile(&descriptor);

        let persona = request.find(PERSONA).expect("persona");
        let status = request.find("# Current status").expect("status");
        let scenario = request.find("# Scenario").expect("scenario");
        let constraints = request.find("# Constraints").expect("constraints");
        let closing = request.find(CLOSING).expect("closing");
        assert!(persona < status && status < scenario && scenario < constraints && constraints < closing);
        assert!(request.ends_with(CLOSING));
        assert!(request.contains("2 to 3 lines, at most 80 characters"));
        assert!(request.contains(&ScenarioConfig::default().portal_domain));
    }

    #[test]
    fn test_recommendation_request_omits_weather_and_event_flag() {
        let time = TimeContext::new(event_day(), 20, 0);
        let restaurant = Restaurant::new("BANK30", "アトレ竹芝", "バー・ダイニング");
        let descriptor = selector().select_recommendation(&time, &restaurant);
        let request = compile(&descriptor);

        assert!(!request.contains("- Weather:"));
        assert!(!request.contains("- Temperature:"));
        assert!(!request.contains("Cruise operating today"));
        assert!(request.contains("recommending an attractive restaurant"));
        assert!(request.contains("BANK30"));
        assert!(request.contains("アトレ竹芝"));
        assert!(request.contains("At most 2 lines and about 70 characters."));
    }
}
