//! Router tests with fake providers and a pinned venue clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, NaiveDate};
use common::config::{default_restaurants, ScenarioConfig};
use common::{Error, RawSeatSlot, WeatherReading};
use content_client::ContentGenerator;
use cruise_signage::state::local_offset;
use cruise_signage::{router, AppState};
use http_body_util::BodyExt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenario::selector::BOARDING_FACT;
use scenario::{EventCalendar, ScenarioSelector};
use seat_client::SeatSource;
use tower::ServiceExt;
use weather_client::{ManualClock, WeatherCache, WeatherSource};

// ── Fakes ─────────────────────────────────────────────────────────────

struct FixedWeather {
    reading: Option<WeatherReading>,
    calls: AtomicUsize,
}

#[async_trait]
impl WeatherSource for FixedWeather {
    async fn fetch_current(&self) -> Result<WeatherReading, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reading
            .clone()
            .ok_or_else(|| Error::ConfigMissing("OPENWEATHER_API_KEY is not set".into()))
    }
}

/// Echoes a canned reply and keeps every prompt it was given.
struct RecordingGenerator {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl ContentGenerator for RecordingGenerator {
    async fn generate(&self, request: &str) -> Result<String, Error> {
        self.prompts.lock().expect("prompts lock").push(request.to_string());
        self.reply
            .clone()
            .map_err(|msg| Error::upstream("Gemini", msg))
    }
}

struct FixedSeats {
    slots: Result<Vec<RawSeatSlot>, String>,
}

#[async_trait]
impl SeatSource for FixedSeats {
    async fn fetch_slots(&self) -> Result<Vec<RawSeatSlot>, Error> {
        self.slots
            .clone()
            .map_err(|msg| Error::upstream("seat reservation", msg))
    }
}

/// Serves a raw reservation body through the production decoder.
struct RawBodySeats(&'static str);

#[async_trait]
impl SeatSource for RawBodySeats {
    async fn fetch_slots(&self) -> Result<Vec<RawSeatSlot>, Error> {
        seat_client::parse_slots(self.0)
    }
}

// ── Harness ───────────────────────────────────────────────────────────

struct Harness {
    app: Router,
    generator: Arc<RecordingGenerator>,
    weather: Arc<FixedWeather>,
}

fn epoch_ms(rfc3339: &str) -> i64 {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid timestamp")
        .timestamp_millis()
}

fn slot(start: &str, maximum: i64, people: i64) -> RawSeatSlot {
    RawSeatSlot {
        start_at: DateTime::parse_from_rfc3339(start)
            .expect("valid timestamp")
            .to_utc(),
        maximum_total_participants: maximum,
        people_count: people,
    }
}

fn harness(
    now: &str,
    reading: Option<WeatherReading>,
    reply: Result<&str, &str>,
    slots: Result<Vec<RawSeatSlot>, &str>,
) -> Harness {
    let clock = Arc::new(ManualClock::new(epoch_ms(now)));
    let weather = Arc::new(FixedWeather {
        reading,
        calls: AtomicUsize::new(0),
    });
    let generator = Arc::new(RecordingGenerator {
        reply: reply.map(str::to_string).map_err(str::to_string),
        prompts: Mutex::new(Vec::new()),
    });
    let seats = Arc::new(FixedSeats {
        slots: slots.map_err(str::to_string),
    });
    let calendar = EventCalendar::new([NaiveDate::from_ymd_opt(2025, 12, 6).expect("valid date")]);

    let state = AppState::new(
        Arc::new(WeatherCache::new(weather.clone(), clock.clone())),
        generator.clone(),
        seats,
        ScenarioSelector::new(ScenarioConfig::default(), calendar),
        default_restaurants(),
        clock,
        local_offset(9).expect("valid offset"),
        StdRng::seed_from_u64(42),
    );

    Harness {
        app: router(state, None),
        generator,
        weather,
    }
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).expect("body is JSON");
    (status, json)
}

fn assert_close(value: &serde_json::Value, expected: f64) {
    let actual = value.as_f64().expect("numeric percentage");
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

// 18:25 in Tokyo on the event day.
const BOARDING_TIME: &str = "2025-12-06T09:25:00Z";

// ── Tests ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_message_returns_trimmed_text_and_temperature() {
    let h = harness(
        BOARDING_TIME,
        Some(WeatherReading::new("曇り", "12°")),
        Ok("  18:30出航です。\n"),
        Ok(vec![]),
    );

    let (status, json) = get_json(h.app, "/api/generate-message").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "18:30出航です。");
    assert_eq!(json["temperature"], "12°");

    let prompts = h.generator.prompts.lock().expect("prompts lock");
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("18:30"));
    assert!(prompts[0].contains(BOARDING_FACT));
    assert!(prompts[0].contains("dressing warmly"));
}

#[tokio::test]
async fn test_generate_message_uses_fallback_weather_without_credential() {
    let h = harness(BOARDING_TIME, None, Ok("ok"), Ok(vec![]));

    let (status, json) = get_json(h.app, "/api/generate-message").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["temperature"], "15°");
    assert_eq!(h.weather.calls.load(Ordering::SeqCst), 1);
    let prompts = h.generator.prompts.lock().expect("prompts lock");
    assert!(!prompts[0].contains("dressing warmly"));
}

#[tokio::test]
async fn test_weather_is_cached_across_requests() {
    let h = harness(
        BOARDING_TIME,
        Some(WeatherReading::new("晴れ", "18°")),
        Ok("ok"),
        Ok(vec![]),
    );

    for _ in 0..3 {
        let (status, _) = get_json(h.app.clone(), "/api/generate-message").await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(h.weather.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_generate_message_failure_is_500_with_detail() {
    let h = harness(
        BOARDING_TIME,
        Some(WeatherReading::new("晴れ", "18°")),
        Err("HTTP status 503"),
        Ok(vec![]),
    );

    let (status, json) = get_json(h.app, "/api/generate-message").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Failed to generate message.");
    assert!(json["error"].as_str().expect("error string").contains("503"));
}

#[tokio::test]
async fn test_non_event_day_prompt_mentions_portal() {
    // 2025-12-07 12:00 in Tokyo.
    let h = harness(
        "2025-12-07T03:00:00Z",
        Some(WeatherReading::new("晴れ", "18°")),
        Ok("ok"),
        Ok(vec![]),
    );

    let (status, _) = get_json(h.app, "/api/generate-message").await;

    assert_eq!(status, StatusCode::OK);
    let prompts = h.generator.prompts.lock().expect("prompts lock");
    assert!(prompts[0].contains(&ScenarioConfig::default().portal_domain));
    assert!(prompts[0].contains("- Cruise operating today: no"));
}

#[tokio::test]
async fn test_recommendation_names_a_listed_restaurant() {
    let h = harness(
        "2025-12-06T11:00:00Z",
        Some(WeatherReading::new("晴れ", "18°")),
        Ok("おすすめです。"),
        Ok(vec![]),
    );

    let (status, json) = get_json(h.app, "/api/generate-recommendation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "おすすめです。");
    assert_eq!(json["temperature"], "18°");

    let prompts = h.generator.prompts.lock().expect("prompts lock");
    let table = default_restaurants();
    assert!(table.iter().any(|r| prompts[0].contains(&r.name)));
    // 20:00 local: post-cruise framing, no weather facts.
    assert!(prompts[0].contains("思い出"));
    assert!(!prompts[0].contains("- Weather:"));
}

#[tokio::test]
async fn test_seat_status_maps_slots_in_order() {
    let h = harness(
        BOARDING_TIME,
        None,
        Ok("ok"),
        Ok(vec![
            slot("2025-12-06T09:30:00Z", 100, 40),
            slot("2025-12-13T09:30:00Z", 0, 0),
            slot("2025-12-20T09:30:00Z", 50, 60),
        ]),
    );

    let (status, json) = get_json(h.app, "/api/seat-status").await;

    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().expect("array body");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["date"], "12/6");
    assert_close(&rows[0]["remainingPercentage"], 60.0);
    assert_eq!(rows[1]["date"], "12/13");
    assert_close(&rows[1]["remainingPercentage"], 0.0);
    assert_close(&rows[2]["remainingPercentage"], -20.0);
}

#[tokio::test]
async fn test_seat_status_failure_is_500_not_partial() {
    let h = harness(BOARDING_TIME, None, Ok("ok"), Err("connection refused"));

    let (status, json) = get_json(h.app, "/api/seat-status").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json.is_object());
    assert_eq!(json["message"], "Failed to fetch seat status.");
    assert!(json["error"]
        .as_str()
        .expect("error string")
        .contains("connection refused"));
}

#[tokio::test]
async fn test_seat_status_incomplete_slot_is_500_not_full_availability() {
    let clock = Arc::new(ManualClock::new(epoch_ms(BOARDING_TIME)));
    let weather = Arc::new(FixedWeather {
        reading: None,
        calls: AtomicUsize::new(0),
    });
    let generator = Arc::new(RecordingGenerator {
        reply: Ok("ok".into()),
        prompts: Mutex::new(Vec::new()),
    });
    let seats = Arc::new(RawBodySeats(
        r#"[
            {"startAt": "2025-12-06T09:30:00Z", "maximumTotalParticipants": 100, "peopleCount": 40},
            {"startAt": "2025-12-13T09:30:00Z", "maximumTotalParticipants": 100}
        ]"#,
    ));
    let state = AppState::new(
        Arc::new(WeatherCache::new(weather, clock.clone())),
        generator,
        seats,
        ScenarioSelector::new(ScenarioConfig::default(), EventCalendar::default()),
        default_restaurants(),
        clock,
        local_offset(9).expect("valid offset"),
        StdRng::seed_from_u64(7),
    );

    let (status, json) = get_json(router(state, None), "/api/seat-status").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Failed to fetch seat status.");
    assert!(json["error"]
        .as_str()
        .expect("error string")
        .contains("peopleCount"));
}

#[tokio::test]
async fn test_health_reports_ok() {
    let h = harness(BOARDING_TIME, None, Ok("ok"), Ok(vec![]));
    let (status, json) = get_json(h.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}
