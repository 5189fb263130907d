//! Service configuration types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Restaurant;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    /// Generative-text provider settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Seat-reservation provider settings.
    #[serde(default)]
    pub seats: SeatsConfig,

    /// Days the cruise operates.
    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    /// Literal strings the generated messages are required to contain.
    #[serde(default)]
    pub scenario: ScenarioConfig,

    /// Rotation table for venue recommendations.
    #[serde(default = "default_restaurants")]
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the signage front end.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key. Empty means "always use the fallback reading".
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_lat")]
    pub lat: f64,
    #[serde(default = "default_lon")]
    pub lon: f64,
    #[serde(default = "default_weather_lang")]
    pub lang: String,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Gemini API key. Checked per request, not at startup.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_content_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatsConfig {
    #[serde(default = "default_seats_base_url")]
    pub base_url: String,
    /// Reservable item queried for time slots.
    #[serde(default = "default_seats_item_id")]
    pub item_id: String,
    #[serde(default = "default_seats_from")]
    pub from: String,
    #[serde(default = "default_seats_to")]
    pub to: String,
    #[serde(default = "default_seats_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_event_days")]
    pub event_days: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Fixed offset of the venue's local time (Asia/Tokyo has no DST).
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Booking portal domain, e.g. printed on sold-out redirects.
    #[serde(default = "default_portal_domain")]
    pub portal_domain: String,
    /// Alternate weekend cruise sold-out guests are redirected to.
    #[serde(default = "default_alternate_cruise")]
    pub alternate_cruise: String,
    /// Building with indoor dining near the pier.
    #[serde(default = "default_building")]
    pub building: String,
    #[serde(default = "default_food_court")]
    pub food_court: String,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}
fn default_static_dir() -> String {
    "public".into()
}

fn default_lat() -> f64 {
    35.6586
}
fn default_lon() -> f64 {
    139.7675
}
fn default_weather_lang() -> String {
    "ja".into()
}
fn default_cache_ttl() -> u64 {
    3600
}
fn default_weather_timeout() -> u64 {
    10
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_content_timeout() -> u64 {
    30
}

fn default_seats_base_url() -> String {
    "https://api-reservation-dot-horai-scheme-verge-v2.an.r.appspot.com".into()
}
fn default_seats_item_id() -> String {
    "bd74f554-b2bf-492e-bbe2-548951110778".into()
}
fn default_seats_from() -> String {
    "2025-12-05T16:37:57-09:00".into()
}
fn default_seats_to() -> String {
    "2026-06-03T16:37:57-09:00".into()
}
fn default_seats_timeout() -> u64 {
    15
}

fn default_event_days() -> Vec<NaiveDate> {
    NaiveDate::from_ymd_opt(2025, 12, 6).into_iter().collect()
}

fn default_utc_offset_hours() -> i32 {
    9
}

fn default_portal_domain() -> String {
    "takeshiba-cruise.jp".into()
}
fn default_alternate_cruise() -> String {
    "週末花火クルーズ".into()
}
fn default_building() -> String {
    "東京ポートシティ竹芝".into()
}
fn default_food_court() -> String {
    "竹芝ダイニング".into()
}

pub fn default_restaurants() -> Vec<Restaurant> {
    const ATRE: &str = "アトレ竹芝";
    const PORT_CITY: &str = "東京ポートシティ竹芝";
    [
        ("BANK30", ATRE, "バー・ダイニング"),
        ("SHAKOBA", ATRE, "コミュニティスペース"),
        ("Bluefin by UORIKI", ATRE, "和食・寿司"),
        ("劇団四季SHOP&DINING 四季食堂", ATRE, "カフェ・ダイニング"),
        ("PAPPAGALLO", ATRE, "イタリアン"),
        ("CIELITO LINDO BAR AND GRILL", PORT_CITY, "メキシカン"),
        ("餃子酒場 龍記", PORT_CITY, "中華・餃子"),
        ("鍛冶屋文蔵", PORT_CITY, "居酒屋・和食"),
        ("沖縄酒場かふー", PORT_CITY, "沖縄料理"),
        ("串カツ田中", PORT_CITY, "串カツ・居酒屋"),
        ("ど・みそ", PORT_CITY, "ラーメン"),
        ("うみまち酒場 さかなさま", PORT_CITY, "海鮮居酒屋"),
        ("GOOD LUCK CURRY", PORT_CITY, "カレー"),
        ("イタリア酒場 HIKAGE", PORT_CITY, "イタリアン"),
        ("シュマッツ・ビア・ダイニング", PORT_CITY, "ドイツ料理"),
        ("サイアムセラドン", PORT_CITY, "タイ料理"),
        ("梅蘭", PORT_CITY, "中華料理"),
        ("博多天ぷらたかお", PORT_CITY, "天ぷら・和食"),
    ]
    .into_iter()
    .map(|(name, facility, cuisine)| Restaurant::new(name, facility, cuisine))
    .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            lat: default_lat(),
            lon: default_lon(),
            lang: default_weather_lang(),
            cache_ttl_secs: default_cache_ttl(),
            timeout_secs: default_weather_timeout(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            timeout_secs: default_content_timeout(),
        }
    }
}

impl Default for SeatsConfig {
    fn default() -> Self {
        Self {
            base_url: default_seats_base_url(),
            item_id: default_seats_item_id(),
            from: default_seats_from(),
            to: default_seats_to(),
            timeout_secs: default_seats_timeout(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            event_days: default_event_days(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            portal_domain: default_portal_domain(),
            alternate_cruise: default_alternate_cruise(),
            building: default_building(),
            food_court: default_food_court(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            weather: WeatherConfig::default(),
            content: ContentConfig::default(),
            seats: SeatsConfig::default(),
            calendar: CalendarConfig::default(),
            display: DisplayConfig::default(),
            scenario: ScenarioConfig::default(),
            restaurants: default_restaurants(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let parsed: AppConfig = serde_json::from_str(
            r#"{"server": {"port": 8080}, "calendar": {"event_days": ["2025-12-06", "2025-12-13"]}}"#,
        )
        .expect("config should deserialize");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.server.host, "0.0.0.0");
        assert_eq!(parsed.calendar.event_days.len(), 2);
        assert_eq!(parsed.weather.cache_ttl_secs, 3600);
        assert_eq!(parsed.restaurants.len(), 18);
    }

    #[test]
    fn test_missing_calendar_section_uses_default_days() {
        let parsed: AppConfig = serde_json::from_str("{}").expect("config should deserialize");
        assert_eq!(
            parsed.calendar.event_days,
            vec![NaiveDate::from_ymd_opt(2025, 12, 6).expect("valid date")]
        );
        assert_eq!(parsed.display.utc_offset_hours, 9);
    }
}
