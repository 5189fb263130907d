//! Configuration loader: merges env vars, .env file, and config.toml.

use std::path::Path;

use chrono::NaiveDate;
use common::config::AppConfig;
use common::{Error, Result};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(Error::Config(format!("{env_name} must be an integer > 0"))),
    }
}

fn parse_event_days(raw: &str) -> Result<Vec<NaiveDate>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| Error::Config(format!("EVENT_DAYS entry {s:?} is not YYYY-MM-DD")))
        })
        .collect()
}

pub fn validate_config(config: &AppConfig) -> Result<()> {
    let mut issues: Vec<String> = Vec::new();

    if config.server.port == 0 {
        issues.push("server.port must be > 0".into());
    }
    if config.weather.cache_ttl_secs == 0 {
        issues.push("weather.cache_ttl_secs must be > 0".into());
    }
    if !(-90.0..=90.0).contains(&config.weather.lat) {
        issues.push("weather.lat must be in [-90,90]".into());
    }
    if !(-180.0..=180.0).contains(&config.weather.lon) {
        issues.push("weather.lon must be in [-180,180]".into());
    }
    if config.weather.timeout_secs == 0 {
        issues.push("weather.timeout_secs must be > 0".into());
    }
    if config.content.model.trim().is_empty() {
        issues.push("content.model must not be empty".into());
    }
    if config.content.timeout_secs == 0 {
        issues.push("content.timeout_secs must be > 0".into());
    }
    if config.seats.base_url.trim().is_empty() || config.seats.item_id.trim().is_empty() {
        issues.push("seats.base_url and seats.item_id must not be empty".into());
    }
    if config.seats.timeout_secs == 0 {
        issues.push("seats.timeout_secs must be > 0".into());
    }
    if !(-14..=14).contains(&config.display.utc_offset_hours) {
        issues.push("display.utc_offset_hours must be in [-14,14]".into());
    }

    let s = &config.scenario;
    for (name, value) in [
        ("scenario.portal_domain", &s.portal_domain),
        ("scenario.alternate_cruise", &s.alternate_cruise),
        ("scenario.building", &s.building),
        ("scenario.food_court", &s.food_court),
    ] {
        if value.trim().is_empty() {
            issues.push(format!("{name} must not be empty"));
        }
    }

    if config.restaurants.is_empty() {
        issues.push("restaurants must contain at least one venue".into());
    }
    if config
        .restaurants
        .iter()
        .any(|r| r.name.trim().is_empty() || r.facility.trim().is_empty())
    {
        issues.push("every restaurant needs a name and a facility".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Apply environment overrides (highest priority). `lookup` is usually
/// `std::env::var(..).ok()`.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("OPENWEATHER_API_KEY") {
        config.weather.api_key = key;
    }
    if let Some(key) = lookup("GEMINI_API_KEY") {
        config.content.api_key = key;
    }
    if let Some(model) = lookup("GEMINI_MODEL") {
        config.content.model = model.trim().to_string();
    }
    if let Some(host) = lookup("HOST") {
        config.server.host = host.trim().to_string();
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::Config("PORT must be a number in 1..=65535".into()))?;
    }
    if let Some(dir) = lookup("STATIC_DIR") {
        config.server.static_dir = dir.trim().to_string();
    }
    if let Some(ttl) = lookup("WEATHER_CACHE_TTL_SECS") {
        config.weather.cache_ttl_secs = parse_positive_u64(&ttl, "WEATHER_CACHE_TTL_SECS")?;
    }
    if let Some(days) = lookup("EVENT_DAYS") {
        config.calendar.event_days = parse_event_days(&days)?;
    }
    if let Some(offset) = lookup("UTC_OFFSET_HOURS") {
        config.display.utc_offset_hours = offset
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::Config("UTC_OFFSET_HOURS must be an integer".into()))?;
    }
    if let Some(domain) = lookup("PORTAL_DOMAIN") {
        config.scenario.portal_domain = domain.trim().to_string();
    }
    Ok(())
}

/// Load service configuration from environment and optional config file.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults, then the config file if there is one.
    let mut config = AppConfig::default();
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path).inspect_err(|e| {
            tracing::error!("Failed to read {}: {}", config_path.display(), e);
        })?;
        config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;
    } else if explicit {
        return Err(Error::Config(format!(
            "Config file {} does not exist",
            config_path.display()
        )));
    }

    // 3. Environment wins.
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    // 4. Missing credentials degrade at request time; only report them here.
    if config.weather.api_key.trim().is_empty() {
        tracing::warn!("OPENWEATHER_API_KEY is not set; default weather data will be shown");
    }
    if config.content.api_key.trim().is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; message generation will fail");
    }

    validate_config(&config)?;

    Ok(config)
}
