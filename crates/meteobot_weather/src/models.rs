//! JSON deserialization models for OpenWeatherMap responses.
//!
//! These models match the `/data/2.5/weather` and `/data/2.5/forecast`
//! response schemas. Fields the formatter never reads are not modeled.

use derive_getters::Getters;
use serde::Deserialize;

/// Current-conditions response from `/weather`.
#[derive(Debug, Clone, Deserialize, Getters, derive_builder::Builder)]
pub struct CurrentWeather {
    /// City name as reported by the provider
    name: String,
    /// Country, sunrise, and sunset block
    sys: SysInfo,
    /// Temperature and atmospheric metrics
    main: MainMetrics,
    /// Condition list; the first entry is the active condition
    weather: Vec<Condition>,
    /// Wind block
    wind: Wind,
    /// Visibility in meters (optional)
    #[serde(default)]
    #[builder(default)]
    visibility: Option<u32>,
    /// Cloudiness block (optional)
    #[serde(default)]
    #[builder(default)]
    clouds: Option<Clouds>,
}

/// Country and sun-times block.
#[derive(Debug, Clone, Deserialize, Getters, derive_builder::Builder)]
pub struct SysInfo {
    /// ISO country code
    #[serde(default)]
    #[builder(default)]
    country: Option<String>,
    /// Sunrise as a unix timestamp (optional)
    #[serde(default)]
    #[builder(default)]
    sunrise: Option<i64>,
    /// Sunset as a unix timestamp (optional)
    #[serde(default)]
    #[builder(default)]
    sunset: Option<i64>,
}

/// Temperature and atmospheric metrics for current conditions.
#[derive(Debug, Clone, Deserialize, Getters, derive_builder::Builder)]
pub struct MainMetrics {
    /// Temperature in °C
    temp: f64,
    /// Perceived temperature in °C
    feels_like: f64,
    /// Relative humidity percentage
    humidity: u32,
    /// Pressure in hPa
    pressure: u32,
}

/// A single weather condition.
#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    /// Human-readable condition text (localized by the provider)
    pub description: String,
    /// Provider icon code, e.g. `01d`
    pub icon: String,
}

/// Wind block.
#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    /// Wind speed in m/s
    pub speed: f64,
    /// Wind direction in degrees; absent or zero renders as unavailable
    #[serde(default)]
    pub deg: Option<f64>,
}

/// Cloudiness block.
#[derive(Debug, Clone, Deserialize)]
pub struct Clouds {
    /// Cloud cover percentage
    pub all: u32,
}

/// Forecast response from `/forecast`.
#[derive(Debug, Clone, Deserialize, Getters, derive_builder::Builder)]
pub struct ForecastResponse {
    /// Timestamped samples, typically at 3-hour intervals
    list: Vec<ForecastSample>,
}

/// One timestamped forecast sample.
#[derive(Debug, Clone, Deserialize, Getters, derive_builder::Builder)]
pub struct ForecastSample {
    /// Sample time as a unix timestamp
    dt: i64,
    /// Temperature block
    main: SampleMetrics,
    /// Condition list; the first entry is representative
    weather: Vec<Condition>,
}

/// Temperature block of a forecast sample.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleMetrics {
    /// Temperature in °C
    pub temp: f64,
}

/// Combined current conditions and forecast for one lookup.
#[derive(Debug, Clone)]
pub struct WeatherReport {
    /// Current conditions
    pub current: CurrentWeather,
    /// Multi-day forecast samples
    pub forecast: ForecastResponse,
}
