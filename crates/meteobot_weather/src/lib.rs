//! Weather provider integration and message formatting.
//!
//! An OpenWeatherMap client shaped like the rest of the workspace's API
//! clients, a `WeatherProvider` trait seam so the handler can be tested
//! against a mock, the pure formatter that turns a provider response
//! into the user-facing reply, and a generic retry helper.

#![warn(missing_docs)]

mod client;
pub mod format;
mod models;
mod provider;
pub mod retry;

pub use client::OpenWeatherClient;
pub use models::{
    Clouds, Condition, CurrentWeather, CurrentWeatherBuilder, ForecastResponse,
    ForecastResponseBuilder, ForecastSample, ForecastSampleBuilder, MainMetrics,
    MainMetricsBuilder, SampleMetrics, SysInfo, SysInfoBuilder, WeatherReport, Wind,
};
pub use provider::WeatherProvider;
