//! OpenWeatherMap API client.

use crate::{CurrentWeather, ForecastResponse, WeatherReport};
use meteobot_error::{HttpError, MeteobotResult, WeatherError, WeatherErrorKind};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const UNITS: &str = "metric";
const LANG: &str = "ru";

/// OpenWeatherMap API client.
///
/// Queries `/weather` and `/forecast` with metric units and Russian
/// condition descriptions, matching the reply language.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenWeatherMap API key
    /// * `base_url` - API base, `None` for the production endpoint
    /// * `timeout` - per-request timeout
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> MeteobotResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        debug!("Creating OpenWeatherMap client");
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// Fetch current conditions for a city.
    #[instrument(skip(self))]
    pub async fn current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        self.fetch_endpoint("weather", city).await
    }

    /// Fetch the multi-day forecast for a city.
    #[instrument(skip(self))]
    pub async fn forecast(&self, city: &str) -> Result<ForecastResponse, WeatherError> {
        self.fetch_endpoint("forecast", city).await
    }

    /// Fetch current conditions and forecast for one report.
    pub async fn report(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let current = self.current(city).await?;
        let forecast = self.forecast(city).await?;
        Ok(WeatherReport { current, forecast })
    }

    async fn fetch_endpoint<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
    ) -> Result<T, WeatherError> {
        debug!(endpoint, city, "Requesting weather data");

        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
                ("lang", LANG),
            ])
            .send()
            .await
            .map_err(|e| classify_transport_error(e, city))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(city, "Provider reported city not found");
            return Err(WeatherError::new(WeatherErrorKind::CityNotFound(
                city.to_string(),
            )));
        }
        if status == StatusCode::UNAUTHORIZED {
            error!("Weather provider rejected the API key");
            return Err(WeatherError::new(WeatherErrorKind::UnknownProvider {
                status: status.as_u16(),
                message: "API key rejected".to_string(),
            }));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, city, body = %body, "Provider returned error status");
            return Err(WeatherError::new(WeatherErrorKind::UnknownProvider {
                status: status.as_u16(),
                message: body,
            }));
        }

        response.json().await.map_err(|e| {
            error!(error = ?e, city, "Failed to decode provider response");
            WeatherError::new(WeatherErrorKind::UnknownProvider {
                status: status.as_u16(),
                message: format!("Response decode failed: {}", e),
            })
        })
    }
}

/// Map a reqwest failure onto the weather error kinds.
fn classify_transport_error(err: reqwest::Error, city: &str) -> WeatherError {
    if err.is_timeout() {
        error!(city, "Weather provider request timed out");
        return WeatherError::new(WeatherErrorKind::Timeout);
    }
    if err.is_connect() {
        error!(error = ?err, city, "Failed to reach weather provider");
        return WeatherError::new(WeatherErrorKind::Unavailable(err.to_string()));
    }
    error!(error = ?err, city, "Weather provider request failed");
    WeatherError::new(WeatherErrorKind::UnknownProvider {
        status: err.status().map(|s| s.as_u16()).unwrap_or(0),
        message: err.to_string(),
    })
}
