//! Provider trait seam.

use crate::{OpenWeatherClient, WeatherReport};
use async_trait::async_trait;
use meteobot_error::WeatherError;

/// A source of weather reports.
///
/// The message handler depends on this trait rather than the concrete
/// client, so tests can substitute a mock provider.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch current conditions and forecast for a city.
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        self.report(city).await
    }
}
