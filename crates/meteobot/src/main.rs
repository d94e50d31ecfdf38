use meteobot::{BotConfig, MaxClient, MessageHandler};
use meteobot_cache::{SharedCache, WeatherCache};
use meteobot_core::CityResolver;
use meteobot_weather::OpenWeatherClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Pause before re-polling after a transport failure.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = BotConfig::from_env()?;
    info!("Configuration loaded");

    let transport = Arc::new(MaxClient::new(
        config.max_bot_token().clone(),
        config.max_api_url().clone(),
        *config.request_timeout(),
        *config.retry_attempts(),
    )?);
    let provider = Arc::new(OpenWeatherClient::new(
        config.openweather_api_key().clone(),
        config.openweather_api_url().clone(),
        *config.request_timeout(),
    )?);

    let cache = SharedCache::new(WeatherCache::new(config.cache().clone()));
    let sweeper = cache.spawn_sweeper(config.cache().sweep_interval());

    let handler = MessageHandler::new(
        cache,
        CityResolver::builtin(),
        provider,
        transport.clone(),
        // Leave room for the loading edit after a slow provider call.
        *config.request_timeout() + Duration::from_secs(2),
    );

    info!("Starting long-poll loop");
    let mut marker: Option<i64> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            batch = transport.get_updates(marker, *config.poll_timeout_secs()) => {
                match batch {
                    Ok(batch) => {
                        marker = (*batch.marker()).or(marker);
                        for update in batch.updates() {
                            if let Some(message) = &update.message {
                                handler.handle(message).await;
                            }
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Polling failed, backing off");
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                    }
                }
            }
        }
    }

    sweeper.stop();
    info!("Stopped");
    Ok(())
}
