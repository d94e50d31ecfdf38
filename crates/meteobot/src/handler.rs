//! Inbound message handling.
//!
//! One handler invocation per chat message. Control flow: command
//! dispatch or city resolution, cache lookup, provider fetch under an
//! explicit deadline, formatting, reply. Failures are rendered as short
//! friendly texts; a failure in one message never affects the next.

use crate::transport::{ChatSink, IncomingMessage};
use meteobot_cache::{SharedCache, WeatherCache};
use meteobot_core::{CityResolver, CityValidator, ResolvedCity, messages};
use meteobot_weather::WeatherProvider;
use meteobot_weather::format::format_report;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const START_COMMAND: &str = "/start";
const WEATHER_COMMAND: &str = "/weather";

/// Where the city name came from, which decides the not-found reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CityOrigin {
    /// Explicit command argument or alias-table hit
    Recognized,
    /// Verbatim fallback from unmatched free text
    Fallback,
}

/// Routes inbound messages through resolution, cache, and provider.
pub struct MessageHandler {
    cache: SharedCache,
    resolver: CityResolver,
    validator: CityValidator,
    provider: Arc<dyn WeatherProvider>,
    chat: Arc<dyn ChatSink>,
    provider_deadline: Duration,
}

impl MessageHandler {
    /// Create a handler over explicitly constructed collaborators.
    pub fn new(
        cache: SharedCache,
        resolver: CityResolver,
        provider: Arc<dyn WeatherProvider>,
        chat: Arc<dyn ChatSink>,
        provider_deadline: Duration,
    ) -> Self {
        Self {
            cache,
            resolver,
            validator: CityValidator::new(),
            provider,
            chat,
            provider_deadline,
        }
    }

    /// Handle one inbound message.
    ///
    /// Never fails outward: every error path ends in a user-facing
    /// reply (or, for reply-send failures, an error log), keeping the
    /// polling loop alive.
    #[instrument(skip(self, message), fields(user_id = message.user_id, chat_id = message.chat_id))]
    pub async fn handle(&self, message: &IncomingMessage) {
        let text = match &message.text {
            Some(text) => text.trim(),
            None => return,
        };
        if text.is_empty() {
            return;
        }

        if text == START_COMMAND || text.starts_with("/start ") {
            info!("Handling /start");
            self.reply(message.chat_id, messages::WELCOME).await;
        } else if let Some(args) = strip_command(text, WEATHER_COMMAND) {
            self.handle_weather_command(message, args).await;
        } else if text.starts_with('/') {
            debug!(command = text, "Unknown command");
            self.reply(message.chat_id, messages::UNKNOWN_COMMAND).await;
        } else {
            self.handle_city_text(message, text).await;
        }
    }

    /// `/weather <city>`: explicit request, no alias resolution.
    async fn handle_weather_command(&self, message: &IncomingMessage, args: &str) {
        let city = args.trim();
        if city.is_empty() {
            self.reply(message.chat_id, messages::WEATHER_USAGE).await;
            return;
        }
        info!(city, "Handling /weather");
        self.lookup_and_reply(message, city, CityOrigin::Recognized)
            .await;
    }

    /// Free text: alias table first, then the filler-stripping
    /// heuristic with its length bound.
    async fn handle_city_text(&self, message: &IncomingMessage, text: &str) {
        match self.resolver.resolve(text) {
            ResolvedCity::Canonical(city) => {
                info!(city, "Alias table matched");
                self.lookup_and_reply(message, &city, CityOrigin::Recognized)
                    .await;
            }
            ResolvedCity::Verbatim(raw) => match self.resolver.extract_candidate(&raw) {
                Some(candidate) => {
                    info!(candidate, "Trying verbatim city candidate");
                    self.lookup_and_reply(message, &candidate, CityOrigin::Fallback)
                        .await;
                }
                None => {
                    self.reply(message.chat_id, messages::USAGE_HELP).await;
                }
            },
        }
    }

    /// Cache, fetch, format, reply.
    async fn lookup_and_reply(&self, message: &IncomingMessage, city: &str, origin: CityOrigin) {
        let city = match self.validator.validate(city) {
            Ok(city) => city,
            Err(e) => {
                debug!(error = %e, "City name rejected");
                self.reply(message.chat_id, messages::INVALID_CITY).await;
                return;
            }
        };

        let key = WeatherCache::generate_city_key(&city);
        if let Some(cached) = self.cache.get(&key) {
            debug!(city, "Serving cached weather");
            self.reply(message.chat_id, &cached).await;
            return;
        }

        // Loading placeholder, edited in place with the outcome.
        let loading = match self.chat.send(message.chat_id, &messages::loading(&city)).await {
            Ok(sent) => sent,
            Err(e) => {
                error!(error = %e, city, "Failed to send loading message");
                return;
            }
        };

        let outcome =
            tokio::time::timeout(self.provider_deadline, self.provider.fetch(&city)).await;

        let reply = match outcome {
            Ok(Ok(report)) => {
                let formatted = format_report(&report.current, report.forecast.list());
                self.cache.set(&key, formatted.clone(), None);
                info!(city, "Weather lookup succeeded");
                formatted
            }
            Ok(Err(e)) if e.kind().is_user_facing() => {
                info!(error = %e, city, "Weather lookup rejected");
                match e.kind() {
                    meteobot_error::WeatherErrorKind::CityNotFound(_) => match origin {
                        CityOrigin::Recognized => messages::city_not_found(&city),
                        CityOrigin::Fallback => messages::FALLBACK_HELP.to_string(),
                    },
                    _ => messages::INVALID_CITY.to_string(),
                }
            }
            Ok(Err(e)) => {
                error!(error = %e, city, "Weather lookup failed");
                messages::TRY_AGAIN_LATER.to_string()
            }
            Err(_) => {
                error!(city, "Weather lookup exceeded deadline");
                messages::TRY_AGAIN_LATER.to_string()
            }
        };

        if let Err(e) = self
            .chat
            .edit(message.chat_id, loading.message_id, &reply)
            .await
        {
            warn!(error = %e, city, "Failed to edit loading message, sending fresh reply");
            self.reply(message.chat_id, &reply).await;
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.chat.send(chat_id, text).await {
            error!(error = %e, chat_id, "Failed to send reply");
        }
    }
}

/// Split `"/weather Москва"` into the argument tail; `None` when the
/// text is not this command. Literal prefix match, case-sensitive.
fn strip_command<'a>(text: &'a str, command: &str) -> Option<&'a str> {
    if text == command {
        return Some("");
    }
    text.strip_prefix(command)
        .filter(|rest| rest.starts_with(' '))
}
