//! Tests for the message handler, using in-memory provider and sink
//! mocks so no network is involved.

use async_trait::async_trait;
use meteobot::transport::{ChatSink, IncomingMessage, SentMessage};
use meteobot::MessageHandler;
use meteobot_cache::{CacheConfig, SharedCache, WeatherCache};
use meteobot_core::CityResolver;
use meteobot_error::{TransportError, WeatherError, WeatherErrorKind};
use meteobot_weather::{
    CurrentWeatherBuilder, ForecastResponseBuilder, MainMetricsBuilder, SysInfoBuilder,
    WeatherProvider, WeatherReport, Wind,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Records every outbound operation for assertions.
#[derive(Debug, Clone, PartialEq)]
enum SinkCall {
    Send { chat_id: i64, text: String },
    Edit { message_id: i64, text: String },
}

#[derive(Default)]
struct MockSink {
    calls: Mutex<Vec<SinkCall>>,
}

impl MockSink {
    fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ChatSink for MockSink {
    async fn send(&self, chat_id: i64, text: &str) -> Result<SentMessage, TransportError> {
        let mut calls = self.calls.lock();
        let message_id = calls.len() as i64 + 1;
        calls.push(SinkCall::Send {
            chat_id,
            text: text.to_string(),
        });
        Ok(SentMessage { message_id })
    }

    async fn edit(
        &self,
        _chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), TransportError> {
        self.calls.lock().push(SinkCall::Edit {
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Yields a canned result and counts fetches.
struct MockProvider {
    result: Box<dyn Fn() -> Result<WeatherReport, WeatherError> + Send + Sync>,
    fetches: AtomicUsize,
}

impl MockProvider {
    fn succeeding() -> Self {
        Self {
            result: Box::new(|| Ok(report_fixture())),
            fetches: AtomicUsize::new(0),
        }
    }

    fn failing(kind: fn() -> WeatherErrorKind) -> Self {
        Self {
            result: Box::new(move || Err(WeatherError::new(kind()))),
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn fetch(&self, _city: &str) -> Result<WeatherReport, WeatherError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        (self.result)()
    }
}

fn report_fixture() -> WeatherReport {
    let current = CurrentWeatherBuilder::default()
        .name("Москва".to_string())
        .sys(
            SysInfoBuilder::default()
                .country(Some("RU".to_string()))
                .sunrise(None)
                .sunset(None)
                .build()
                .unwrap(),
        )
        .main(
            MainMetricsBuilder::default()
                .temp(5.0)
                .feels_like(2.0)
                .humidity(80)
                .pressure(1010)
                .build()
                .unwrap(),
        )
        .weather(vec![meteobot_weather::Condition {
            description: "облачно".to_string(),
            icon: "04d".to_string(),
        }])
        .wind(Wind {
            speed: 3.0,
            deg: Some(180.0),
        })
        .build()
        .unwrap();
    let forecast = ForecastResponseBuilder::default()
        .list(vec![])
        .build()
        .unwrap();
    WeatherReport { current, forecast }
}

fn message(text: &str) -> IncomingMessage {
    IncomingMessage {
        user_id: 7,
        chat_id: 42,
        message_id: 100,
        text: Some(text.to_string()),
    }
}

struct Harness {
    handler: MessageHandler,
    sink: Arc<MockSink>,
    provider: Arc<MockProvider>,
    cache: SharedCache,
}

fn harness(provider: MockProvider) -> Harness {
    let cache = SharedCache::new(WeatherCache::new(CacheConfig::default()));
    let sink = Arc::new(MockSink::default());
    let provider = Arc::new(provider);
    let handler = MessageHandler::new(
        cache.clone(),
        CityResolver::builtin(),
        provider.clone(),
        sink.clone(),
        Duration::from_secs(5),
    );
    Harness {
        handler,
        sink,
        provider,
        cache,
    }
}

#[tokio::test]
async fn test_start_command_sends_welcome() {
    let h = harness(MockProvider::succeeding());
    h.handler.handle(&message("/start")).await;

    let calls = h.sink.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        SinkCall::Send { chat_id, text } => {
            assert_eq!(*chat_id, 42);
            assert!(text.contains("Добро пожаловать"));
        }
        other => panic!("unexpected call: {:?}", other),
    }
    assert_eq!(h.provider.fetch_count(), 0);
}

#[tokio::test]
async fn test_bare_weather_command_sends_usage_without_fetch() {
    let h = harness(MockProvider::succeeding());
    h.handler.handle(&message("/weather")).await;

    let calls = h.sink.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        SinkCall::Send { text, .. } => assert!(text.contains("/weather")),
        other => panic!("unexpected call: {:?}", other),
    }
    assert_eq!(h.provider.fetch_count(), 0);
}

#[tokio::test]
async fn test_unknown_command_sends_hint() {
    let h = harness(MockProvider::succeeding());
    h.handler.handle(&message("/frobnicate")).await;

    let calls = h.sink.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(h.provider.fetch_count(), 0);
}

#[tokio::test]
async fn test_successful_lookup_edits_loading_and_caches() {
    let h = harness(MockProvider::succeeding());
    h.handler.handle(&message("/weather Москва")).await;

    let calls = h.sink.calls();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        SinkCall::Send { text, .. } => assert!(text.contains("Москва")),
        other => panic!("unexpected call: {:?}", other),
    }
    match &calls[1] {
        SinkCall::Edit { message_id, text } => {
            assert_eq!(*message_id, 1);
            assert!(text.contains("Погода в Москва"));
        }
        other => panic!("unexpected call: {:?}", other),
    }
    assert!(h.cache.get("weather:москва").is_some());
}

#[tokio::test]
async fn test_cache_hit_skips_provider_and_loading_message() {
    let h = harness(MockProvider::succeeding());
    h.cache
        .set("weather:москва", "cached reply".to_string(), None);

    h.handler.handle(&message("/weather Москва")).await;

    let calls = h.sink.calls();
    assert_eq!(
        calls,
        vec![SinkCall::Send {
            chat_id: 42,
            text: "cached reply".to_string(),
        }]
    );
    assert_eq!(h.provider.fetch_count(), 0);
}

#[tokio::test]
async fn test_city_not_found_names_city_and_caches_nothing() {
    let h = harness(MockProvider::failing(|| {
        WeatherErrorKind::CityNotFound("Moscow".to_string())
    }));
    h.handler.handle(&message("/weather Moscow")).await;

    let calls = h.sink.calls();
    assert_eq!(calls.len(), 2);
    match &calls[1] {
        SinkCall::Edit { text, .. } => assert!(text.contains("Moscow")),
        other => panic!("unexpected call: {:?}", other),
    }
    assert!(h.cache.get("weather:moscow").is_none());
    assert_eq!(*h.cache.stats().total_entries(), 0);
}

#[tokio::test]
async fn test_fallback_city_not_found_offers_help_instead() {
    let h = harness(MockProvider::failing(|| {
        WeatherErrorKind::CityNotFound("qwertograd".to_string())
    }));
    // Free text with no alias match falls through to the verbatim path.
    h.handler.handle(&message("qwertograd")).await;

    let calls = h.sink.calls();
    assert_eq!(calls.len(), 2);
    match &calls[1] {
        SinkCall::Edit { text, .. } => {
            assert!(!text.contains("qwertograd"));
            assert!(text.contains("/weather"));
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_alias_text_resolves_before_fetch() {
    let h = harness(MockProvider::succeeding());
    h.handler.handle(&message("какая погода в питере?")).await;

    assert_eq!(h.provider.fetch_count(), 1);
    // Canonical form, not the alias, lands in the cache.
    assert!(h.cache.get("weather:санкт-петербург").is_some());
}

#[tokio::test]
async fn test_provider_outage_replies_try_again_and_caches_nothing() {
    let h = harness(MockProvider::failing(|| {
        WeatherErrorKind::Unavailable("connection refused".to_string())
    }));
    h.handler.handle(&message("/weather Москва")).await;

    let calls = h.sink.calls();
    assert_eq!(calls.len(), 2);
    match &calls[1] {
        SinkCall::Edit { text, .. } => assert!(text.contains("позже")),
        other => panic!("unexpected call: {:?}", other),
    }
    assert_eq!(*h.cache.stats().total_entries(), 0);
}

#[tokio::test]
async fn test_invalid_city_rejected_without_fetch() {
    let h = harness(MockProvider::succeeding());
    h.handler.handle(&message("/weather <script>")).await;

    let calls = h.sink.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(h.provider.fetch_count(), 0);
}

#[tokio::test]
async fn test_empty_and_missing_text_are_ignored() {
    let h = harness(MockProvider::succeeding());
    h.handler.handle(&message("   ")).await;
    h.handler
        .handle(&IncomingMessage {
            user_id: 7,
            chat_id: 42,
            message_id: 100,
            text: None,
        })
        .await;

    assert!(h.sink.calls().is_empty());
    assert_eq!(h.provider.fetch_count(), 0);
}
