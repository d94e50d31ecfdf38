//! Weather lookup error types and retry classification.

/// Weather lookup error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum WeatherErrorKind {
    /// The provider has no data for the requested city
    #[display("City not found: {}", _0)]
    CityNotFound(String),
    /// The provider call exceeded its deadline
    #[display("Weather provider timed out")]
    Timeout,
    /// Network-level failure reaching the provider (connect/DNS)
    #[display("Weather provider unavailable: {}", _0)]
    Unavailable(String),
    /// City name rejected before any provider call
    #[display("Invalid city input: {}", _0)]
    InvalidCity(String),
    /// Unexpected provider status or response shape
    #[display("Unexpected provider response: HTTP {} {}", status, message)]
    UnknownProvider {
        /// HTTP status code returned by the provider
        status: u16,
        /// Response body or decode failure detail
        message: String,
    },
}

impl WeatherErrorKind {
    /// Check if this error is an expected, user-facing condition.
    ///
    /// User-facing conditions are rendered as corrective messages and are
    /// not logged at error level.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            WeatherErrorKind::CityNotFound(_) | WeatherErrorKind::InvalidCity(_)
        )
    }

    /// Check if this error type is transient and safe to retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            WeatherErrorKind::Timeout => true,
            WeatherErrorKind::Unavailable(_) => true,
            WeatherErrorKind::UnknownProvider { status, .. } => {
                matches!(*status, 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}

/// Weather error with kind discrimination and source location.
///
/// # Examples
///
/// ```
/// use meteobot_error::{WeatherError, WeatherErrorKind};
///
/// let err = WeatherError::new(WeatherErrorKind::CityNotFound("Atlantis".into()));
/// assert!(err.kind().is_user_facing());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Weather Error: {} at line {} in {}", kind, line, file)]
pub struct WeatherError {
    kind: WeatherErrorKind,
    line: u32,
    file: &'static str,
}

impl WeatherError {
    /// Create a new weather error with caller location tracking.
    #[track_caller]
    pub fn new(kind: WeatherErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &WeatherErrorKind {
        &self.kind
    }
}
