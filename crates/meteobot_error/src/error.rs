//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, TransportError, WeatherError};

/// Foundation error enum for the meteobot workspace.
///
/// # Examples
///
/// ```
/// use meteobot_error::{MeteobotError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: MeteobotError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MeteobotErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Weather lookup error
    #[from(WeatherError)]
    Weather(WeatherError),
    /// Chat transport error
    #[from(TransportError)]
    Transport(TransportError),
}

/// Meteobot error with kind discrimination.
///
/// # Examples
///
/// ```
/// use meteobot_error::{MeteobotResult, ConfigError};
///
/// fn might_fail() -> MeteobotResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Meteobot Error: {}", _0)]
pub struct MeteobotError(Box<MeteobotErrorKind>);

impl MeteobotError {
    /// Create a new error from a kind.
    pub fn new(kind: MeteobotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MeteobotErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to MeteobotErrorKind
impl<T> From<T> for MeteobotError
where
    T: Into<MeteobotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for meteobot operations.
///
/// # Examples
///
/// ```
/// use meteobot_error::{MeteobotResult, HttpError};
///
/// fn fetch_data() -> MeteobotResult<String> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type MeteobotResult<T> = std::result::Result<T, MeteobotError>;
