//! Configuration error types.

/// Configuration error with source location.
///
/// Raised during startup validation of environment variables. Fatal
/// before the message loop begins; never produced once the bot is running.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use meteobot_error::ConfigError;
    ///
    /// let err = ConfigError::new("MAX_BOT_TOKEN is not set");
    /// assert!(err.message.contains("MAX_BOT_TOKEN"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
