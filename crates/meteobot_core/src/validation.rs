//! Input validation for city names.

use meteobot_error::{WeatherError, WeatherErrorKind};
use regex::Regex;
use tracing::{debug, warn};

/// Length bounds for a city name sent to the provider.
const MIN_CITY_LEN: usize = 1;
const MAX_CITY_LEN: usize = 100;

/// Validator for user-supplied city names.
///
/// Rejections are expected, user-facing conditions
/// ([`WeatherErrorKind::InvalidCity`]); they are rendered as corrective
/// replies and never logged at error level.
pub struct CityValidator {
    forbidden: Regex,
    allowed: Regex,
}

impl CityValidator {
    /// Create a validator with the standard character rules.
    pub fn new() -> Self {
        let forbidden = Regex::new(r#"[<>"'&]"#).expect("valid forbidden-chars regex");
        let allowed = Regex::new(r"^[a-zA-Zа-яА-Я0-9\s\-.,]+$").expect("valid allowed-chars regex");
        Self { forbidden, allowed }
    }

    /// Validate a city name, returning the trimmed form.
    ///
    /// Checks, in order: non-empty after trim, length within 1-100
    /// chars, no markup-dangerous characters, only letters, digits,
    /// spaces, and `-.,`.
    pub fn validate(&self, city: &str) -> Result<String, WeatherError> {
        debug!(city, "Validating city name");
        let trimmed = city.trim();

        let len = trimmed.chars().count();
        if len < MIN_CITY_LEN {
            return Err(WeatherError::new(WeatherErrorKind::InvalidCity(
                "city name is empty".to_string(),
            )));
        }
        if len > MAX_CITY_LEN {
            return Err(WeatherError::new(WeatherErrorKind::InvalidCity(format!(
                "city name too long ({} chars)",
                len
            ))));
        }
        if self.forbidden.is_match(trimmed) {
            return Err(WeatherError::new(WeatherErrorKind::InvalidCity(
                "city name contains forbidden characters".to_string(),
            )));
        }
        if !self.allowed.is_match(trimmed) {
            return Err(WeatherError::new(WeatherErrorKind::InvalidCity(
                "city name contains unsupported characters".to_string(),
            )));
        }

        Ok(trimmed.to_string())
    }

    /// Strip forbidden characters and clamp to the maximum length.
    pub fn sanitize(&self, input: &str) -> String {
        let cleaned = self.forbidden.replace_all(input.trim(), "");
        cleaned.chars().take(MAX_CITY_LEN).collect()
    }
}

impl Default for CityValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Stub rate-limit check. Logs when the limit is exceeded; nothing
/// enforces it yet.
pub fn rate_limit_exceeded(request_count: u32, limit: u32) -> bool {
    let exceeded = request_count > limit;
    if exceeded {
        warn!(request_count, limit, "Request limit exceeded");
    }
    exceeded
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteobot_error::WeatherErrorKind;

    #[test]
    fn accepts_cyrillic_latin_and_hyphens() {
        let validator = CityValidator::new();
        assert_eq!(validator.validate(" Ростов-на-Дону ").unwrap(), "Ростов-на-Дону");
        assert_eq!(validator.validate("New York").unwrap(), "New York");
    }

    #[test]
    fn rejects_empty_and_overlong() {
        let validator = CityValidator::new();
        assert!(validator.validate("   ").is_err());
        assert!(validator.validate(&"а".repeat(101)).is_err());
    }

    #[test]
    fn rejects_markup_characters() {
        let validator = CityValidator::new();
        let err = validator.validate("<script>").unwrap_err();
        assert!(matches!(err.kind(), WeatherErrorKind::InvalidCity(_)));
    }

    #[test]
    fn sanitize_strips_and_clamps() {
        let validator = CityValidator::new();
        assert_eq!(validator.sanitize("  Мос<ква>  "), "Москва");
        assert_eq!(validator.sanitize(&"x".repeat(200)).chars().count(), 100);
    }

    #[test]
    fn rate_limit_stub_compares_only() {
        assert!(!rate_limit_exceeded(10, 10));
        assert!(rate_limit_exceeded(11, 10));
    }
}
