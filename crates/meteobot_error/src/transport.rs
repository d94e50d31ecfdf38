//! Chat transport error types.

/// Chat platform API error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TransportErrorKind {
    /// Token rejected by the platform
    #[display("Chat API authorization failed (check bot token)")]
    Unauthorized,
    /// Platform request limit hit
    #[display("Chat API rate limit exceeded")]
    RateLimited,
    /// Request exceeded its deadline
    #[display("Chat API request timed out")]
    Timeout,
    /// Network-level failure reaching the platform
    #[display("Chat API unreachable: {}", _0)]
    Network(String),
    /// Unexpected response status
    #[display("Chat API returned HTTP {}: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Undecodable response body
    #[display("Chat API response decode failed: {}", _0)]
    Decode(String),
}

impl TransportErrorKind {
    /// Check if this error type is transient and safe to retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportErrorKind::Timeout => true,
            TransportErrorKind::Network(_) => true,
            TransportErrorKind::RateLimited => true,
            TransportErrorKind::Status { status, .. } => matches!(*status, 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

/// Transport error with kind discrimination and source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", kind, line, file)]
pub struct TransportError {
    kind: TransportErrorKind,
    line: u32,
    file: &'static str,
}

impl TransportError {
    /// Create a new transport error with caller location tracking.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TransportErrorKind {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_kinds_are_retryable() {
        assert!(TransportErrorKind::Timeout.is_retryable());
        assert!(TransportErrorKind::RateLimited.is_retryable());
        assert!(TransportErrorKind::Network("connection reset".to_string()).is_retryable());
        for status in [500, 502, 503, 504] {
            let kind = TransportErrorKind::Status {
                status,
                message: String::new(),
            };
            assert!(kind.is_retryable(), "HTTP {} should retry", status);
        }
    }

    #[test]
    fn permanent_kinds_are_not_retryable() {
        assert!(!TransportErrorKind::Unauthorized.is_retryable());
        assert!(!TransportErrorKind::Decode("truncated body".to_string()).is_retryable());
        for status in [400, 403, 404, 422] {
            let kind = TransportErrorKind::Status {
                status,
                message: String::new(),
            };
            assert!(!kind.is_retryable(), "HTTP {} should not retry", status);
        }
    }
}
