//! Error types for queries.

use thiserror::Error;

/// Construction-time validation errors. Returned from `Query::new` and
/// `Registry::query`; never produced by a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No endpoint was supplied
    #[error("endpoint is required")]
    MissingEndpoint,

    /// Endpoint name is not in the endpoint table
    #[error("endpoint is required (unknown endpoint '{0}')")]
    UnknownEndpoint(String),

    /// Poll interval inside the forbidden (0, 1000) ms range
    #[error("poll interval must be 0 or at least {min}ms, got {got}ms")]
    InvalidPollInterval { got: u64, min: u64 },

    /// Query created outside of a tokio runtime
    #[error("no async runtime available to run the query")]
    NoRuntime,
}

/// Errors captured into a query's error field after a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Server answered with a status other than 200 or 204
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// Request never produced a response (connection refused, DNS, ...)
    #[error("request failed: {0}")]
    Transport(String),

    /// Request timed out (only when a client timeout is configured)
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// 200 response whose body is not valid JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// HTTP status code, when the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_endpoint_display() {
        assert_eq!(QueryError::MissingEndpoint.to_string(), "endpoint is required");
        assert_eq!(
            QueryError::UnknownEndpoint("flowz".to_string()).to_string(),
            "endpoint is required (unknown endpoint 'flowz')"
        );
    }

    #[test]
    fn test_invalid_poll_interval_display() {
        let err = QueryError::InvalidPollInterval { got: 500, min: 1000 };
        assert_eq!(
            err.to_string(),
            "poll interval must be 0 or at least 1000ms, got 500ms"
        );
    }

    #[test]
    fn test_http_error_display() {
        let err = FetchError::Http {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = FetchError::Transport("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "request failed: connection refused");
    }
}
