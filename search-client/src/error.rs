use http::StatusCode;
use thiserror::Error;

/// Failure of a single `fetch_page` call.
///
/// This is the only error kind the search controller recognizes; every
/// variant is recoverable and surfaces to the user as the error flag.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http {status} for {}: {}", .url.as_deref().unwrap_or("<unknown>"), .body.as_deref().unwrap_or(""))]
    Http {
        status: StatusCode,
        url: Option<String>,
        body: Option<String>,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("failed to decode search response: {0}")]
    Decode(String),
    #[error("failed to build search request: {0}")]
    Build(String),
}

impl TransportError {
    /// Returns true for failures the server reported, as opposed to failures
    /// to reach it.
    pub fn is_http(&self) -> bool {
        matches!(self, TransportError::Http { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn http_error_display_includes_status_and_body() {
        let err = TransportError::Http {
            status: StatusCode::SERVICE_UNAVAILABLE,
            url: Some("http://localhost/search.json".to_string()),
            body: Some("try later".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "http 503 Service Unavailable for http://localhost/search.json: try later"
        );
        assert!(err.is_http());
    }

    #[test]
    fn http_error_display_tolerates_missing_fields() {
        let err = TransportError::Http {
            status: StatusCode::NOT_FOUND,
            url: None,
            body: None,
        };
        assert_eq!(err.to_string(), "http 404 Not Found for <unknown>: ");
        assert!(!TransportError::Timeout.is_http());
    }
}
