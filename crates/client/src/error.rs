//! Transit API client error types.

use std::sync::Arc;

/// Errors from the remote transit API clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing API key for an upstream that requires one.
    #[error("missing API key: {0}")]
    MissingApiKey(String),

    /// Base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the upstream API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Well-formed response carrying an upstream failure envelope.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ClientError::Timeout } else { ClientError::Network(Arc::new(err)) }
    }
}

impl From<ClientError> for ridecache_core::Error {
    fn from(err: ClientError) -> Self {
        ridecache_core::Error::Remote(err.to_string())
    }
}

/// Map an HTTP status into the client taxonomy.
///
/// Returns Ok for success statuses; 404 is not special-cased here because
/// only the by-id paths treat it as NotFound.
pub(crate) fn check_status(status: reqwest::StatusCode) -> Result<(), ClientError> {
    if status == 401 || status == 403 {
        return Err(ClientError::AuthError);
    }
    if status == 429 {
        return Err(ClientError::RateLimited);
    }
    if status.is_client_error() || status.is_server_error() {
        return Err(ClientError::HttpError { status: status.as_u16() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::MissingApiKey("RIDECACHE_STOPS_API_KEY".into());
        assert!(err.to_string().contains("missing API key"));

        let err = ClientError::HttpError { status: 502 };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_status_mapping() {
        use reqwest::StatusCode;

        assert!(check_status(StatusCode::OK).is_ok());
        assert!(matches!(check_status(StatusCode::UNAUTHORIZED), Err(ClientError::AuthError)));
        assert!(matches!(check_status(StatusCode::FORBIDDEN), Err(ClientError::AuthError)));
        assert!(matches!(check_status(StatusCode::TOO_MANY_REQUESTS), Err(ClientError::RateLimited)));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY),
            Err(ClientError::HttpError { status: 502 })
        ));
    }

    #[test]
    fn test_conversion_into_core_error() {
        let err: ridecache_core::Error = ClientError::Timeout.into();
        assert!(matches!(err, ridecache_core::Error::Remote(_)));
        assert!(err.to_string().contains("request timeout"));
    }
}
