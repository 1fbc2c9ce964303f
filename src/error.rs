//! Errors surfaced by session requests.

use crate::config::ERROR_PREFIX;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    /// The server answered with an Error Result; shown to the user verbatim.
    #[error("{0}")]
    Server(String),

    #[error("Error: request failed: {0}")]
    Transport(String),

    #[error("Error: malformed response from {endpoint}: {source}")]
    Malformed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Already running {0}")]
    AlreadyRunning(&'static str),

    #[error("Warning: {0}")]
    InvalidSelection(String),

    /// The endpoint has no cache-first path; bar plots go through the guard.
    #[error("Error: {0} is not a cached query")]
    NotCacheable(String),
}

impl RequestError {
    /// True for errors that came back from the server as an Error Result.
    pub fn is_server_error(&self) -> bool {
        matches!(self, RequestError::Server(_))
    }
}

/// Split a raw response body into success text or an Error Result.
///
/// This is the only place the `"Error"` prefix convention is recognised.
pub fn decode_response(raw: String) -> Result<String, RequestError> {
    if raw.starts_with(ERROR_PREFIX) {
        Err(RequestError::Server(raw))
    } else {
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_prefix_is_server_error() {
        let err = decode_response("Error: gene not found".to_string()).unwrap_err();
        assert!(err.is_server_error());
        assert_eq!(err.to_string(), "Error: gene not found");
    }

    #[test]
    fn other_payloads_pass_through() {
        assert_eq!(decode_response("{\"data\": []}".to_string()).unwrap(), "{\"data\": []}");
        // Only a leading prefix counts.
        assert!(decode_response("\"Error\"".to_string()).is_ok());
    }
}
