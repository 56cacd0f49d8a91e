//! Navitia API error type.

use std::fmt;

use super::types::ErrorResponse;

/// Failures reported by the Navitia API or the transport underneath it.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum NavitiaError {
    /// HTTP 401: missing or invalid token.
    Unauthorized,
    /// HTTP 404: unknown object (station, location).
    NotFound,
    /// HTTP 400 with the API's own explanation when it sent one.
    BadRequest(String),
    /// Any other non-success status.
    Status(u16),
    /// The request did not complete within the client timeout.
    Timeout,
    /// Connection, TLS, or body read failure.
    Network(reqwest::Error),
}

impl NavitiaError {
    /// Maps a non-success status and its body to an error.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound,
            400 => {
                let message = serde_json::from_str::<ErrorResponse>(body)
                    .ok()
                    .and_then(|r| r.error)
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| String::from("Bad request"));
                Self::BadRequest(message)
            }
            other => Self::Status(other),
        }
    }

    /// Classifies a transport-level failure.
    #[must_use]
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}

impl fmt::Display for NavitiaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Invalid API token"),
            Self::NotFound => write!(f, "Not found"),
            Self::BadRequest(message) => write!(f, "API error: {message}"),
            Self::Status(status) => write!(f, "API error: HTTP {status}"),
            Self::Timeout => write!(f, "API timeout - network may be slow"),
            Self::Network(err) => write!(f, "Network error: {err}"),
        }
    }
}

impl std::error::Error for NavitiaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network(err) => Some(err),
            _ => None,
        }
    }
}
