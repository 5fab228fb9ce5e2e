//! Unified error handling for the client.

use reqwest::StatusCode;
use thiserror::Error;

/// Transport failure classes, derived from the HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// 400: the server rejected the request shape
    BadRequest,
    /// 401: no valid credential
    Unauthenticated,
    /// 403: credential present but not allowed
    Forbidden,
    /// 404: the resource does not exist
    NotFound,
    /// 5xx: the server failed
    ServerFault,
    /// Anything else
    Unknown,
}

impl TransportKind {
    /// Classify an HTTP status code.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => TransportKind::BadRequest,
            401 => TransportKind::Unauthenticated,
            403 => TransportKind::Forbidden,
            404 => TransportKind::NotFound,
            500..=599 => TransportKind::ServerFault,
            _ => TransportKind::Unknown,
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransportKind::BadRequest => "malformed request",
            TransportKind::Unauthenticated => "authentication required",
            TransportKind::Forbidden => "not allowed",
            TransportKind::NotFound => "resource not found",
            TransportKind::ServerFault => "server fault",
            TransportKind::Unknown => "unexpected response",
        };
        write!(f, "{label}")
    }
}

/// Application error type.
///
/// Validation errors are local and block the network call; transport errors
/// classify a completed HTTP exchange; connection errors never reached the
/// server. Envelope-shape mismatches are deliberately absent: they degrade
/// to empty sequences and are logged, never raised.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] spindle_engine::Error),

    #[error("{kind} (HTTP {status})")]
    Transport { kind: TransportKind, status: u16 },

    #[error("request failed: {0}")]
    Connection(#[from] reqwest::Error),
}

impl ClientError {
    /// Build a transport error from a response status.
    pub fn from_status(status: StatusCode) -> Self {
        ClientError::Transport {
            kind: TransportKind::from_status(status),
            status: status.as_u16(),
        }
    }

    /// Whether this error was raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// The message surfaced to the rendering layer.
    pub fn surface_message(&self) -> String {
        self.to_string()
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(
            TransportKind::from_status(StatusCode::BAD_REQUEST),
            TransportKind::BadRequest
        );
        assert_eq!(
            TransportKind::from_status(StatusCode::UNAUTHORIZED),
            TransportKind::Unauthenticated
        );
        assert_eq!(
            TransportKind::from_status(StatusCode::FORBIDDEN),
            TransportKind::Forbidden
        );
        assert_eq!(
            TransportKind::from_status(StatusCode::NOT_FOUND),
            TransportKind::NotFound
        );
        assert_eq!(
            TransportKind::from_status(StatusCode::BAD_GATEWAY),
            TransportKind::ServerFault
        );
        assert_eq!(
            TransportKind::from_status(StatusCode::IM_A_TEAPOT),
            TransportKind::Unknown
        );
    }

    #[test]
    fn transport_error_display() {
        let err = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "server fault (HTTP 500)");
        assert!(!err.is_validation());
    }

    #[test]
    fn validation_error_passes_through() {
        let err = ClientError::from(spindle_engine::Error::MissingRequiredField("title"));
        assert!(err.is_validation());
        assert_eq!(err.surface_message(), "missing required field: title");
    }
}
