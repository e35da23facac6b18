// File: src/error.rs
// Purpose: Error taxonomy for handlers, mounting, and builds

use axum::http::StatusCode;

use virgule_scan::{Method, ScanError};

/// A structured HTTP error produced by a handler.
///
/// Translated verbatim at the response boundary: the status and message go
/// to the client, the cause stays in the logs.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
    pub cause: Option<anyhow::Error>,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<anyhow::Error>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// What a handler can fail with: a structured HTTP error or anything else.
///
/// The distinction decides the response boundary's behavior: `Http` is
/// translated verbatim, `Internal` becomes a fixed 500 with a generic body
/// while the concrete error is retained for logging.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Http(HttpError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<HttpError> for Error {
    fn from(err: HttpError) -> Self {
        Error::Http(err)
    }
}

/// Handler result alias; handlers that write a response return `Ok(())`.
pub type Result<T = ()> = std::result::Result<T, Error>;

/// The standard error envelope written to clients.
pub(crate) fn error_body(status: StatusCode, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": status.as_u16(),
            "message": message,
        }
    })
}

/// Configuration errors surfaced while mounting a scanned tree.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("duplicate route: {method} {pattern}")]
    DuplicateRoute { method: Method, pattern: String },

    #[error("route {method} {pattern} conflicts with an existing registration")]
    RouteConflict { method: Method, pattern: String },

    #[error("no handler registered for {method} in {dir:?} (declared in {source_path})")]
    UnregisteredHandler {
        method: Method,
        dir: String,
        source_path: String,
    },

    #[error("no middleware registered for {dir:?} (declared in {source_path})")]
    UnregisteredMiddleware { dir: String, source_path: String },

    #[error("no proxy registered (declared in {source_path})")]
    UnregisteredProxy { source_path: String },
}

/// Everything a build (scan + mount) can fail with.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Mount(#[from] MountError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = HttpError::bad_request("missing field");
        assert_eq!(err.to_string(), "400 missing field");
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("boom").into();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_error_body_envelope() {
        let body = error_body(StatusCode::NOT_FOUND, "nope");
        assert_eq!(body["error"]["code"], 404);
        assert_eq!(body["error"]["message"], "nope");
    }
}
