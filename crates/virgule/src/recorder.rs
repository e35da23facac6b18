// File: src/recorder.rs
// Purpose: Response recorder capturing status and byte count for observability

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use bytes::BytesMut;

/// Buffers the response a handler writes and records the two facts the
/// request logger needs: the status and the byte count.
///
/// The first status write wins; every later write only accumulates size.
/// Writing body bytes before any status fixes the status at 200.
#[derive(Debug)]
pub struct ResponseRecorder {
    status: StatusCode,
    written: bool,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            written: false,
            headers: HeaderMap::new(),
            body: BytesMut::new(),
        }
    }

    /// The recorded status; 200 until a write fixes it otherwise.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether a status has been committed.
    pub fn written(&self) -> bool {
        self.written
    }

    /// Total body bytes written so far.
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }

    /// Commits the status. Only the first call has any effect.
    pub fn write_status(&mut self, status: StatusCode) {
        if self.written {
            return;
        }
        self.status = status;
        self.written = true;
    }

    /// Appends body bytes, committing status 200 if none was set.
    pub fn write(&mut self, data: &[u8]) -> usize {
        if !self.written {
            self.write_status(StatusCode::OK);
        }
        self.body.extend_from_slice(data);
        data.len()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn insert_header(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
    }

    pub fn set_content_type(&mut self, value: &str) {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(header::CONTENT_TYPE, value);
        }
    }

    /// Consumes the recorder into a transport response.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body.freeze()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl Default for ResponseRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_status_is_ok_and_unwritten() {
        let recorder = ResponseRecorder::new();
        assert_eq!(recorder.status(), StatusCode::OK);
        assert!(!recorder.written());
        assert_eq!(recorder.size(), 0);
    }

    #[rstest]
    #[case(StatusCode::OK)]
    #[case(StatusCode::CREATED)]
    #[case(StatusCode::BAD_REQUEST)]
    #[case(StatusCode::NOT_FOUND)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_captures_status(#[case] status: StatusCode) {
        let mut recorder = ResponseRecorder::new();
        recorder.write_status(status);
        assert_eq!(recorder.status(), status);
        assert!(recorder.written());
    }

    #[test]
    fn test_captures_size() {
        let mut recorder = ResponseRecorder::new();
        let data = b"Hello, World!";
        let n = recorder.write(data);
        assert_eq!(n, data.len());
        assert_eq!(recorder.size(), data.len() as u64);
    }

    #[test]
    fn test_multiple_writes_accumulate() {
        let mut recorder = ResponseRecorder::new();
        recorder.write(b"Hello, ");
        recorder.write(b"World!");
        assert_eq!(recorder.size(), 13);
    }

    #[test]
    fn test_first_status_wins() {
        let mut recorder = ResponseRecorder::new();
        recorder.write_status(StatusCode::CREATED);
        recorder.write_status(StatusCode::NOT_FOUND);
        assert_eq!(recorder.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_write_implies_ok() {
        let mut recorder = ResponseRecorder::new();
        recorder.write(b"test");
        assert_eq!(recorder.status(), StatusCode::OK);
        assert!(recorder.written());
    }

    #[test]
    fn test_into_response_carries_everything() {
        let mut recorder = ResponseRecorder::new();
        recorder.insert_header("x-test", "value");
        recorder.write_status(StatusCode::CREATED);
        recorder.write(b"test body");

        let response = recorder.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get("x-test").unwrap(), "value");
    }
}
