// File: src/context.rs
// Purpose: Request context passed to handlers, middleware, and the proxy

use std::collections::HashMap;
use parking_lot::Mutex;

use axum::http::{request::Parts, HeaderMap, Method as HttpMethod, StatusCode, Uri};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{error_body, HttpError, Result};
use crate::recorder::ResponseRecorder;

/// Request context: the single argument every handler receives.
///
/// Request data is immutable after construction; the response side and the
/// per-request store use interior mutability so the context can be shared
/// across the middleware chain behind an `Arc`.
pub struct Context {
    method: HttpMethod,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    query: HashMap<String, String>,
    cookies: HashMap<String, String>,
    params: Mutex<HashMap<String, String>>,
    store: Mutex<HashMap<String, JsonValue>>,
    response: Mutex<ResponseRecorder>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.uri.path())
            .finish()
    }
}

impl Context {
    /// Builds a context from decomposed request parts and a buffered body.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        let query = parse_query(parts.uri.query().unwrap_or(""));
        let cookies = parse_cookies(&parts.headers);

        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            body,
            query,
            cookies,
            params: Mutex::new(HashMap::new()),
            store: Mutex::new(HashMap::new()),
            response: Mutex::new(ResponseRecorder::new()),
        }
    }

    // -- Request side --

    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Raw buffered request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserializes the JSON request body; malformed input is a 400.
    pub fn bind_json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|err| {
            HttpError::bad_request(format!("invalid JSON body: {err}")).into()
        })
    }

    pub fn query(&self, name: &str) -> &str {
        self.query.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn query_default<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.query.get(name) {
            Some(value) => value,
            None => default,
        }
    }

    pub fn query_int(&self, name: &str, default: i64) -> i64 {
        self.query
            .get(name)
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }

    pub fn query_bool(&self, name: &str, default: bool) -> bool {
        self.query
            .get(name)
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn user_agent(&self) -> &str {
        self.header("user-agent")
    }

    /// Client address, preferring the first `x-forwarded-for` hop.
    pub fn client_ip(&self) -> &str {
        let forwarded = self.header("x-forwarded-for");
        match forwarded.split(',').next() {
            Some(first) if !first.trim().is_empty() => first.trim(),
            _ => self.header("x-real-ip"),
        }
    }

    /// Whether the client accepts a JSON response.
    pub fn accepts_json(&self) -> bool {
        let accept = self.header("accept");
        accept.contains("application/json") || accept.contains("json")
    }

    // -- Route parameters --

    pub fn param(&self, name: &str) -> String {
        self.params
            .lock()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn param_int(&self, name: &str, default: i64) -> i64 {
        self.param(name).parse().unwrap_or(default)
    }

    /// Splits a catch-all parameter into its path segments. Empty or
    /// missing parameters yield no segments.
    pub fn param_all(&self, name: &str) -> Vec<String> {
        let value = self.param(name);
        if value.is_empty() {
            return Vec::new();
        }
        value.split('/').map(str::to_string).collect()
    }

    pub fn set_param(&self, name: impl Into<String>, value: impl Into<String>) {
        self.params
            .lock()
            .insert(name.into(), value.into());
    }

    // -- Per-request store --

    pub fn set(&self, key: impl Into<String>, value: impl Into<JsonValue>) {
        self.store
            .lock()
            .insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<JsonValue> {
        self.store
            .lock()
            .get(key)
            .cloned()
    }

    pub fn get_string(&self, key: &str) -> String {
        match self.get(key) {
            Some(JsonValue::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).and_then(|v| v.as_i64()).unwrap_or(0)
    }

    // -- Response side --

    pub fn set_header(&self, name: &str, value: &str) {
        self.response
            .lock()
            .insert_header(name, value);
    }

    /// Whether a response status has been committed.
    pub fn written(&self) -> bool {
        self.response
            .lock()
            .written()
    }

    /// The committed (or default) response status.
    pub fn response_status(&self) -> StatusCode {
        self.response
            .lock()
            .status()
    }

    /// Writes a JSON response.
    pub fn json<T: Serialize>(&self, status: StatusCode, value: &T) -> Result {
        let body = serde_json::to_vec(value)
            .map_err(|err| HttpError::internal("failed to encode JSON response").with_cause(err))?;

        let mut response = self.response.lock();
        response.set_content_type("application/json");
        response.write_status(status);
        response.write(&body);
        Ok(())
    }

    /// Writes a plain-text response.
    pub fn text(&self, status: StatusCode, body: &str) -> Result {
        let mut response = self.response.lock();
        response.set_content_type("text/plain; charset=utf-8");
        response.write_status(status);
        response.write(body.as_bytes());
        Ok(())
    }

    /// Writes an HTML response.
    pub fn html(&self, status: StatusCode, body: &str) -> Result {
        let mut response = self.response.lock();
        response.set_content_type("text/html; charset=utf-8");
        response.write_status(status);
        response.write(body.as_bytes());
        Ok(())
    }

    /// Writes raw bytes with an explicit content type.
    pub fn blob(&self, status: StatusCode, content_type: &str, data: &[u8]) -> Result {
        let mut response = self.response.lock();
        response.set_content_type(content_type);
        response.write_status(status);
        response.write(data);
        Ok(())
    }

    /// Writes an empty 204 response.
    pub fn no_content(&self) -> Result {
        let mut response = self.response.lock();
        response.write_status(StatusCode::NO_CONTENT);
        Ok(())
    }

    /// Writes a 302 redirect.
    pub fn redirect(&self, location: &str) -> Result {
        self.redirect_with(location, StatusCode::FOUND)
    }

    /// Writes a redirect with an explicit status.
    pub fn redirect_with(&self, location: &str, status: StatusCode) -> Result {
        let mut response = self.response.lock();
        response.insert_header("location", location);
        response.write_status(status);
        Ok(())
    }

    /// Writes the standard error envelope with the given status.
    pub fn error(&self, status: StatusCode, message: &str) -> Result {
        let body = error_body(status, message);
        self.json(status, &body)
    }

    /// Consumes the recorded response. Called once per request by the
    /// dispatch boundary after the handler chain returns.
    pub(crate) fn take_recorder(&self) -> ResponseRecorder {
        std::mem::take(&mut *self.response.lock())
    }
}

fn parse_query(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                None
            } else {
                Some((key.to_string(), value.to_string()))
            }
        })
        .collect()
}

fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    if let Some(cookie_header) = headers.get("cookie") {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some((key, value)) = cookie.trim().split_once('=') {
                    cookies.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    cookies
}
