// File: src/dispatch.rs
// Purpose: Per-request pipeline: proxy stage, routing, request logging

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderName, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router as AxumRouter;
use bytes::Bytes;
use http_body::Body as _;
use tower::ServiceExt;

use crate::context::Context;
use crate::error::Error;
use crate::proxy::{Proxy, ProxyAction};
use crate::report::RouteReport;
use crate::tree::error_response;

/// Everything one build produced, swapped in wholesale.
pub(crate) struct MountedState {
    pub router: AxumRouter,
    pub proxy: Option<Proxy>,
    pub report: RouteReport,
}

/// Runs the fixed per-request stage order: proxy (when present and
/// matched) → global middleware → path-scoped middleware → handler, with a
/// request logger wrapping everything so the final outcome is recorded no
/// matter which stage short-circuited.
///
/// The mounted table sits behind an atomic pointer: a rebuild stores a new
/// table, requests already in flight finish against the one they loaded.
pub struct Dispatcher {
    state: ArcSwap<MountedState>,
}

impl Dispatcher {
    pub(crate) fn new(state: MountedState) -> Self {
        Self {
            state: ArcSwap::from_pointee(state),
        }
    }

    /// Atomically replaces the mounted table.
    pub(crate) fn swap(&self, state: MountedState) {
        self.state.store(Arc::new(state));
    }

    /// The current route report.
    pub fn report(&self) -> RouteReport {
        self.state.load().report.clone()
    }

    /// Dispatches one request through the pipeline.
    pub async fn dispatch(&self, req: Request) -> Response {
        let started = Instant::now();
        let state = self.state.load_full();

        let method = req.method().clone();
        let original_path = req.uri().path().to_string();

        let mut merge_headers: Vec<(String, String)> = Vec::new();
        let mut rewritten: Option<String> = None;
        let mut stage = "route";

        let mut response = match &state.proxy {
            Some(proxy) if proxy.intercepts(&original_path) => {
                match run_proxy(proxy, req).await {
                    ProxyOutcome::Forward {
                        request,
                        headers,
                        rewritten_path,
                    } => {
                        merge_headers = headers;
                        if rewritten_path.is_some() {
                            stage = "rewrite";
                        }
                        rewritten = rewritten_path;
                        route_inner(&state, request).await
                    }
                    ProxyOutcome::ShortCircuit {
                        response,
                        stage: short_stage,
                    } => {
                        stage = short_stage;
                        response
                    }
                }
            }
            _ => route_inner(&state, req).await,
        };

        for (name, value) in merge_headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                response.headers_mut().insert(name, value);
            }
        }

        let status = response.status().as_u16();
        let bytes = response.body().size_hint().exact().unwrap_or(0);
        let elapsed = started.elapsed();

        match &rewritten {
            Some(target) => tracing::info!(
                method = %method,
                path = %original_path,
                rewritten = %target,
                status,
                bytes,
                elapsed = ?elapsed,
                stage,
                "request completed"
            ),
            None => tracing::info!(
                method = %method,
                path = %original_path,
                status,
                bytes,
                elapsed = ?elapsed,
                stage,
                "request completed"
            ),
        }

        response
    }
}

enum ProxyOutcome {
    Forward {
        request: Request,
        headers: Vec<(String, String)>,
        rewritten_path: Option<String>,
    },
    ShortCircuit {
        response: Response,
        stage: &'static str,
    },
}

async fn run_proxy(proxy: &Proxy, req: Request) -> ProxyOutcome {
    let (mut parts, body) = req.into_parts();

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "failed to buffer request body for proxy");
            return ProxyOutcome::ShortCircuit {
                response: error_response(StatusCode::BAD_REQUEST, "failed to read request body"),
                stage: "proxy-error",
            };
        }
    };

    let ctx = Arc::new(Context::from_parts(&parts, bytes.clone()));

    match (proxy.func)(ctx).await {
        // Any proxy error collapses to a fixed 500, structured or not.
        Err(err) => {
            log_proxy_error(&err, &proxy.source_path);
            ProxyOutcome::ShortCircuit {
                response: error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                ),
                stage: "proxy-error",
            }
        }
        Ok(result) => match result.action {
            ProxyAction::Next => ProxyOutcome::Forward {
                request: Request::from_parts(parts, Body::from(bytes)),
                headers: result.headers,
                rewritten_path: None,
            },
            ProxyAction::Rewrite(new_path) => match rewrite_uri(&parts.uri, &new_path) {
                Some(uri) => {
                    parts.uri = uri;
                    ProxyOutcome::Forward {
                        request: Request::from_parts(parts, Body::from(bytes)),
                        headers: result.headers,
                        rewritten_path: Some(new_path),
                    }
                }
                None => {
                    tracing::error!(target_path = %new_path, "proxy rewrite target is not a valid path");
                    ProxyOutcome::ShortCircuit {
                        response: error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "Internal Server Error",
                        ),
                        stage: "proxy-error",
                    }
                }
            },
            ProxyAction::Redirect { location, status } => {
                let response = match HeaderValue::from_str(&location) {
                    Ok(value) => {
                        (status, [(header::LOCATION, value)], Bytes::new()).into_response()
                    }
                    Err(_) => {
                        tracing::error!(%location, "proxy redirect location is not a valid header value");
                        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                    }
                };
                ProxyOutcome::ShortCircuit {
                    response,
                    stage: "redirect",
                }
            }
            ProxyAction::Respond {
                status,
                content_type,
                body,
            } => {
                let mut response = (status, body).into_response();
                if let Ok(value) = HeaderValue::from_str(&content_type) {
                    response.headers_mut().insert(header::CONTENT_TYPE, value);
                }
                ProxyOutcome::ShortCircuit {
                    response,
                    stage: "proxy",
                }
            }
        },
    }
}

fn log_proxy_error(err: &Error, source_path: &str) {
    match err {
        Error::Http(http) => tracing::error!(
            status = http.status.as_u16(),
            message = %http.message,
            source = source_path,
            "proxy failed"
        ),
        Error::Internal(internal) => {
            tracing::error!(error = ?internal, source = source_path, "proxy failed")
        }
    }
}

async fn route_inner(state: &MountedState, req: Request) -> Response {
    let router = state.router.clone();
    match router.oneshot(req).await {
        Ok(response) => response,
        Err(infallible) => match infallible {},
    }
}

/// Builds the rewritten request URI, keeping the original query string.
fn rewrite_uri(original: &Uri, new_path: &str) -> Option<Uri> {
    let path_and_query = match original.query() {
        Some(query) => format!("{new_path}?{query}"),
        None => new_path.to_string(),
    };

    let path_and_query: axum::http::uri::PathAndQuery = path_and_query.parse().ok()?;
    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(path_and_query);

    Uri::from_parts(parts).ok()
}
