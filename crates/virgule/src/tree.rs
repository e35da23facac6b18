// File: src/tree.rs
// Purpose: Route tree: priority-ordered routes, inherited middleware, mount

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::extract::{Path as AxumPath, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{on, MethodFilter};
use axum::Router as AxumRouter;
use bytes::Bytes;

use virgule_router::{is_ancestor, CompiledPattern, ParamInfo, Segment};
use virgule_scan::Method;

use crate::context::Context;
use crate::error::{error_body, Error, MountError};
use crate::handler::{compose, Handler, Middleware};

/// One mounted route: a compiled pattern bound to a method and a handler.
/// Immutable after creation.
pub struct Route {
    pub pattern: String,
    pub method: Method,
    pub handler: Handler,
    pub priority: i32,
    pub source_path: String,
    pub params: Vec<ParamInfo>,
    segments: Vec<Segment>,
}

impl Route {
    pub fn new(
        compiled: CompiledPattern,
        method: Method,
        handler: Handler,
        source_path: impl Into<String>,
    ) -> Self {
        Self {
            pattern: compiled.pattern,
            method,
            handler,
            priority: compiled.priority,
            source_path: source_path.into(),
            params: compiled.params,
            segments: compiled.segments,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("priority", &self.priority)
            .finish()
    }
}

/// One registered middleware with its inheritance prefix.
#[derive(Clone)]
pub struct MiddlewareEntry {
    pub prefix: String,
    pub middleware: Middleware,
    pub source_path: String,
}

/// In-memory store for routes and prefix-scoped middleware.
///
/// Built single-threaded during the build phase, then treated as read-only:
/// a rebuild constructs a fresh tree and swaps it in wholesale, never
/// mutates a live one.
#[derive(Default)]
pub struct RouteTree {
    routes: Vec<Route>,
    middlewares: Vec<MiddlewareEntry>,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route. No validation beyond shape; duplicates surface at
    /// mount time.
    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// All routes, sorted by priority descending with a deterministic
    /// tie-break: pattern lexical order, then method lexical order.
    pub fn routes(&self) -> Vec<&Route> {
        let mut routes: Vec<&Route> = self.routes.iter().collect();
        routes.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.pattern.cmp(&b.pattern))
                .then_with(|| a.method.as_str().cmp(b.method.as_str()))
        });
        routes
    }

    /// Appends a middleware under its inheritance prefix. Multiple entries
    /// per prefix are kept in registration order.
    pub fn add_middleware(
        &mut self,
        prefix: impl Into<String>,
        middleware: Middleware,
        source_path: impl Into<String>,
    ) {
        self.middlewares.push(MiddlewareEntry {
            prefix: prefix.into(),
            middleware,
            source_path: source_path.into(),
        });
    }

    /// Every middleware whose prefix is an ancestor of `path`, ordered
    /// least specific first: the root-most entry runs first and wraps
    /// everything inside it.
    pub fn middleware_chain(&self, path: &str) -> Vec<&MiddlewareEntry> {
        let mut chain: Vec<&MiddlewareEntry> = self
            .middlewares
            .iter()
            .filter(|entry| is_ancestor(&entry.prefix, path))
            .collect();

        // Stable sort: entries on the same prefix keep registration order.
        chain.sort_by_key(|entry| prefix_depth(&entry.prefix));
        chain
    }

    /// Registers every route with the transport, composing
    /// `globals ∘ path-scoped chain ∘ handler` per route.
    ///
    /// Handler errors are translated at this boundary: a structured
    /// [`HttpError`](crate::HttpError) propagates its status and message;
    /// anything else becomes a fixed 500 with a generic body while the
    /// concrete error goes to the log.
    pub fn mount(
        &self,
        mut router: AxumRouter,
        globals: &[Middleware],
    ) -> Result<AxumRouter, MountError> {
        let mut seen: HashSet<(Method, String)> = HashSet::new();

        for route in self.routes() {
            let chain: Vec<Middleware> = self
                .middleware_chain(&route.pattern)
                .into_iter()
                .map(|entry| entry.middleware.clone())
                .collect();

            let composed = compose(globals, &chain, route.handler.clone());

            let axum_path = render_axum_path(&route.segments);
            router = register(
                router,
                &mut seen,
                route,
                axum_path,
                composed.clone(),
                false,
            )?;

            // An optional catch-all also matches with the segment entirely
            // absent, binding the parameter to the empty string.
            if matches!(route.segments.last(), Some(Segment::OptionalCatchAll(_))) {
                let bare =
                    render_axum_path(&route.segments[..route.segments.len() - 1]);
                router = register(router, &mut seen, route, bare, composed, true)?;
            }
        }

        Ok(router)
    }
}

fn register(
    router: AxumRouter,
    seen: &mut HashSet<(Method, String)>,
    route: &Route,
    axum_path: String,
    composed: Handler,
    implicit: bool,
) -> Result<AxumRouter, MountError> {
    if !seen.insert((route.method, axum_path.clone())) {
        return Err(MountError::DuplicateRoute {
            method: route.method,
            pattern: if implicit {
                axum_path
            } else {
                route.pattern.clone()
            },
        });
    }

    let declared_params = Arc::new(route.params.clone());
    let source_path = Arc::new(route.source_path.clone());

    let handler_fn = move |AxumPath(raw_params): AxumPath<HashMap<String, String>>,
                           req: Request| {
        let composed = composed.clone();
        let declared_params = declared_params.clone();
        let source_path = source_path.clone();
        async move { run_route(composed, &declared_params, &source_path, raw_params, req).await }
    };

    // The transport panics on overlapping registrations it cannot express
    // (e.g. a dynamic and a catch-all sibling); surface that as a
    // configuration error instead.
    let method = route.method;
    let pattern = route.pattern.clone();
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        router.route(&axum_path, on(method_filter(method), handler_fn))
    }))
    .map_err(|_| MountError::RouteConflict { method, pattern })
}

async fn run_route(
    composed: Handler,
    declared_params: &[ParamInfo],
    source_path: &str,
    raw_params: HashMap<String, String>,
    req: Request,
) -> Response {
    let (parts, body) = req.into_parts();

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "failed to buffer request body");
            return error_response(StatusCode::BAD_REQUEST, "failed to read request body");
        }
    };

    let ctx = Arc::new(Context::from_parts(&parts, bytes));

    // Every declared parameter gets a binding; an absent optional
    // catch-all binds the empty string.
    for param in declared_params {
        let value = raw_params.get(&param.name).cloned().unwrap_or_default();
        ctx.set_param(&param.name, value);
    }

    match composed(ctx.clone()).await {
        Ok(()) => ctx.take_recorder().into_response(),
        Err(Error::Http(http)) => {
            tracing::debug!(
                status = http.status.as_u16(),
                message = %http.message,
                cause = ?http.cause,
                source = source_path,
                "handler returned HTTP error"
            );
            error_response(http.status, &http.message)
        }
        Err(Error::Internal(err)) => {
            tracing::error!(error = ?err, source = source_path, "handler failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// Builds the standard JSON error envelope response.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    let body = error_body(status, message).to_string();
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Bytes::from(body),
    )
        .into_response()
}

/// Renders the transport registration key for a segment list. Boundary
/// rendering only, never parsed back.
fn render_axum_path(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }

    let mut path = String::new();
    for segment in segments {
        path.push('/');
        match segment {
            Segment::Literal(name) => path.push_str(name),
            Segment::Param(name) => {
                path.push(':');
                path.push_str(name);
            }
            Segment::CatchAll(name) | Segment::OptionalCatchAll(name) => {
                path.push('*');
                path.push_str(name);
            }
        }
    }
    path
}

fn method_filter(method: Method) -> MethodFilter {
    match method {
        Method::Delete => MethodFilter::DELETE,
        Method::Get => MethodFilter::GET,
        Method::Head => MethodFilter::HEAD,
        Method::Options => MethodFilter::OPTIONS,
        Method::Patch => MethodFilter::PATCH,
        Method::Post => MethodFilter::POST,
        Method::Put => MethodFilter::PUT,
    }
}

fn prefix_depth(prefix: &str) -> usize {
    prefix.split('/').filter(|s| !s.is_empty()).count()
}
