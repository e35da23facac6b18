// File: src/proxy.rs
// Purpose: Pre-routing interception: proxy results and the compiled proxy

use std::sync::Arc;

use axum::http::StatusCode;
use bytes::Bytes;

use virgule_router::MatcherSet;

use crate::context::Context;
use crate::error::Result;
use crate::handler::BoxFuture;

/// What the proxy decided for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyAction {
    /// Proceed with normal dispatch.
    Next,
    /// Route the request against a different path; the client-visible URL
    /// is unchanged.
    Rewrite(String),
    /// Short-circuit with an HTTP redirect.
    Redirect { location: String, status: StatusCode },
    /// Short-circuit with an explicit response. Runs before any middleware.
    Respond {
        status: StatusCode,
        content_type: String,
        body: Bytes,
    },
}

/// The proxy's verdict plus any headers to merge into the eventual
/// response when dispatch continues.
///
/// ```
/// use virgule::ProxyResult;
///
/// let result = ProxyResult::next()
///     .with_header("x-proxy-version", "1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResult {
    pub(crate) action: ProxyAction,
    pub(crate) headers: Vec<(String, String)>,
}

impl ProxyResult {
    /// Continue to normal dispatch.
    pub fn next() -> Self {
        Self {
            action: ProxyAction::Next,
            headers: Vec::new(),
        }
    }

    /// Continue, but route against `path` instead of the request path.
    pub fn rewrite(path: impl Into<String>) -> Self {
        Self {
            action: ProxyAction::Rewrite(path.into()),
            headers: Vec::new(),
        }
    }

    /// Short-circuit with a 302 redirect.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::redirect_with(location, StatusCode::FOUND)
    }

    /// Short-circuit with a redirect using an explicit status.
    pub fn redirect_with(location: impl Into<String>, status: StatusCode) -> Self {
        Self {
            action: ProxyAction::Redirect {
                location: location.into(),
                status,
            },
            headers: Vec::new(),
        }
    }

    /// Short-circuit with an explicit response.
    pub fn respond(
        status: StatusCode,
        content_type: impl Into<String>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            action: ProxyAction::Respond {
                status,
                content_type: content_type.into(),
                body: body.into(),
            },
            headers: Vec::new(),
        }
    }

    /// Short-circuit with a JSON body.
    pub fn respond_json(status: StatusCode, body: impl Into<String>) -> Self {
        Self::respond(status, "application/json", body.into().into_bytes())
    }

    /// Short-circuit with an HTML body.
    pub fn respond_html(status: StatusCode, body: impl Into<String>) -> Self {
        Self::respond(status, "text/html; charset=utf-8", body.into().into_bytes())
    }

    /// Adds a header to merge into the response when dispatch continues.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn action(&self) -> &ProxyAction {
        &self.action
    }
}

/// The proxy callable registered by the application.
pub type ProxyFn = Arc<dyn Fn(Arc<Context>) -> BoxFuture<Result<ProxyResult>> + Send + Sync>;

/// Adapts a plain async function into a [`ProxyFn`].
pub fn proxy_fn<F, Fut>(f: F) -> ProxyFn
where
    F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<ProxyResult>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// A mounted proxy: the callable plus its compiled path matchers.
#[derive(Clone)]
pub struct Proxy {
    pub(crate) func: ProxyFn,
    pub(crate) matchers: MatcherSet,
    pub(crate) source_path: String,
}

impl Proxy {
    pub fn new(func: ProxyFn, matchers: MatcherSet, source_path: impl Into<String>) -> Self {
        Self {
            func,
            matchers,
            source_path: source_path.into(),
        }
    }

    /// Whether this proxy intercepts the given path.
    pub fn intercepts(&self, path: &str) -> bool {
        self.matchers.matches(path)
    }
}
