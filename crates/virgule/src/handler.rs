// File: src/handler.rs
// Purpose: Handler and middleware function types plus chain composition

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Result;

/// Boxed future returned by handlers and middleware.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// A request handler: takes the shared request context, writes a response
/// through it, and returns `Ok(())` or an error for the boundary to
/// translate.
pub type Handler = Arc<dyn Fn(Arc<Context>) -> BoxFuture<Result> + Send + Sync>;

/// A middleware: wraps the next handler and returns a new one.
pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

/// Adapts a plain async function into a [`Handler`].
///
/// ```
/// use std::sync::Arc;
/// use virgule::{handler, Context};
/// use virgule::http::StatusCode;
///
/// let h = handler(|c: Arc<Context>| async move {
///     c.text(StatusCode::OK, "hello")
/// });
/// # drop(h);
/// ```
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// Adapts a wrapper function into a [`Middleware`].
///
/// ```
/// use std::sync::Arc;
/// use virgule::{middleware_fn, Context, Handler};
///
/// let mw = middleware_fn(|next: Handler| {
///     virgule::handler(move |ctx: Arc<Context>| {
///         let next = next.clone();
///         async move {
///             ctx.set_header("x-api-version", "1.0");
///             next(ctx).await
///         }
///     })
/// });
/// # drop(mw);
/// ```
pub fn middleware_fn<F>(f: F) -> Middleware
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Composes a handler with its middleware chain.
///
/// `outer` wraps `inner` wraps the handler: the first element of `outer`
/// runs first on the way in and last on the way out.
pub fn compose(outer: &[Middleware], inner: &[Middleware], handler: Handler) -> Handler {
    let mut composed = handler;

    for middleware in inner.iter().rev() {
        composed = middleware(composed);
    }

    for middleware in outer.iter().rev() {
        composed = middleware(composed);
    }

    composed
}
