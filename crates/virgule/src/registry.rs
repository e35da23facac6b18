// File: src/registry.rs
// Purpose: Explicit registry pairing scanned declarations with callables
//
// The scanner discovers *declarations*; it never executes code. This
// registry holds the matching callables, keyed by the route directory
// exactly as written on disk. Pairing happens once per build, and a
// discovered declaration without a registered callable is a mount error.

use std::collections::HashMap;

use virgule_scan::Method;

use crate::handler::{Handler, Middleware};
use crate::proxy::ProxyFn;

/// Callables for everything the scanner can discover.
#[derive(Default)]
pub struct HandlerRegistry {
    routes: HashMap<(String, Method), Handler>,
    middlewares: HashMap<String, Middleware>,
    proxy: Option<ProxyFn>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for one verb of a route directory.
    ///
    /// `dir` is relative to the app root and matches the on-disk spelling,
    /// groups included: `""` for the root, `"users/[id]"`, or
    /// `"(admin)/settings"`.
    pub fn route(
        &mut self,
        dir: impl Into<String>,
        method: Method,
        handler: Handler,
    ) -> &mut Self {
        self.routes.insert((normalize_dir(dir.into()), method), handler);
        self
    }

    /// Registers the middleware declared in `dir`'s `middleware.rs`.
    pub fn middleware(&mut self, dir: impl Into<String>, middleware: Middleware) -> &mut Self {
        self.middlewares.insert(normalize_dir(dir.into()), middleware);
        self
    }

    /// Registers the application proxy.
    pub fn proxy(&mut self, proxy: ProxyFn) -> &mut Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn route_handler(&self, dir: &str, method: Method) -> Option<&Handler> {
        self.routes.get(&(normalize_dir(dir.to_string()), method))
    }

    pub fn middleware_handler(&self, dir: &str) -> Option<&Middleware> {
        self.middlewares.get(&normalize_dir(dir.to_string()))
    }

    pub fn proxy_handler(&self) -> Option<&ProxyFn> {
        self.proxy.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.middlewares.is_empty() && self.proxy.is_none()
    }
}

fn normalize_dir(dir: String) -> String {
    dir.trim_matches('/').to_string()
}
