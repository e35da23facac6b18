// File: src/app.rs
// Purpose: Application container: config, registry, build/rebuild, serving

use std::sync::Arc;

use anyhow::Context as _;
use axum::extract::Request;
use axum::Router as AxumRouter;

use virgule_router::MatcherSet;
use virgule_scan::{Method, Scanner};

use crate::config::Config;
use crate::dispatch::{Dispatcher, MountedState};
use crate::error::{BuildError, MountError};
use crate::handler::{Handler, Middleware};
use crate::proxy::{Proxy, ProxyFn};
use crate::registry::HandlerRegistry;
use crate::report::RouteReport;
use crate::tree::{Route, RouteTree};

/// One application instance: owns the configuration, the handler registry,
/// the global middleware list, and the dispatcher with its swappable
/// mounted table. All state lives here; nothing is module-global.
pub struct App {
    config: Config,
    registry: HandlerRegistry,
    globals: Vec<Middleware>,
    dispatcher: Arc<Dispatcher>,
}

impl App {
    /// Creates an app, loading `virgule.toml` when present.
    pub fn new() -> Self {
        let config = Config::load_default().unwrap_or_else(|err| {
            tracing::warn!(error = ?err, "failed to load config, using defaults");
            Config::default()
        });
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            registry: HandlerRegistry::new(),
            globals: Vec::new(),
            dispatcher: Arc::new(Dispatcher::new(MountedState {
                router: AxumRouter::new(),
                proxy: None,
                report: RouteReport::default(),
            })),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Appends a global middleware; globals wrap every route, outermost
    /// first in registration order.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.globals.push(middleware);
        self
    }

    /// Registers the handler for one verb of a route directory.
    pub fn route(
        &mut self,
        dir: impl Into<String>,
        method: Method,
        handler: Handler,
    ) -> &mut Self {
        self.registry.route(dir, method, handler);
        self
    }

    /// Registers the middleware callable for a directory.
    pub fn middleware(&mut self, dir: impl Into<String>, middleware: Middleware) -> &mut Self {
        self.registry.middleware(dir, middleware);
        self
    }

    /// Registers the application proxy callable.
    pub fn proxy(&mut self, proxy: ProxyFn) -> &mut Self {
        self.registry.proxy(proxy);
        self
    }

    /// Scans the app directory, pairs descriptors with registered
    /// callables, mounts the tree, and atomically swaps it in.
    ///
    /// Requests already in flight finish against the table they started
    /// with; new requests see the new one.
    pub fn build(&self) -> Result<(), BuildError> {
        let scanner = Scanner::new(&self.config.routing.app_dir)
            .verbose(self.config.routing.verbose_scan);
        let outcome = scanner.scan()?;

        let mut tree = RouteTree::new();

        for descriptor in &outcome.routes {
            let handler = self
                .registry
                .route_handler(&descriptor.dir, descriptor.method)
                .ok_or_else(|| MountError::UnregisteredHandler {
                    method: descriptor.method,
                    dir: descriptor.dir.clone(),
                    source_path: descriptor.source_path.clone(),
                })?
                .clone();

            tree.add_route(Route::new(
                descriptor.compiled.clone(),
                descriptor.method,
                handler,
                descriptor.source_path.clone(),
            ));
        }

        for descriptor in &outcome.middlewares {
            let middleware = self
                .registry
                .middleware_handler(&descriptor.dir)
                .ok_or_else(|| MountError::UnregisteredMiddleware {
                    dir: descriptor.dir.clone(),
                    source_path: descriptor.source_path.clone(),
                })?
                .clone();

            tree.add_middleware(
                descriptor.prefix.clone(),
                middleware,
                descriptor.source_path.clone(),
            );
        }

        let proxy = match &outcome.proxy {
            Some(descriptor) => {
                let func = self
                    .registry
                    .proxy_handler()
                    .ok_or_else(|| MountError::UnregisteredProxy {
                        source_path: descriptor.source_path.clone(),
                    })?
                    .clone();

                Some(Proxy::new(
                    func,
                    MatcherSet::compile(&descriptor.matchers),
                    descriptor.source_path.clone(),
                ))
            }
            None => None,
        };

        let router = tree.mount(AxumRouter::new(), &self.globals)?;
        let report = RouteReport::from_outcome(&outcome);

        tracing::info!(
            routes = report.total_routes,
            middlewares = report.total_middlewares,
            proxy = report.proxy.is_some(),
            skipped = outcome.skipped,
            "mounted route table"
        );

        self.dispatcher.swap(MountedState {
            router,
            proxy,
            report,
        });

        Ok(())
    }

    /// The opaque rebuild trigger: rescan and swap. External collaborators
    /// (file watchers, tooling) call this however they like.
    pub fn rebuild(&self) -> Result<(), BuildError> {
        self.build()
    }

    /// The current route report for listing surfaces.
    pub fn report(&self) -> RouteReport {
        self.dispatcher.report()
    }

    /// The transport entry point: every request flows through the
    /// dispatcher's fixed stage order.
    pub fn router(&self) -> AxumRouter {
        let dispatcher = self.dispatcher.clone();
        AxumRouter::new().fallback(move |req: Request| {
            let dispatcher = dispatcher.clone();
            async move { dispatcher.dispatch(req).await }
        })
    }

    /// Binds the configured address and serves until shutdown.
    pub async fn listen(self) -> anyhow::Result<()> {
        let addr = self.config.address();
        self.listen_on(&addr).await
    }

    /// Binds an explicit address and serves until shutdown.
    pub async fn listen_on(self, addr: &str) -> anyhow::Result<()> {
        let router = self.router();

        tracing::info!(%addr, "starting server");
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        axum::serve(listener, router)
            .await
            .context("server error")?;

        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}
