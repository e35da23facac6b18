// Virgule - file-based routing for axum
// Scan a directory tree into routes, inherited middleware, and a
// pre-routing proxy; dispatch requests in a fixed, auditable stage order.

pub mod app;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod proxy;
pub mod recorder;
pub mod registry;
pub mod report;
pub mod tree;

// Re-export the framework surface
pub use app::App;
pub use config::Config;
pub use context::Context;
pub use dispatch::Dispatcher;
pub use error::{BuildError, Error, HttpError, MountError, Result};
pub use handler::{handler, middleware_fn, BoxFuture, Handler, Middleware};
pub use middleware::{recover, request_id};
pub use proxy::{proxy_fn, Proxy, ProxyAction, ProxyFn, ProxyResult};
pub use recorder::ResponseRecorder;
pub use registry::HandlerRegistry;
pub use report::{MiddlewareInfo, ProxyInfo, RouteInfo, RouteReport};
pub use tree::{MiddlewareEntry, Route, RouteTree};

// Re-export the routing core and scanner
pub use virgule_router::{
    compile_pattern, CompiledPattern, Matcher, MatcherSet, ParamInfo, Segment,
};
pub use virgule_scan::{
    Method, MiddlewareDescriptor, ProxyDescriptor, RouteDescriptor, ScanError, ScanOutcome,
    Scanner,
};

// Re-export commonly used types from dependencies
pub use axum;
pub use axum::http;
pub use axum::http::StatusCode;
