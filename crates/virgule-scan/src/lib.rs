//! # Virgule Scan
//!
//! Filesystem discovery for virgule's file-based routing. The scanner walks
//! an app directory, parses candidate source files structurally with `syn`
//! (never executing them) and emits descriptors for three declaration
//! kinds:
//!
//! - **Routes** (`route.rs`): one `pub fn` per HTTP verb, taking the
//!   request context and returning a `Result`
//! - **Middleware** (`middleware.rs`): a `pub fn middleware`, either a
//!   direct wrapper over the next handler or a zero-argument factory
//! - **Proxy** (`proxy.rs`, app root only): a `pub fn proxy` plus an
//!   optional `pub const PROXY_MATCHERS` literal scoping it
//!
//! Invalid declaration shapes are skipped and counted, never fatal. An
//! unreadable or unparseable file aborts the scan run. A nonexistent app
//! directory is an empty result, not an error.
//!
//! ```no_run
//! use virgule_scan::Scanner;
//!
//! let outcome = Scanner::new("app").scan()?;
//! for route in &outcome.routes {
//!     println!("{} {}", route.method, route.compiled.pattern);
//! }
//! # Ok::<(), virgule_scan::ScanError>(())
//! ```

pub mod descriptor;
pub mod error;
pub mod scanner;
pub mod signature;

pub use descriptor::{
    Method, MiddlewareDescriptor, ProxyDescriptor, RouteDescriptor, ScanOutcome,
};
pub use error::ScanError;
pub use scanner::{Scanner, MIDDLEWARE_FILE, PROXY_FILE, ROUTE_FILE};
