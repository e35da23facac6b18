//! # Virgule Router
//!
//! The pure core of virgule's file-based routing: directory-naming
//! conventions in, routing data out. No I/O, no async, no transport types:
//! everything here is a deterministic function over strings and segments.
//!
//! ## Features
//!
//! - **Pattern compilation** - `users/[id]` → `/users/{id}` with typed
//!   segments and an ordered parameter list
//! - **Catch-all routes** - `[...slug]` and the optional `[[...slug]]` form
//! - **Route groups** - `(admin)` organizes directories without touching URLs
//! - **Priority tiers** - static (100) > dynamic (50) > catch-all (5)
//! - **Interception matchers** - the `:name*` pattern language used to scope
//!   the pre-routing proxy
//! - **Path utilities** - normalization and ancestor-prefix iteration for
//!   middleware inheritance
//! - **Zero dependencies** - only uses the `std` library
//!
//! ## Quick Start
//!
//! ```rust
//! use virgule_router::{compile_pattern, MatcherSet};
//!
//! // Compile a directory path into a route pattern
//! let compiled = compile_pattern(["users", "[id]"]);
//! assert_eq!(compiled.pattern, "/users/{id}");
//! assert_eq!(compiled.priority, 50);
//!
//! // Compile interception matchers
//! let matchers = MatcherSet::compile(&["/api/*"]);
//! assert!(matchers.matches("/api/users"));
//! ```
//!
//! ## Directory Naming Convention
//!
//! | Segment form | Meaning |
//! |---|---|
//! | `name` | literal segment |
//! | `[name]` | dynamic parameter |
//! | `[...name]` | catch-all parameter |
//! | `[[...name]]` | optional catch-all |
//! | `(name)` | route group, stripped from the URL |
//!
//! ## Route Priority
//!
//! Patterns are ranked by coarse tiers so that more specific shapes always
//! win: a pure-static pattern (tier 100) beats one with dynamic parameters
//! (tier 50), which beats anything containing a catch-all (tier 5). Ties
//! within a tier are broken by the route store, lexically by pattern and
//! then by method, so iteration order is fully deterministic.

pub mod matcher;
pub mod path;
pub mod route;

pub use matcher::{MatchSegment, Matcher, MatcherSet};
pub use path::{is_ancestor, is_valid_path, normalize_path, PathHierarchy};
pub use route::{
    classify_segment, compile_pattern, is_convention_token, is_group_segment, priority_of,
    render_pattern, CompiledPattern, ParamInfo, Segment, PRIORITY_CATCH_ALL, PRIORITY_DYNAMIC,
    PRIORITY_STATIC,
};
