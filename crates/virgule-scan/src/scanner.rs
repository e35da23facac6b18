// File: src/scanner.rs
// Purpose: Walks the app directory and discovers declarations

use std::fs;
use std::path::{Path, PathBuf};

use syn::Item;
use virgule_router::{compile_pattern, is_convention_token};

use crate::descriptor::{
    MiddlewareDescriptor, ProxyDescriptor, RouteDescriptor, ScanOutcome,
};
use crate::error::ScanError;
use crate::signature;

/// File name that marks a directory as a route.
pub const ROUTE_FILE: &str = "route.rs";
/// File name that contributes a middleware to the directory's subtree.
pub const MIDDLEWARE_FILE: &str = "middleware.rs";
/// File name of the application-level proxy, app root only.
pub const PROXY_FILE: &str = "proxy.rs";

/// Directory names excluded from scanning regardless of position.
const RESERVED_DIRS: &[&str] = &["node_modules", "target", ".git"];

/// Discovers route, middleware, and proxy declarations under an app
/// directory by parsing source files structurally; nothing is executed.
///
/// A scan is synchronous, filesystem-bound, and expected to run to
/// completion before serving begins; rebuild triggers simply run it again.
pub struct Scanner {
    app_dir: PathBuf,
    verbose: bool,
}

impl Scanner {
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
            verbose: false,
        }
    }

    /// Surfaces skipped declarations as warnings instead of debug events.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Runs a full scan.
    ///
    /// A nonexistent app directory yields an empty outcome with no error; a
    /// file that cannot be read or parsed aborts the run with a
    /// [`ScanError`].
    pub fn scan(&self) -> Result<ScanOutcome, ScanError> {
        let mut outcome = ScanOutcome::default();

        if !self.app_dir.exists() {
            return Ok(outcome);
        }

        let mut segments = Vec::new();
        self.scan_dir(&self.app_dir, &mut segments, &mut outcome)?;

        tracing::debug!(
            routes = outcome.routes.len(),
            middlewares = outcome.middlewares.len(),
            proxy = outcome.proxy.is_some(),
            skipped = outcome.skipped,
            "scan complete"
        );

        Ok(outcome)
    }

    /// Route descriptors only, for the route-listing surface.
    pub fn scan_route_info(&self) -> Result<Vec<RouteDescriptor>, ScanError> {
        Ok(self.scan()?.routes)
    }

    /// Middleware descriptors only, for the route-listing surface.
    pub fn scan_middleware_info(&self) -> Result<Vec<MiddlewareDescriptor>, ScanError> {
        Ok(self.scan()?.middlewares)
    }

    /// Proxy info, for the route-listing surface.
    pub fn scan_proxy_info(&self) -> Result<Option<ProxyDescriptor>, ScanError> {
        Ok(self.scan()?.proxy)
    }

    fn scan_dir(
        &self,
        dir: &Path,
        segments: &mut Vec<String>,
        outcome: &mut ScanOutcome,
    ) -> Result<(), ScanError> {
        let read_dir = fs::read_dir(dir).map_err(|source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        // Deterministic traversal: sorted entries, files before
        // subdirectories, so a directory's own middleware is always
        // registered ahead of its children's.
        let mut entries: Vec<PathBuf> = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| ScanError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            entries.push(entry.path());
        }
        entries.sort();

        for path in entries.iter().filter(|p| p.is_file()) {
            match file_name(path) {
                Some(ROUTE_FILE) => self.scan_route_file(path, segments, outcome)?,
                Some(MIDDLEWARE_FILE) => self.scan_middleware_file(path, segments, outcome)?,
                Some(PROXY_FILE) if segments.is_empty() => {
                    self.scan_proxy_file(path, outcome)?
                }
                _ => {}
            }
        }

        for path in entries.iter().filter(|p| p.is_dir()) {
            let Some(name) = file_name(path) else {
                continue;
            };

            if is_private_segment(name) {
                tracing::debug!(dir = %path.display(), "skipping private directory");
                continue;
            }

            segments.push(name.to_string());
            self.scan_dir(path, segments, outcome)?;
            segments.pop();
        }

        Ok(())
    }

    fn scan_route_file(
        &self,
        path: &Path,
        segments: &[String],
        outcome: &mut ScanOutcome,
    ) -> Result<(), ScanError> {
        let ast = parse_source(path)?;
        let dir = segments.join("/");
        let source_path = rel_source_path(segments, ROUTE_FILE);

        for item in &ast.items {
            let Item::Fn(item_fn) = item else {
                continue;
            };

            match signature::handler_method(item_fn) {
                Ok(Some(method)) => {
                    outcome.routes.push(RouteDescriptor {
                        method,
                        compiled: compile_pattern(segments.iter().map(String::as_str)),
                        dir: dir.clone(),
                        source_path: source_path.clone(),
                    });
                }
                Ok(None) => {}
                Err(issue) => self.skip(outcome, &source_path, &item_fn.sig.ident, issue),
            }
        }

        Ok(())
    }

    fn scan_middleware_file(
        &self,
        path: &Path,
        segments: &[String],
        outcome: &mut ScanOutcome,
    ) -> Result<(), ScanError> {
        let ast = parse_source(path)?;
        let source_path = rel_source_path(segments, MIDDLEWARE_FILE);

        for item in &ast.items {
            let Item::Fn(item_fn) = item else {
                continue;
            };
            if item_fn.sig.ident != "middleware" {
                continue;
            }

            match signature::middleware_shape(item_fn) {
                Ok(is_factory) => {
                    outcome.middlewares.push(MiddlewareDescriptor {
                        prefix: compile_pattern(segments.iter().map(String::as_str)).pattern,
                        dir: segments.join("/"),
                        is_factory,
                        source_path: source_path.clone(),
                    });
                }
                Err(issue) => self.skip(outcome, &source_path, &item_fn.sig.ident, issue),
            }
        }

        Ok(())
    }

    fn scan_proxy_file(&self, path: &Path, outcome: &mut ScanOutcome) -> Result<(), ScanError> {
        let ast = parse_source(path)?;
        let source_path = PROXY_FILE.to_string();

        let mut matchers = Vec::new();
        let mut found = false;

        for item in &ast.items {
            if let Some(found_matchers) = signature::proxy_matchers(item) {
                matchers = found_matchers;
                continue;
            }

            let Item::Fn(item_fn) = item else {
                continue;
            };
            if item_fn.sig.ident != "proxy" {
                continue;
            }

            match signature::proxy_shape(item_fn) {
                Ok(()) => found = true,
                Err(issue) => self.skip(outcome, &source_path, &item_fn.sig.ident, issue),
            }
        }

        if found {
            outcome.proxy = Some(ProxyDescriptor {
                matchers,
                source_path,
            });
        }

        Ok(())
    }

    fn skip(
        &self,
        outcome: &mut ScanOutcome,
        source_path: &str,
        ident: &syn::Ident,
        issue: signature::ShapeIssue,
    ) {
        outcome.skipped += 1;
        if self.verbose {
            tracing::warn!(file = source_path, function = %ident, %issue, "skipping declaration");
        } else {
            tracing::debug!(file = source_path, function = %ident, %issue, "skipping declaration");
        }
    }
}

fn parse_source(path: &Path) -> Result<syn::File, ScanError> {
    let source = fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    syn::parse_file(&source).map_err(|source| ScanError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Whether a directory segment is private and excluded from scanning.
///
/// Reserved names and `_`/`.` prefixes are private; bracket and paren
/// convention tokens are exempt so `[_id]` stays a parameter.
fn is_private_segment(name: &str) -> bool {
    if is_convention_token(name) {
        return false;
    }

    RESERVED_DIRS.contains(&name) || name.starts_with('_') || name.starts_with('.')
}

fn rel_source_path(segments: &[String], file: &str) -> String {
    if segments.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", segments.join("/"), file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_segments() {
        assert!(is_private_segment("_components"));
        assert!(is_private_segment(".git"));
        assert!(is_private_segment("node_modules"));
        assert!(is_private_segment("target"));
        assert!(!is_private_segment("users"));
        assert!(!is_private_segment("[_id]"));
        assert!(!is_private_segment("(_group)"));
        assert!(!is_private_segment("[...slug]"));
    }

    #[test]
    fn test_rel_source_path() {
        assert_eq!(rel_source_path(&[], ROUTE_FILE), "route.rs");
        assert_eq!(
            rel_source_path(&["users".into(), "[id]".into()], ROUTE_FILE),
            "users/[id]/route.rs"
        );
    }
}
